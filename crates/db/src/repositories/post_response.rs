//! Post response repository.

use std::sync::Arc;

use crate::entities::{PostResponse, post_response};
use sahemind_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};

/// Post response repository for database operations.
#[derive(Clone)]
pub struct PostResponseRepository {
    db: Arc<DatabaseConnection>,
}

impl PostResponseRepository {
    /// Create a new post response repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a response by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post_response::Model>> {
        PostResponse::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a response by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post_response::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResponseNotFound(id.to_string()))
    }

    /// Responses to a post, oldest first.
    pub async fn find_by_post(
        &self,
        post_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post_response::Model>> {
        PostResponse::find()
            .filter(post_response::Column::PostId.eq(post_id))
            .order_by_asc(post_response::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new response.
    pub async fn create(&self, model: post_response::ActiveModel) -> AppResult<post_response::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a response.
    pub async fn update(&self, model: post_response::ActiveModel) -> AppResult<post_response::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a response.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        PostResponse::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Flag a response as reported. Returns `false` when no response has that ID.
    pub async fn mark_reported(&self, id: &str, reason: &str) -> AppResult<bool> {
        let result = PostResponse::update_many()
            .col_expr(post_response::Column::IsReported, Expr::value(true))
            .col_expr(post_response::Column::ReportReason, Expr::value(reason))
            .filter(post_response::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_response(id: &str, post_id: &str) -> post_response::Model {
        post_response::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            author_id: "u1".to_string(),
            content: "You are not alone".to_string(),
            is_anonymous: false,
            is_reported: false,
            report_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post_response::Model>::new()])
                .into_connection(),
        );

        let repo = PostResponseRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::ResponseNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_post() {
        let r1 = create_test_response("r1", "p1");
        let r2 = create_test_response("r2", "p1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = PostResponseRepository::new(db);
        let result = repo.find_by_post("p1", 100, 0).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "r1");
    }
}
