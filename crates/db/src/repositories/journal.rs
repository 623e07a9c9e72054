//! Journal repository.

use std::sync::Arc;

use crate::entities::{Journal, journal};
use sahemind_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Journal repository for database operations.
#[derive(Clone)]
pub struct JournalRepository {
    db: Arc<DatabaseConnection>,
}

impl JournalRepository {
    /// Create a new journal repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a journal by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<journal::Model>> {
        Journal::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a journal by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<journal::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::JournalNotFound(id.to_string()))
    }

    /// A user's journals, pinned first, then newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<journal::Model>> {
        Journal::find()
            .filter(journal::Column::UserId.eq(user_id))
            .order_by_desc(journal::Column::IsPinned)
            .order_by_desc(journal::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A user's pinned journals, newest first.
    pub async fn find_pinned_by_user(&self, user_id: &str) -> AppResult<Vec<journal::Model>> {
        Journal::find()
            .filter(journal::Column::UserId.eq(user_id))
            .filter(journal::Column::IsPinned.eq(true))
            .order_by_desc(journal::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A user's journals, oldest first.
    pub async fn find_by_user_chronological(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<journal::Model>> {
        Journal::find()
            .filter(journal::Column::UserId.eq(user_id))
            .order_by_asc(journal::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new journal.
    pub async fn create(&self, model: journal::ActiveModel) -> AppResult<journal::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a journal.
    pub async fn update(&self, model: journal::ActiveModel) -> AppResult<journal::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a journal.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Journal::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_journal(id: &str, user_id: &str, is_pinned: bool) -> journal::Model {
        let now = Utc::now();
        journal::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            humor: "calm".to_string(),
            title: Some("Morning".to_string()),
            content: Some("Slept well".to_string()),
            is_pinned,
            color: journal::DEFAULT_COLOR.to_string(),
            report: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<journal::Model>::new()])
                .into_connection(),
        );

        let repo = JournalRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::JournalNotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let j1 = create_test_journal("j1", "user1", true);
        let j2 = create_test_journal("j2", "user1", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[j1, j2]])
                .into_connection(),
        );

        let repo = JournalRepository::new(db);
        let result = repo.find_by_user("user1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result[0].is_pinned);
    }

    #[tokio::test]
    async fn test_find_pinned_by_user() {
        let j1 = create_test_journal("j1", "user1", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[j1]])
                .into_connection(),
        );

        let repo = JournalRepository::new(db);
        let result = repo.find_pinned_by_user("user1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].is_pinned);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = JournalRepository::new(db);
        assert!(repo.delete("j1").await.is_ok());
    }
}
