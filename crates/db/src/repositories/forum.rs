//! Forum repository.

use std::sync::Arc;

use crate::entities::{Forum, ForumModerator, Post, forum, forum_moderator, post};
use sahemind_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

/// Forum repository for database operations.
#[derive(Clone)]
pub struct ForumRepository {
    db: Arc<DatabaseConnection>,
}

impl ForumRepository {
    /// Create a new forum repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Active forums (paginated, oldest first).
    pub async fn find_active(&self, limit: u64, offset: u64) -> AppResult<Vec<forum::Model>> {
        Forum::find()
            .filter(forum::Column::IsActive.eq(true))
            .order_by_asc(forum::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an active forum by ID.
    pub async fn find_active_by_id(&self, id: &str) -> AppResult<Option<forum::Model>> {
        Forum::find_by_id(id)
            .filter(forum::Column::IsActive.eq(true))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an active forum by ID, returning an error if not found.
    pub async fn get_active_by_id(&self, id: &str) -> AppResult<forum::Model> {
        self.find_active_by_id(id)
            .await?
            .ok_or_else(|| AppError::ForumNotFound(id.to_string()))
    }

    /// Find a forum by its unique name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<forum::Model>> {
        Forum::find()
            .filter(forum::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Active forums in a thematic category.
    pub async fn find_by_thematic(&self, thematic: &str) -> AppResult<Vec<forum::Model>> {
        Forum::find()
            .filter(forum::Column::Thematic.eq(thematic))
            .filter(forum::Column::IsActive.eq(true))
            .order_by_asc(forum::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a forum and its moderator assignments in one transaction.
    pub async fn create_with_moderators(
        &self,
        model: forum::ActiveModel,
        moderators: Vec<forum_moderator::ActiveModel>,
    ) -> AppResult<forum::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = match model.insert(&txn).await {
            Ok(created) => created,
            Err(e) => {
                let _ = txn.rollback().await;
                return Err(AppError::Database(e.to_string()));
            }
        };

        if !moderators.is_empty() {
            if let Err(e) = ForumModerator::insert_many(moderators)
                .exec_without_returning(&txn)
                .await
            {
                let _ = txn.rollback().await;
                return Err(AppError::Database(e.to_string()));
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Count moderators assigned to a forum.
    pub async fn count_moderators(&self, forum_id: &str) -> AppResult<u64> {
        ForumModerator::find()
            .filter(forum_moderator::Column::ForumId.eq(forum_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts in a forum.
    pub async fn count_posts(&self, forum_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::ForumId.eq(forum_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
