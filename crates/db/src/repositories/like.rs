//! Like repository for posts and responses.
//!
//! A like is the presence of a `(target, user)` row. Both like tables carry a
//! unique index on that pair, so toggling is a delete followed, when nothing
//! was deleted, by an insert that does nothing on conflict. Two concurrent
//! toggles can never leave duplicate rows behind.

use std::sync::Arc;

use crate::entities::{PostLike, ResponseLike, post_like, response_like};
use chrono::Utc;
use sahemind_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::OnConflict,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Toggle a user's like on a post. Returns `true` when the post is now liked.
    ///
    /// `like_id` is only used when a new row is inserted.
    pub async fn toggle_post_like(
        &self,
        like_id: String,
        post_id: &str,
        user_id: &str,
    ) -> AppResult<bool> {
        let deleted = PostLike::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if deleted.rows_affected > 0 {
            return Ok(false);
        }

        let model = post_like::ActiveModel {
            id: Set(like_id),
            post_id: Set(post_id.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        PostLike::insert(model)
            .on_conflict(
                OnConflict::columns([post_like::Column::PostId, post_like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(true)
    }

    /// Toggle a user's like on a response. Returns `true` when the response is now liked.
    pub async fn toggle_response_like(
        &self,
        like_id: String,
        response_id: &str,
        user_id: &str,
    ) -> AppResult<bool> {
        let deleted = ResponseLike::delete_many()
            .filter(response_like::Column::ResponseId.eq(response_id))
            .filter(response_like::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if deleted.rows_affected > 0 {
            return Ok(false);
        }

        let model = response_like::ActiveModel {
            id: Set(like_id),
            response_id: Set(response_id.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        ResponseLike::insert(model)
            .on_conflict(
                OnConflict::columns([
                    response_like::Column::ResponseId,
                    response_like::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(true)
    }

    /// Count likes on a post.
    pub async fn count_post_likes(&self, post_id: &str) -> AppResult<u64> {
        PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes on a response.
    pub async fn count_response_likes(&self, response_id: &str) -> AppResult<u64> {
        ResponseLike::find()
            .filter(response_like::Column::ResponseId.eq(response_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
