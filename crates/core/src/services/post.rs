//! Forum post service.

use chrono::Utc;
use sahemind_common::{AppError, AppResult, IdGenerator};
use sahemind_db::{
    entities::{post, user},
    repositories::{ForumRepository, LikeRepository, PostRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Name shown in place of the author on anonymous content.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Name shown for a named author with no display name set.
pub const FALLBACK_NAME: &str = "Member";

/// Default number of posts returned per page.
pub const DEFAULT_POST_LIMIT: u64 = 50;

/// The name to display for an author.
#[must_use]
pub fn display_name(is_anonymous: bool, author: Option<&user::Model>) -> String {
    if is_anonymous {
        return ANONYMOUS_NAME.to_string();
    }
    author
        .and_then(|u| u.name.clone())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

const fn default_anonymous() -> bool {
    true
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    forum_repo: ForumRepository,
    user_repo: UserRepository,
    like_repo: LikeRepository,
    id_gen: IdGenerator,
}

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1))]
    pub forum_id: String,

    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 20000))]
    pub content: String,

    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
}

/// Input for editing a post.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 20000))]
    pub content: Option<String>,
}

/// Input for reporting a post or a response.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    #[validate(length(min = 1, max = 1024))]
    pub reason: String,
}

/// A post with its display data.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: post::Model,
    pub author_name: String,
    pub like_count: u64,
    pub response_count: u64,
}

/// Result of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: u64,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        forum_repo: ForumRepository,
        user_repo: UserRepository,
        like_repo: LikeRepository,
    ) -> Self {
        Self {
            post_repo,
            forum_repo,
            user_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn view(&self, post: post::Model) -> AppResult<PostView> {
        let author_name = if post.is_anonymous {
            display_name(true, None)
        } else {
            let author = self.user_repo.find_by_id(&post.author_id).await?;
            display_name(false, author.as_ref())
        };
        let like_count = self.like_repo.count_post_likes(&post.id).await?;
        let response_count = self.post_repo.count_responses(&post.id).await?;

        Ok(PostView {
            post,
            author_name,
            like_count,
            response_count,
        })
    }

    async fn views(&self, posts: Vec<post::Model>) -> AppResult<Vec<PostView>> {
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.view(post).await?);
        }
        Ok(views)
    }

    async fn get_authored(&self, caller: &user::Model, id: &str) -> AppResult<post::Model> {
        let post = self.post_repo.get_by_id(id).await?;
        if post.author_id != caller.id {
            return Err(AppError::Forbidden(
                "You can only modify your own posts".to_string(),
            ));
        }
        Ok(post)
    }

    /// Publish a post in an active forum.
    pub async fn create(&self, author: &user::Model, input: CreatePostInput) -> AppResult<PostView> {
        input.validate()?;

        let forum = self.forum_repo.get_active_by_id(&input.forum_id).await?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            forum_id: Set(forum.id),
            author_id: Set(author.id.clone()),
            title: Set(input.title),
            content: Set(input.content),
            is_anonymous: Set(input.is_anonymous),
            is_reported: Set(false),
            report_reason: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let post = self.post_repo.create(model).await?;
        tracing::debug!(post_id = %post.id, forum_id = %post.forum_id, "Post created");

        Ok(PostView {
            author_name: display_name(post.is_anonymous, Some(author)),
            post,
            like_count: 0,
            response_count: 0,
        })
    }

    /// Get a post.
    pub async fn get(&self, id: &str) -> AppResult<PostView> {
        let post = self.post_repo.get_by_id(id).await?;
        self.view(post).await
    }

    /// Posts in an active forum, newest first.
    pub async fn list_by_forum(
        &self,
        forum_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<PostView>> {
        self.forum_repo.get_active_by_id(forum_id).await?;
        let posts = self.post_repo.find_by_forum(forum_id, limit, offset).await?;
        self.views(posts).await
    }

    /// Posts written by a user, newest first.
    pub async fn list_by_author(
        &self,
        author_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<PostView>> {
        let posts = self.post_repo.find_by_author(author_id, limit, offset).await?;
        self.views(posts).await
    }

    /// Edit one of the caller's posts.
    pub async fn update(
        &self,
        caller: &user::Model,
        id: &str,
        input: UpdatePostInput,
    ) -> AppResult<PostView> {
        input.validate()?;

        let post = self.get_authored(caller, id).await?;
        let mut active: post::ActiveModel = post.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let post = self.post_repo.update(active).await?;
        self.view(post).await
    }

    /// Delete one of the caller's posts along with its responses and likes.
    pub async fn delete(&self, caller: &user::Model, id: &str) -> AppResult<()> {
        let post = self.get_authored(caller, id).await?;
        self.post_repo.delete(&post.id).await
    }

    /// Flag a post for moderation.
    pub async fn report(&self, id: &str, input: ReportInput) -> AppResult<()> {
        input.validate()?;

        if !self.post_repo.mark_reported(id, &input.reason).await? {
            return Err(AppError::PostNotFound(id.to_string()));
        }

        tracing::info!(post_id = %id, "Post reported");
        Ok(())
    }

    /// Like the post, or remove the caller's like if present.
    pub async fn toggle_like(&self, user: &user::Model, id: &str) -> AppResult<LikeToggle> {
        let post = self.post_repo.get_by_id(id).await?;

        let liked = self
            .like_repo
            .toggle_post_like(self.id_gen.generate(), &post.id, &user.id)
            .await?;
        let like_count = self.like_repo.count_post_likes(&post.id).await?;

        Ok(LikeToggle { liked, like_count })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sahemind_db::entities::forum;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn create_test_user(id: &str, name: Option<&str>) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            password_hash: "hash".to_string(),
            name: name.map(str::to_string),
            role: user::ROLE_PATIENT.to_string(),
            emotion_keywords: vec![],
            is_active: true,
            token: None,
            availability_date: None,
            availability_start: None,
            availability_end: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_post(id: &str, author_id: &str, is_anonymous: bool) -> post::Model {
        post::Model {
            id: id.to_string(),
            forum_id: "f1".to_string(),
            author_id: author_id.to_string(),
            title: "Sleepless".to_string(),
            content: "Anyone else awake?".to_string(),
            is_anonymous,
            is_reported: false,
            report_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn service(db: MockDatabase) -> PostService {
        let conn = Arc::new(db.into_connection());
        PostService::new(
            PostRepository::new(conn.clone()),
            ForumRepository::new(conn.clone()),
            UserRepository::new(conn.clone()),
            LikeRepository::new(conn),
        )
    }

    #[test]
    fn test_display_name() {
        let named = create_test_user("u1", Some("Amal"));
        let unnamed = create_test_user("u2", None);

        assert_eq!(display_name(true, Some(&named)), "Anonymous");
        assert_eq!(display_name(false, Some(&named)), "Amal");
        assert_eq!(display_name(false, Some(&unnamed)), "Member");
        assert_eq!(display_name(false, None), "Member");
    }

    #[test]
    fn test_create_input_defaults_to_anonymous() {
        let input: CreatePostInput =
            serde_json::from_str(r#"{"forumId":"f1","title":"t","content":"c"}"#).unwrap();
        assert!(input.is_anonymous);
    }

    #[tokio::test]
    async fn test_create_in_missing_forum() {
        let author = create_test_user("u1", None);
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<forum::Model>::new()]),
        );

        let result = svc
            .create(
                &author,
                CreatePostInput {
                    forum_id: "gone".to_string(),
                    title: "t".to_string(),
                    content: "c".to_string(),
                    is_anonymous: true,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::ForumNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_anonymous_post() {
        let post = create_test_post("p1", "u1", true);
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_query_results([[count_row(3)]])
                .append_query_results([[count_row(1)]]),
        );

        let view = svc.get("p1").await.unwrap();
        assert_eq!(view.author_name, "Anonymous");
        assert_eq!(view.like_count, 3);
        assert_eq!(view.response_count, 1);
    }

    #[tokio::test]
    async fn test_update_by_other_user_is_forbidden() {
        let post = create_test_post("p1", "owner", false);
        let intruder = create_test_user("intruder", None);
        let svc =
            service(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[post]]));

        let result = svc
            .update(
                &intruder,
                "p1",
                UpdatePostInput {
                    title: Some("mine now".to_string()),
                    content: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_report_missing_post() {
        let svc =
            service(MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec(0)]));

        let result = svc
            .report(
                "gone",
                ReportInput {
                    reason: "spam".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_like_twice_restores_count() {
        let post = create_test_post("p1", "owner", true);
        let user = create_test_user("u1", None);
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .append_exec_results([exec(0), exec(1)])
                .append_query_results([[count_row(1)]])
                .append_query_results([[post]])
                .append_exec_results([exec(1)])
                .append_query_results([[count_row(0)]]),
        );

        let first = svc.toggle_like(&user, "p1").await.unwrap();
        let second = svc.toggle_like(&user, "p1").await.unwrap();

        assert_eq!(
            first,
            LikeToggle {
                liked: true,
                like_count: 1
            }
        );
        assert_eq!(
            second,
            LikeToggle {
                liked: false,
                like_count: 0
            }
        );
    }
}
