//! Post response service.

use chrono::Utc;
use sahemind_common::{AppError, AppResult, IdGenerator};
use sahemind_db::{
    entities::{post_response, user},
    repositories::{LikeRepository, PostRepository, PostResponseRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::post::{LikeToggle, ReportInput, display_name};

/// Default number of responses returned per page.
pub const DEFAULT_RESPONSE_LIMIT: u64 = 100;

const fn default_anonymous() -> bool {
    true
}

/// Response service for business logic.
#[derive(Clone)]
pub struct PostResponseService {
    response_repo: PostResponseRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
    like_repo: LikeRepository,
    id_gen: IdGenerator,
}

/// Input for answering a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponseInput {
    #[validate(length(min = 1))]
    pub post_id: String,

    #[validate(length(min = 1, max = 10000))]
    pub content: String,

    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
}

/// Input for editing a response.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponseInput {
    #[validate(length(min = 1, max = 10000))]
    pub content: Option<String>,
}

/// A response with its display data.
#[derive(Debug, Clone)]
pub struct ResponseView {
    pub response: post_response::Model,
    pub author_name: String,
    pub like_count: u64,
}

impl PostResponseService {
    /// Create a new response service.
    #[must_use]
    pub const fn new(
        response_repo: PostResponseRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
        like_repo: LikeRepository,
    ) -> Self {
        Self {
            response_repo,
            post_repo,
            user_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn view(&self, response: post_response::Model) -> AppResult<ResponseView> {
        let author_name = if response.is_anonymous {
            display_name(true, None)
        } else {
            let author = self.user_repo.find_by_id(&response.author_id).await?;
            display_name(false, author.as_ref())
        };
        let like_count = self.like_repo.count_response_likes(&response.id).await?;

        Ok(ResponseView {
            response,
            author_name,
            like_count,
        })
    }

    async fn get_authored(
        &self,
        caller: &user::Model,
        id: &str,
    ) -> AppResult<post_response::Model> {
        let response = self.response_repo.get_by_id(id).await?;
        if response.author_id != caller.id {
            return Err(AppError::Forbidden(
                "You can only modify your own responses".to_string(),
            ));
        }
        Ok(response)
    }

    /// Answer a post.
    pub async fn create(
        &self,
        author: &user::Model,
        input: CreateResponseInput,
    ) -> AppResult<ResponseView> {
        input.validate()?;

        let post = self.post_repo.get_by_id(&input.post_id).await?;

        let model = post_response::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id),
            author_id: Set(author.id.clone()),
            content: Set(input.content),
            is_anonymous: Set(input.is_anonymous),
            is_reported: Set(false),
            report_reason: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let response = self.response_repo.create(model).await?;

        Ok(ResponseView {
            author_name: display_name(response.is_anonymous, Some(author)),
            response,
            like_count: 0,
        })
    }

    /// Responses to a post, oldest first.
    pub async fn list_by_post(
        &self,
        post_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ResponseView>> {
        let post = self.post_repo.get_by_id(post_id).await?;
        let responses = self
            .response_repo
            .find_by_post(&post.id, limit, offset)
            .await?;

        let mut views = Vec::with_capacity(responses.len());
        for response in responses {
            views.push(self.view(response).await?);
        }
        Ok(views)
    }

    /// Edit one of the caller's responses.
    pub async fn update(
        &self,
        caller: &user::Model,
        id: &str,
        input: UpdateResponseInput,
    ) -> AppResult<ResponseView> {
        input.validate()?;

        let response = self.get_authored(caller, id).await?;
        let mut active: post_response::ActiveModel = response.into();

        if let Some(content) = input.content {
            active.content = Set(content);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let response = self.response_repo.update(active).await?;
        self.view(response).await
    }

    /// Delete one of the caller's responses along with its likes.
    pub async fn delete(&self, caller: &user::Model, id: &str) -> AppResult<()> {
        let response = self.get_authored(caller, id).await?;
        self.response_repo.delete(&response.id).await
    }

    /// Flag a response for moderation.
    pub async fn report(&self, id: &str, input: ReportInput) -> AppResult<()> {
        input.validate()?;

        if !self.response_repo.mark_reported(id, &input.reason).await? {
            return Err(AppError::ResponseNotFound(id.to_string()));
        }

        tracing::info!(response_id = %id, "Response reported");
        Ok(())
    }

    /// Like the response, or remove the caller's like if present.
    pub async fn toggle_like(&self, user: &user::Model, id: &str) -> AppResult<LikeToggle> {
        let response = self.response_repo.get_by_id(id).await?;

        let liked = self
            .like_repo
            .toggle_response_like(self.id_gen.generate(), &response.id, &user.id)
            .await?;
        let like_count = self.like_repo.count_response_likes(&response.id).await?;

        Ok(LikeToggle { liked, like_count })
    }
}
