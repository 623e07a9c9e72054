//! Forum service.

use chrono::Utc;
use sahemind_common::{AppError, AppResult, IdGenerator};
use sahemind_db::{
    entities::{forum, forum_moderator, user},
    repositories::{ForumRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Forum service for business logic.
#[derive(Clone)]
pub struct ForumService {
    forum_repo: ForumRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a forum.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateForumInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(max = 2048))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub thematic: String,

    #[validate(length(min = 1, max = 32))]
    pub moderator_ids: Vec<String>,
}

/// A forum with its moderator and post counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumSummary {
    #[serde(flatten)]
    pub forum: forum::Model,
    pub moderator_count: u64,
    pub post_count: u64,
}

impl ForumService {
    /// Create a new forum service.
    #[must_use]
    pub const fn new(forum_repo: ForumRepository, user_repo: UserRepository) -> Self {
        Self {
            forum_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn summarize(&self, forum: forum::Model) -> AppResult<ForumSummary> {
        let moderator_count = self.forum_repo.count_moderators(&forum.id).await?;
        let post_count = self.forum_repo.count_posts(&forum.id).await?;
        Ok(ForumSummary {
            forum,
            moderator_count,
            post_count,
        })
    }

    /// Active forums, oldest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<ForumSummary>> {
        let forums = self.forum_repo.find_active(limit, offset).await?;

        let mut summaries = Vec::with_capacity(forums.len());
        for forum in forums {
            summaries.push(self.summarize(forum).await?);
        }
        Ok(summaries)
    }

    /// Get an active forum.
    pub async fn get(&self, id: &str) -> AppResult<ForumSummary> {
        let forum = self.forum_repo.get_active_by_id(id).await?;
        self.summarize(forum).await
    }

    /// Active forums in one thematic category.
    pub async fn list_by_thematic(&self, thematic: &str) -> AppResult<Vec<forum::Model>> {
        self.forum_repo.find_by_thematic(thematic).await
    }

    /// Create a forum with its moderators. Only moderators may do this.
    pub async fn create(
        &self,
        caller: &user::Model,
        input: CreateForumInput,
    ) -> AppResult<ForumSummary> {
        if !caller.is_moderator() {
            return Err(AppError::Forbidden(
                "Only moderators can create forums".to_string(),
            ));
        }
        input.validate()?;

        let name = input.name.trim().to_string();
        if self.forum_repo.find_by_name(&name).await?.is_some() {
            return Err(AppError::Validation(format!(
                "Forum name already taken: {name}"
            )));
        }

        let mut moderator_ids = input.moderator_ids;
        moderator_ids.sort();
        moderator_ids.dedup();

        let found = self.user_repo.find_by_ids(&moderator_ids).await?;
        if let Some(missing) = moderator_ids
            .iter()
            .find(|id| !found.iter().any(|u| &u.id == *id))
        {
            return Err(AppError::UserNotFound(missing.clone()));
        }

        let now = Utc::now();
        let forum_id = self.id_gen.generate();
        let model = forum::ActiveModel {
            id: Set(forum_id.clone()),
            name: Set(name),
            description: Set(input.description),
            thematic: Set(input.thematic),
            is_active: Set(true),
            created_at: Set(now.into()),
        };

        let moderators: Vec<forum_moderator::ActiveModel> = moderator_ids
            .iter()
            .map(|user_id| forum_moderator::ActiveModel {
                id: Set(self.id_gen.generate()),
                forum_id: Set(forum_id.clone()),
                user_id: Set(user_id.clone()),
                assigned_at: Set(now.into()),
            })
            .collect();
        let moderator_count = moderators.len() as u64;

        let forum = self
            .forum_repo
            .create_with_moderators(model, moderators)
            .await?;

        tracing::info!(forum_id = %forum.id, moderators = moderator_count, "Forum created");

        Ok(ForumSummary {
            forum,
            moderator_count,
            post_count: 0,
        })
    }
}
