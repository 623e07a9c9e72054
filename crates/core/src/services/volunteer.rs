//! Volunteer matching and availability.
//!
//! Both filters are single passes over the active volunteers in insertion
//! order. The first `limit` survivors win; there is no scoring.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use sahemind_common::{AppError, AppResult, config::VolunteerConfig};
use sahemind_db::{entities::user, repositories::UserRepository};
use serde::Serialize;

use super::user::normalize_keywords;

/// Keyword matcher.
///
/// A candidate qualifies when it is an active volunteer, its availability
/// date (if any) is not before `today`, and it shares at least one keyword
/// with the requester. A requester with no keywords matches every otherwise
/// eligible candidate.
#[must_use]
pub fn match_volunteers(
    candidates: Vec<user::Model>,
    requester_keywords: &[String],
    today: NaiveDate,
    limit: usize,
) -> Vec<user::Model> {
    let wanted: HashSet<String> = normalize_keywords(requester_keywords).into_iter().collect();

    candidates
        .into_iter()
        .filter(|v| v.is_active && v.is_volunteer())
        .filter(|v| v.availability_date.is_none_or(|date| date >= today))
        .filter(|v| {
            wanted.is_empty()
                || v
                    .emotion_keywords
                    .iter()
                    .any(|kw| wanted.contains(&kw.trim().to_lowercase()))
        })
        .take(limit)
        .collect()
}

/// Whether a volunteer's published window covers `now`.
///
/// The date must equal today. With both times set the window is inclusive at
/// both ends; otherwise the whole day counts. No date means not available.
#[must_use]
pub fn is_available_at(volunteer: &user::Model, now: NaiveDateTime) -> bool {
    if volunteer.availability_date != Some(now.date()) {
        return false;
    }

    match (volunteer.availability_start, volunteer.availability_end) {
        (Some(start), Some(end)) => start <= now.time() && now.time() <= end,
        _ => true,
    }
}

/// Availability-now filter.
#[must_use]
pub fn available_now(
    candidates: Vec<user::Model>,
    now: NaiveDateTime,
    limit: usize,
) -> Vec<user::Model> {
    candidates
        .into_iter()
        .filter(|v| v.is_active && v.is_volunteer())
        .filter(|v| is_available_at(v, now))
        .take(limit)
        .collect()
}

/// One page of active volunteers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerPage {
    pub volunteers: Vec<user::Model>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl VolunteerPage {
    fn new(volunteers: Vec<user::Model>, page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = total.div_ceil(page_size);
        Self {
            volunteers,
            page,
            page_size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Volunteer service.
#[derive(Clone)]
pub struct VolunteerService {
    user_repo: UserRepository,
    config: VolunteerConfig,
    tz: Tz,
}

impl VolunteerService {
    /// Create a new volunteer service. Fails when the configured time zone is unknown.
    pub fn new(user_repo: UserRepository, config: &VolunteerConfig) -> AppResult<Self> {
        let tz = config.tz()?;
        Ok(Self {
            user_repo,
            config: config.clone(),
            tz,
        })
    }

    /// Current wall-clock time in the configured zone.
    #[must_use]
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }

    /// Active volunteers, no availability check.
    pub async fn list(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo
            .find_active_volunteers_page(self.config.list_limit as u64, 0)
            .await
    }

    /// Active volunteers, one page at a time. Pages start at 1.
    pub async fn list_page(&self, page: u64, page_size: u64) -> AppResult<VolunteerPage> {
        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        if page_size < 1 || page_size > self.config.max_page_size {
            return Err(AppError::Validation(format!(
                "pageSize must be between 1 and {}",
                self.config.max_page_size
            )));
        }

        let total = self.user_repo.count_active_volunteers().await?;
        let volunteers = self
            .user_repo
            .find_active_volunteers_page(page_size, (page - 1) * page_size)
            .await?;

        Ok(VolunteerPage::new(volunteers, page, page_size, total))
    }

    /// Volunteers whose window covers the current local time.
    pub async fn available_now(&self) -> AppResult<Vec<user::Model>> {
        self.available_at(self.local_now()).await
    }

    /// Volunteers whose window covers `now`.
    pub async fn available_at(&self, now: NaiveDateTime) -> AppResult<Vec<user::Model>> {
        let candidates = self.user_repo.find_active_volunteers().await?;
        Ok(available_now(candidates, now, self.config.available_limit))
    }

    /// Volunteers matching an explicit keyword set.
    pub async fn match_for_keywords(&self, keywords: &[String]) -> AppResult<Vec<user::Model>> {
        self.match_for_keywords_on(keywords, self.local_now().date())
            .await
    }

    /// Volunteers matching an explicit keyword set, as of `today`.
    pub async fn match_for_keywords_on(
        &self,
        keywords: &[String],
        today: NaiveDate,
    ) -> AppResult<Vec<user::Model>> {
        let candidates = self.user_repo.find_active_volunteers().await?;
        let matched = match_volunteers(candidates, keywords, today, self.config.match_limit);
        tracing::debug!(
            keywords = keywords.len(),
            matched = matched.len(),
            "Volunteer match"
        );
        Ok(matched)
    }

    /// Volunteers matching a stored user's keywords.
    pub async fn match_for_user(&self, user_id: &str) -> AppResult<Vec<user::Model>> {
        let requester = self.user_repo.get_by_id(user_id).await?;
        self.match_for_keywords(&requester.emotion_keywords).await
    }

    /// An active volunteer by ID.
    pub async fn get(&self, volunteer_id: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_active_volunteer(volunteer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Volunteer {volunteer_id}")))
    }
}
