//! User service.

use chrono::{NaiveDate, NaiveTime, Utc};
use sahemind_common::{AppError, AppResult};
use sahemind_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// User service for profile and availability management.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

/// Input for updating the caller's profile. Omitted fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(max = 256))]
    pub name: Option<String>,

    #[validate(length(max = 32))]
    pub emotion_keywords: Option<Vec<String>>,
}

/// Input for publishing a volunteer's availability window.
///
/// A date with no times means the whole day.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_window"))]
pub struct AvailabilityInput {
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Both bounds or neither, and the start must not be after the end.
fn validate_window(input: &AvailabilityInput) -> Result<(), ValidationError> {
    match (input.start_time, input.end_time) {
        (Some(start), Some(end)) if start > end => Err(ValidationError::new("window")
            .with_message("startTime must not be after endTime".into())),
        (Some(_), None) | (None, Some(_)) => Err(ValidationError::new("window")
            .with_message("startTime and endTime must be given together".into())),
        _ => Ok(()),
    }
}

/// Trim, lowercase and de-duplicate emotion keywords, dropping empty ones.
///
/// First occurrence wins, so the stored order follows the input order.
#[must_use]
pub fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for kw in keywords {
        let kw = kw.as_ref().trim().to_lowercase();
        if !kw.is_empty() && !out.contains(&kw) {
            out.push(kw);
        }
    }
    out
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Update the caller's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(name) = input.name {
            active.name = Set(Some(name));
        }
        if let Some(keywords) = input.emotion_keywords {
            active.emotion_keywords = Set(normalize_keywords(keywords));
        }

        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Publish a volunteer's availability window.
    pub async fn set_availability(
        &self,
        caller: &user::Model,
        input: AvailabilityInput,
    ) -> AppResult<user::Model> {
        if !caller.is_volunteer() {
            return Err(AppError::Forbidden(
                "Only volunteers can publish availability".to_string(),
            ));
        }
        input.validate()?;

        let user = self.user_repo.get_by_id(&caller.id).await?;
        let mut active: user::ActiveModel = user.into();
        active.availability_date = Set(Some(input.date));
        active.availability_start = Set(input.start_time);
        active.availability_end = Set(input.end_time);
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Remove a volunteer's availability window.
    pub async fn clear_availability(&self, caller: &user::Model) -> AppResult<user::Model> {
        if !caller.is_volunteer() {
            return Err(AppError::Forbidden(
                "Only volunteers can publish availability".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(&caller.id).await?;
        let mut active: user::ActiveModel = user.into();
        active.availability_date = Set(None);
        active.availability_start = Set(None);
        active.availability_end = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(role: &str) -> user::Model {
        user::Model {
            id: "user1".to_string(),
            email: "a@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: Some("Amal".to_string()),
            role: role.to_string(),
            emotion_keywords: vec!["stress".to_string()],
            is_active: true,
            token: Some("tok".to_string()),
            availability_date: None,
            availability_start: None,
            availability_end: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_normalize_keywords() {
        let kws = normalize_keywords(["  Stress", "anxiety", "STRESS", "", "   "]);
        assert_eq!(kws, vec!["stress".to_string(), "anxiety".to_string()]);
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let svc = UserService::new(UserRepository::new(Arc::new(db)));

        let result = svc.get("ghost").await;
        assert!(matches!(result, Err(AppError::UserNotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_omitted_fields() {
        let user = create_test_user(user::ROLE_PATIENT);
        let mut updated = user.clone();
        updated.emotion_keywords = vec!["grief".to_string()];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .append_query_results([[updated]])
            .into_connection();
        let svc = UserService::new(UserRepository::new(Arc::new(db)));

        let result = svc
            .update_profile(
                "user1",
                UpdateProfileInput {
                    name: None,
                    emotion_keywords: Some(vec![" Grief ".to_string()]),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.name.as_deref(), Some("Amal"));
        assert_eq!(result.emotion_keywords, vec!["grief".to_string()]);
    }

    #[tokio::test]
    async fn test_set_availability_requires_volunteer() {
        let caller = create_test_user(user::ROLE_PATIENT);
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let svc = UserService::new(UserRepository::new(Arc::new(db)));

        let result = svc
            .set_availability(
                &caller,
                AvailabilityInput {
                    date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                    start_time: None,
                    end_time: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_set_availability_rejects_inverted_window() {
        let caller = create_test_user(user::ROLE_VOLUNTEER);
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let svc = UserService::new(UserRepository::new(Arc::new(db)));

        let result = svc
            .set_availability(
                &caller,
                AvailabilityInput {
                    date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                    start_time: Some(time(17, 0)),
                    end_time: Some(time(14, 0)),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_half_open_window_is_rejected() {
        let input = AvailabilityInput {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: Some(time(9, 0)),
            end_time: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_full_day_and_closed_window_are_accepted() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let whole_day = AvailabilityInput {
            date,
            start_time: None,
            end_time: None,
        };
        let closed = AvailabilityInput {
            date,
            start_time: Some(time(14, 0)),
            end_time: Some(time(14, 0)),
        };
        assert!(whole_day.validate().is_ok());
        assert!(closed.validate().is_ok());
    }
}
