//! Journal service.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use sahemind_common::{AppError, AppResult, IdGenerator};
use sahemind_db::{entities::journal, repositories::JournalRepository};
use sea_orm::Set;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// Journal service for business logic.
#[derive(Clone)]
pub struct JournalService {
    journal_repo: JournalRepository,
    id_gen: IdGenerator,
    tz: Tz,
}

/// Accepts `#rrggbb` hex colors only.
fn validate_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("color"))
    }
}

/// Input for creating a journal.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournalInput {
    #[validate(length(min = 1, max = 64))]
    pub humor: String,

    #[validate(length(max = 256))]
    pub title: Option<String>,

    #[validate(length(max = 20000))]
    pub content: Option<String>,

    #[serde(default)]
    pub is_pinned: bool,

    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

const MAX_TITLE_LEN: usize = 256;
const MAX_CONTENT_LEN: usize = 20000;

/// Tells an explicit `null` (`Some(None)`) apart from an absent field (`None`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Input for updating a journal. Omitted fields are left untouched; `title`
/// and `content` are cleared by an explicit `null`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJournalInput {
    #[validate(length(min = 1, max = 64))]
    pub humor: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub content: Option<Option<String>>,

    pub is_pinned: Option<bool>,

    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,

    pub report: Option<bool>,
}

/// Journals written on one calendar day for one humor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HumorCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Humor label to per-day counts, days ascending.
pub type HumorReport = BTreeMap<String, Vec<HumorCount>>;

/// Group journals by humor and local calendar day.
#[must_use]
pub fn build_humor_report(entries: &[journal::Model], tz: Tz) -> HumorReport {
    let mut grouped: BTreeMap<&str, BTreeMap<NaiveDate, u64>> = BTreeMap::new();

    for entry in entries {
        let date = entry.created_at.with_timezone(&tz).date_naive();
        *grouped
            .entry(entry.humor.as_str())
            .or_default()
            .entry(date)
            .or_default() += 1;
    }

    grouped
        .into_iter()
        .map(|(humor, days)| {
            let counts = days
                .into_iter()
                .map(|(date, count)| HumorCount { date, count })
                .collect();
            (humor.to_string(), counts)
        })
        .collect()
}

impl JournalService {
    /// Create a new journal service. `tz` decides which calendar day an entry belongs to.
    #[must_use]
    pub const fn new(journal_repo: JournalRepository, tz: Tz) -> Self {
        Self {
            journal_repo,
            id_gen: IdGenerator::new(),
            tz,
        }
    }

    /// Load a journal and check that `owner_id` owns it.
    async fn get_owned(&self, owner_id: &str, id: &str) -> AppResult<journal::Model> {
        let journal = self.journal_repo.get_by_id(id).await?;
        if journal.user_id != owner_id {
            return Err(AppError::Forbidden(
                "You can only access your own journals".to_string(),
            ));
        }
        Ok(journal)
    }

    /// Create a journal for `owner_id`.
    pub async fn create(
        &self,
        owner_id: &str,
        input: CreateJournalInput,
    ) -> AppResult<journal::Model> {
        input.validate()?;

        let now = Utc::now();
        let model = journal::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner_id.to_string()),
            humor: Set(input.humor),
            title: Set(input.title),
            content: Set(input.content),
            is_pinned: Set(input.is_pinned),
            color: Set(input
                .color
                .unwrap_or_else(|| journal::DEFAULT_COLOR.to_string())),
            report: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.journal_repo.create(model).await
    }

    /// The owner's journals, pinned first, then newest first.
    pub async fn list(&self, owner_id: &str) -> AppResult<Vec<journal::Model>> {
        self.journal_repo.find_by_user(owner_id).await
    }

    /// The owner's pinned journals, newest first.
    pub async fn list_pinned(&self, owner_id: &str) -> AppResult<Vec<journal::Model>> {
        self.journal_repo.find_pinned_by_user(owner_id).await
    }

    /// Get one of the owner's journals.
    pub async fn get(&self, owner_id: &str, id: &str) -> AppResult<journal::Model> {
        self.get_owned(owner_id, id).await
    }

    /// Merge the given fields into a journal.
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        input: UpdateJournalInput,
    ) -> AppResult<journal::Model> {
        input.validate()?;
        if input
            .title
            .as_ref()
            .and_then(Option::as_ref)
            .is_some_and(|v| v.chars().count() > MAX_TITLE_LEN)
        {
            return Err(AppError::Validation(format!(
                "Journal title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if input
            .content
            .as_ref()
            .and_then(Option::as_ref)
            .is_some_and(|v| v.chars().count() > MAX_CONTENT_LEN)
        {
            return Err(AppError::Validation(format!(
                "Journal content must be at most {MAX_CONTENT_LEN} characters"
            )));
        }

        let journal = self.get_owned(owner_id, id).await?;
        let mut active: journal::ActiveModel = journal.into();

        if let Some(humor) = input.humor {
            active.humor = Set(humor);
        }
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        if let Some(is_pinned) = input.is_pinned {
            active.is_pinned = Set(is_pinned);
        }
        if let Some(color) = input.color {
            active.color = Set(color);
        }
        if let Some(report) = input.report {
            active.report = Set(report);
        }

        active.updated_at = Set(Utc::now().into());

        self.journal_repo.update(active).await
    }

    /// Flip the pin flag.
    pub async fn toggle_pin(&self, owner_id: &str, id: &str) -> AppResult<journal::Model> {
        let journal = self.get_owned(owner_id, id).await?;
        let pinned = journal.is_pinned;

        let mut active: journal::ActiveModel = journal.into();
        active.is_pinned = Set(!pinned);
        active.updated_at = Set(Utc::now().into());

        self.journal_repo.update(active).await
    }

    /// Change only the color.
    pub async fn set_color(
        &self,
        owner_id: &str,
        id: &str,
        color: String,
    ) -> AppResult<journal::Model> {
        self.update(
            owner_id,
            id,
            UpdateJournalInput {
                color: Some(color),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete one of the owner's journals.
    pub async fn delete(&self, owner_id: &str, id: &str) -> AppResult<()> {
        let journal = self.get_owned(owner_id, id).await?;
        self.journal_repo.delete(&journal.id).await
    }

    /// Per-humor daily counts over all of the owner's journals.
    pub async fn humor_report(&self, owner_id: &str) -> AppResult<HumorReport> {
        let entries = self
            .journal_repo
            .find_by_user_chronological(owner_id)
            .await?;
        Ok(build_humor_report(&entries, self.tz))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().into()
    }

    fn create_test_journal(id: &str, owner: &str, humor: &str) -> journal::Model {
        let now = ts(2025, 6, 1, 9);
        journal::Model {
            id: id.to_string(),
            user_id: owner.to_string(),
            humor: humor.to_string(),
            title: Some("Today".to_string()),
            content: Some("A long walk".to_string()),
            is_pinned: false,
            color: journal::DEFAULT_COLOR.to_string(),
            report: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(db: MockDatabase) -> JournalService {
        JournalService::new(
            JournalRepository::new(Arc::new(db.into_connection())),
            chrono_tz::UTC,
        )
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#a1B2c3").is_ok());
        assert!(validate_color("a1b2c3").is_err());
        assert!(validate_color("#a1b2c").is_err());
        assert!(validate_color("#zzzzzz").is_err());
    }

    #[test]
    fn test_humor_report_groups_by_humor_and_day() {
        let mut entries = vec![
            create_test_journal("j1", "u1", "sad"),
            create_test_journal("j2", "u1", "happy"),
            create_test_journal("j3", "u1", "sad"),
            create_test_journal("j4", "u1", "sad"),
        ];
        entries[0].created_at = ts(2025, 6, 2, 8);
        entries[2].created_at = ts(2025, 6, 1, 22);
        entries[3].created_at = ts(2025, 6, 2, 23);

        let report = build_humor_report(&entries, chrono_tz::UTC);

        assert_eq!(report.len(), 2);
        let sad = &report["sad"];
        assert_eq!(sad.len(), 2);
        assert_eq!(sad[0].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(sad[0].count, 1);
        assert_eq!(sad[1].count, 2);

        let total: u64 = report.values().flatten().map(|c| c.count).sum();
        assert_eq!(total, entries.len() as u64);
    }

    #[test]
    fn test_humor_report_uses_local_day() {
        let mut entry = create_test_journal("j1", "u1", "calm");
        entry.created_at = ts(2025, 6, 1, 23);

        let report = build_humor_report(&[entry], chrono_tz::Asia::Tokyo);

        assert_eq!(
            report["calm"][0].date,
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_color_only_leaves_other_fields() {
        let original = create_test_journal("j1", "u1", "calm");
        let mut updated = original.clone();
        updated.color = "#123456".to_string();

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[original.clone()]])
                .append_query_results([[updated]]),
        );

        let result = svc
            .set_color("u1", "j1", "#123456".to_string())
            .await
            .unwrap();

        assert_eq!(result.color, "#123456");
        assert_eq!(result.content, original.content);
        assert_eq!(result.humor, original.humor);
    }

    #[test]
    fn test_update_input_distinguishes_null_from_absent() {
        let cleared: UpdateJournalInput =
            serde_json::from_str(r#"{"title": null, "content": "kept"}"#).unwrap();
        assert_eq!(cleared.title, Some(None));
        assert_eq!(cleared.content, Some(Some("kept".to_string())));

        let untouched: UpdateJournalInput = serde_json::from_str(r#"{"humor": "calm"}"#).unwrap();
        assert_eq!(untouched.title, None);
        assert_eq!(untouched.content, None);
    }

    #[tokio::test]
    async fn test_update_clears_title() {
        let original = create_test_journal("j1", "u1", "calm");
        let mut updated = original.clone();
        updated.title = None;

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[original.clone()]])
                .append_query_results([[updated]]),
        );

        let input: UpdateJournalInput = serde_json::from_str(r#"{"title": null}"#).unwrap();
        let result = svc.update("u1", "j1", input).await.unwrap();

        assert_eq!(result.title, None);
        assert_eq!(result.content, original.content);
    }

    #[tokio::test]
    async fn test_update_rejects_long_title() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = svc
            .update(
                "u1",
                "j1",
                UpdateJournalInput {
                    title: Some(Some("x".repeat(MAX_TITLE_LEN + 1))),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_color_rejects_invalid_color() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = svc.set_color("u1", "j1", "blue".to_string()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_other_users_journal_is_forbidden() {
        let journal = create_test_journal("j1", "owner", "calm");
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[journal]]),
        );

        let result = svc.get("intruder", "j1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_journal() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<journal::Model>::new()]),
        );

        let result = svc.delete("u1", "nope").await;
        assert!(matches!(result, Err(AppError::JournalNotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_pin() {
        let journal = create_test_journal("j1", "u1", "calm");
        let mut pinned = journal.clone();
        pinned.is_pinned = true;

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[journal]])
                .append_query_results([[pinned]]),
        );

        let result = svc.toggle_pin("u1", "j1").await.unwrap();
        assert!(result.is_pinned);
    }

    #[tokio::test]
    async fn test_humor_report_from_repository() {
        let entries = vec![
            create_test_journal("j1", "u1", "calm"),
            create_test_journal("j2", "u1", "calm"),
        ];
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([entries]),
        );

        let report = svc.humor_report("u1").await.unwrap();
        assert_eq!(report["calm"][0].count, 2);
    }
}
