//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role string for regular members.
pub const ROLE_PATIENT: &str = "patient";
/// Role string for volunteers who can be matched with members.
pub const ROLE_VOLUNTEER: &str = "volunteer";
/// Role string for forum moderators.
pub const ROLE_MODERATOR: &str = "moderator";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    /// `patient`, `volunteer` or `moderator`
    #[sea_orm(default_value = "patient")]
    pub role: String,

    /// Normalized (trimmed, lowercase) emotion keywords
    pub emotion_keywords: Vec<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    /// Access token
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Calendar day the volunteer is available
    #[sea_orm(nullable)]
    pub availability_date: Option<Date>,

    #[sea_orm(nullable)]
    pub availability_start: Option<Time>,

    #[sea_orm(nullable)]
    pub availability_end: Option<Time>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether this account has the volunteer role.
    #[must_use]
    pub fn is_volunteer(&self) -> bool {
        self.role == ROLE_VOLUNTEER
    }

    /// Whether this account has the moderator role.
    #[must_use]
    pub fn is_moderator(&self) -> bool {
        self.role == ROLE_MODERATOR
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal::Entity")]
    Journals,

    #[sea_orm(has_many = "super::post::Entity")]
    Posts,

    #[sea_orm(has_many = "super::post_response::Entity")]
    Responses,
}

impl Related<super::journal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journals.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::post_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
