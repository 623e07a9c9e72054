//! Business logic services.

#![allow(missing_docs)]

pub mod auth;
pub mod emotion;
pub mod forum;
pub mod journal;
pub mod post;
pub mod post_response;
pub mod user;
pub mod volunteer;

pub use auth::{AuthService, SignupInput, hash_password, verify_password};
pub use emotion::{
    AnalyzeInput, EmotionClassifier, EmotionDistribution, EmotionService, HttpEmotionClassifier,
    LabelScore,
};
pub use forum::{CreateForumInput, ForumService, ForumSummary};
pub use journal::{
    CreateJournalInput, HumorCount, HumorReport, JournalService, UpdateJournalInput,
    build_humor_report,
};
pub use post::{
    CreatePostInput, DEFAULT_POST_LIMIT, LikeToggle, PostService, PostView, ReportInput,
    UpdatePostInput,
};
pub use post_response::{
    CreateResponseInput, DEFAULT_RESPONSE_LIMIT, PostResponseService, ResponseView,
    UpdateResponseInput,
};
pub use user::{AvailabilityInput, UpdateProfileInput, UserService, normalize_keywords};
pub use volunteer::{VolunteerPage, VolunteerService, available_now, match_volunteers};
