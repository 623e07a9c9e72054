//! Database entities.

#![allow(missing_docs)]

pub mod forum;
pub mod forum_moderator;
pub mod journal;
pub mod post;
pub mod post_like;
pub mod post_response;
pub mod response_like;
pub mod user;

pub use forum::Entity as Forum;
pub use forum_moderator::Entity as ForumModerator;
pub use journal::Entity as Journal;
pub use post::Entity as Post;
pub use post_like::Entity as PostLike;
pub use post_response::Entity as PostResponse;
pub use response_like::Entity as ResponseLike;
pub use user::Entity as User;
