//! Database repositories.

mod forum;
mod journal;
mod like;
mod post;
mod post_response;
mod user;

pub use forum::ForumRepository;
pub use journal::JournalRepository;
pub use like::LikeRepository;
pub use post::PostRepository;
pub use post_response::PostResponseRepository;
pub use user::UserRepository;
