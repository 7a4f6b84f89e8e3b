//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Every query excludes rows with
//! `deleted = true`.

pub mod comment_repo;
pub mod crackme_repo;
pub mod notification_repo;
pub mod rating_repo;
pub mod solution_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use crackme_repo::CrackmeRepo;
pub use notification_repo::NotificationRepo;
pub use rating_repo::RatingRepo;
pub use solution_repo::SolutionRepo;
pub use user_repo::UserRepo;
