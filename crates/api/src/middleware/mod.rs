pub mod identity;
pub mod moderation;
