pub mod crackme;
pub mod moderation;
pub mod notification;
pub mod user;
