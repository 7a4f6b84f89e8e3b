//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//!
//! Rows expose only their hex id outside the store; the internal `id` is
//! skipped on serialization.

pub mod comment;
pub mod crackme;
pub mod notification;
pub mod rating;
pub mod solution;
pub mod user;
