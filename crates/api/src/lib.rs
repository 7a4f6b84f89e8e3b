//! HTTP surface of the crackmes content lifecycle.
//!
//! Binds the external collaborators (identity header, moderation token,
//! raw-body uploads) to [`crackmes_content::ContentService`]. Exposed as a
//! library so integration tests and the binary share one router.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
