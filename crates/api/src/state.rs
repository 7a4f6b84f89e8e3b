use std::sync::Arc;

use crackmes_content::ContentService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the service holds its store and storage roots behind
/// `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub content: ContentService,
    pub config: Arc<ServerConfig>,
}
