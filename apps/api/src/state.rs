use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds read-only configuration only. Language-model clients are per-request
/// (see `letter::session`) because each one carries a user's key.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
