use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::storage::ObjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable object store for resume and logo blobs. Default: S3/MinIO.
    pub store: Arc<dyn ObjectStore>,
    pub config: Config,
}
