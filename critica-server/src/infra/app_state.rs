use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;

use critica_core::notify::Notifier;
use critica_core::store::{CatalogRepo, ReviewRepo, UserRepo};

use crate::infra::config::AuthConfig;

/// Shared per-request state: repositories over one pool, the notification
/// port and the auth settings.
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepo,
    pub catalog: CatalogRepo,
    pub reviews: ReviewRepo,
    pub notifier: Arc<dyn Notifier>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, notifier: Arc<dyn Notifier>, auth: AuthConfig) -> Self {
        Self {
            users: UserRepo::new(pool.clone()),
            catalog: CatalogRepo::new(pool.clone()),
            reviews: ReviewRepo::new(pool),
            notifier,
            auth: Arc::new(auth),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
