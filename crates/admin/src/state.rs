//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::email::EmailService;

/// How long a computed dashboard payload stays fresh.
const DASHBOARD_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the database pool, the optional SMTP
/// mailer, and a short-lived cache for dashboard aggregates so a dashboard
/// left open in a browser tab does not hammer the database.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    email: Option<EmailService>,
    dashboard_cache: Cache<String, serde_json::Value>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The email service is only constructed when SMTP is configured;
    /// without it, shipping notifications are silently skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be built.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, lettre::transport::smtp::Error> {
        let email = config
            .email
            .as_ref()
            .map(EmailService::from_config)
            .transpose()?;

        let dashboard_cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(DASHBOARD_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                email,
                dashboard_cache,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Get the dashboard cache, keyed by endpoint and window.
    #[must_use]
    pub fn dashboard_cache(&self) -> &Cache<String, serde_json::Value> {
        &self.inner.dashboard_cache
    }
}
