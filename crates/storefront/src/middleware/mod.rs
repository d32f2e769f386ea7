//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Rate limiting on auth routes (governor)

pub mod auth;
pub mod cart;
pub mod rate_limit;
pub mod session;

pub use auth::{OptionalUser, RequireUser, clear_current_user, set_current_user};
pub use cart::CartToken;
pub use rate_limit::auth_rate_limiter;
pub use session::create_session_layer;
