//! Business logic on top of the repositories.

pub mod analytics;
pub mod email;

pub use analytics::{AnalyticsService, TimeWindow};
pub use email::EmailService;
