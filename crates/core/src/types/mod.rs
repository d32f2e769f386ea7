//! Shared type definitions.

pub mod email;
pub mod id;
pub mod money;
pub mod pagination;
pub mod slug;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::final_price;
pub use pagination::{Pagination, clamp_limit};
pub use slug::slugify;
pub use status::{
    OrderStatus, PaymentStatus, ProductStatus, StatusParseError, TransitionError, UserRole,
};
