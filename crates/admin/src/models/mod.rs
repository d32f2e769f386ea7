//! Domain models returned by admin endpoints.

pub mod customer;
pub mod order;
pub mod product;
pub mod session;
pub mod taxonomy;

pub use customer::{Customer, CustomerActivity};
pub use order::{AdminOrder, AdminOrderItem, OrderStatusSummary, ShippingAddress};
pub use product::AdminProduct;
pub use session::{CurrentAdmin, keys};
pub use taxonomy::{Anime, Category};
