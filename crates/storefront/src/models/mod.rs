//! Domain models returned by storefront endpoints.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartLine};
pub use category::{Anime, Category};
pub use order::{Order, OrderItem, ShippingAddress};
pub use product::{Product, Rating, StockStatus, TaxonomyRef};
pub use session::{CurrentUser, keys};
pub use user::User;
