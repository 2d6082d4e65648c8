//! Domain models for the shop.
//!
//! These types represent validated domain objects, separate from database
//! row types and template view types.

pub mod product;
pub mod session;
pub mod user;

pub use product::{NewProduct, Product};
pub use session::{CurrentAdmin, FlashLevel, FlashMessage, keys as session_keys};
pub use user::User;
