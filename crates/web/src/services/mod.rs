//! Business logic services.
//!
//! # Services
//!
//! - `assets` - Product image files on disk
//! - `auth` - Admin username/password authentication
//! - `catalog` - Product listings, creation, deletion and order hand-off

pub mod assets;
pub mod auth;
pub mod catalog;

pub use assets::{AssetError, ImageStore};
pub use auth::{AuthError, AuthService};
pub use catalog::{
    CatalogError, CatalogService, DashboardSummary, FEATURED_LIMIT, ImageUpload, NewProductInput,
    ShopListing,
};
