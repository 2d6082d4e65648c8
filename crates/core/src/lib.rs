//! Gothic Shop Core - Shared domain types.
//!
//! This crate provides the types used by every Gothic Shop component:
//! - `web` - Storefront and admin panel (one axum binary)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and their validation rules - no I/O,
//! no database access, no HTTP. Persistence adapters live in the `web` crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, usernames and the product image list codec

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
