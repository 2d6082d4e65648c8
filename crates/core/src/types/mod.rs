//! Core types for Gothic Shop.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod id;
pub mod image_list;
pub mod price;
pub mod username;

pub use id::*;
pub use image_list::{ImageList, ImageListError};
pub use price::{Price, PriceError};
pub use username::{Username, UsernameError};
