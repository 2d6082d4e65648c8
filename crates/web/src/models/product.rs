//! Product domain types.

use chrono::{DateTime, Utc};

use gothic_shop_core::{ImageList, Price, ProductId};

/// A catalog product (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique product ID, assigned by the store.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Unit price in the shop currency.
    pub price: Price,
    /// Stored image filenames, in upload order. Never empty.
    pub images: ImageList,
    /// Free-form category label used for filtering.
    pub category: String,
    /// Whether the product is shown in public listings.
    pub in_stock: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// Validated data for inserting a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub images: ImageList,
    pub category: String,
}
