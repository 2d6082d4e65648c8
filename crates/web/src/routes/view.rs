//! Template-facing product data.

use crate::models::Product;

/// URL prefix under which stored product images are served.
pub const IMAGE_URL_PREFIX: &str = "/images/products";

/// A product prepared for rendering.
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub in_stock: bool,
    /// Image URLs in upload order.
    pub image_urls: Vec<String>,
    pub created_at: String,
}

impl ProductView {
    /// URL of the first image, used as thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> &str {
        self.image_urls.first().map_or("", String::as_str)
    }
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.as_i64(),
            image_urls: product.images.iter().map(image_url).collect(),
            name: product.name,
            description: product.description,
            price: product.price.to_string(),
            category: product.category,
            in_stock: product.in_stock,
            created_at: product.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Public URL of a stored image.
#[must_use]
pub fn image_url(stored_name: &str) -> String {
    format!("{IMAGE_URL_PREFIX}/{stored_name}")
}

/// Convert a list of products for rendering.
pub fn views(products: Vec<Product>) -> Vec<ProductView> {
    products.into_iter().map(ProductView::from).collect()
}
