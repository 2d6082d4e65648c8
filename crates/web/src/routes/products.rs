//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use gothic_shop_core::ProductId;

use super::view::ProductView;
use crate::error::{AppError, Result};
use crate::services::CatalogService;
use crate::state::AppState;

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub product: ProductView,
    pub currency: String,
}

/// Parse a product ID from a path segment. Anything that is not an integer
/// cannot name a product, so it is reported as not found.
pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Display one product with all its images.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let id = parse_product_id(&id)?;
    let config = state.config();
    let catalog = CatalogService::new(state.pool(), state.images(), &config.order_chat);

    let product = catalog.get_product(id).await?;

    Ok(ProductTemplate {
        product: product.into(),
        currency: config.order_chat.currency.clone(),
    })
}
