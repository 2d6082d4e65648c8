//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::view::{ProductView, views};
use crate::error::Result;
use crate::services::{CatalogService, FEATURED_LIMIT};
use crate::state::AppState;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub products: Vec<ProductView>,
    pub currency: String,
}

/// Display the newest in-stock products.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let config = state.config();
    let catalog = CatalogService::new(state.pool(), state.images(), &config.order_chat);

    let products = catalog.list_featured(FEATURED_LIMIT).await?;

    Ok(IndexTemplate {
        products: views(products),
        currency: config.order_chat.currency.clone(),
    })
}
