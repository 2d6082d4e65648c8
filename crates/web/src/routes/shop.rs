//! Shop page with category filter.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use super::view::{ProductView, views};
use crate::error::Result;
use crate::services::CatalogService;
use crate::state::AppState;

/// Query parameters for the shop page.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
}

/// One entry of the category facet.
pub struct CategoryLink {
    pub name: String,
    pub selected: bool,
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryLink>,
    pub filtered: bool,
    pub currency: String,
}

/// Display in-stock products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<impl IntoResponse> {
    let config = state.config();
    let catalog = CatalogService::new(state.pool(), state.images(), &config.order_chat);

    let selected = query.category.as_deref().map(str::trim).unwrap_or_default();
    let listing = catalog.list_shop(Some(selected)).await?;

    let categories = listing
        .categories
        .into_iter()
        .map(|name| CategoryLink {
            selected: name == selected,
            name,
        })
        .collect();

    Ok(ShopTemplate {
        products: views(listing.products),
        categories,
        filtered: !selected.is_empty(),
        currency: config.order_chat.currency.clone(),
    })
}
