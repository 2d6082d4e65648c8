//! Order hand-off to the chat service.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::instrument;

use super::products::parse_product_id;
use crate::error::Result;
use crate::services::CatalogService;
use crate::state::AppState;

/// Redirect (303) to the chat service with a prefilled order message.
#[instrument(skip(state))]
pub async fn handoff(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let id = parse_product_id(&id)?;
    let config = state.config();
    let catalog = CatalogService::new(state.pool(), state.images(), &config.order_chat);

    let target = catalog.build_order_handoff(id).await?;
    tracing::info!(product_id = %id, "Order hand-off");

    Ok(Redirect::to(target.as_str()))
}
