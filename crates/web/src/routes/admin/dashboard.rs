//! Admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;

use crate::error::Result;
use crate::middleware::{RequireAdmin, take_flashes};
use crate::models::FlashMessage;
use crate::routes::view::{ProductView, views};
use crate::services::CatalogService;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub flashes: Vec<FlashMessage>,
    pub total: i64,
    pub in_stock: i64,
    pub categories: i64,
    pub products: Vec<ProductView>,
    pub currency: String,
}

/// Display product totals and the full product list.
pub async fn show(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let config = state.config();
    let catalog = CatalogService::new(state.pool(), state.images(), &config.order_chat);
    let summary = catalog.dashboard_summary().await?;

    Ok(DashboardTemplate {
        username: admin.username.into_inner(),
        flashes: take_flashes(&session).await,
        total: summary.counts.total,
        in_stock: summary.counts.in_stock,
        categories: summary.counts.categories,
        products: views(summary.products),
        currency: config.order_chat.currency.clone(),
    })
}
