//! Admin panel route handlers.
//!
//! Every handler except the login page takes [`RequireAdmin`], so requests
//! without the admin flag are redirected to `/admin/login` before any work
//! is done.
//!
//! [`RequireAdmin`]: crate::middleware::RequireAdmin

pub mod auth;
pub mod dashboard;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the admin routes router (mounted under `/admin`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::show))
        .route("/products", get(products::index).post(products::create))
        .route("/delete_product/{id}", get(products::delete))
}
