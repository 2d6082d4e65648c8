//! Cart page. The cart itself lives in the browser.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate;

/// Display the cart page.
pub async fn show() -> impl IntoResponse {
    CartTemplate
}
