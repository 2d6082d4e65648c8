//! Admin product management: list, create with image uploads, delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State, multipart::MultipartError},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, push_flash, take_flashes};
use crate::models::FlashMessage;
use crate::routes::products::parse_product_id;
use crate::routes::view::{ProductView, views};
use crate::services::{CatalogError, CatalogService, ImageUpload, NewProductInput};
use crate::state::AppState;

const PRODUCTS_PATH: &str = "/admin/products";

/// Multipart field carrying image files. May repeat.
const IMAGES_FIELD: &str = "images";

/// Product management template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct ProductsTemplate {
    pub flashes: Vec<FlashMessage>,
    pub products: Vec<ProductView>,
    pub categories: Vec<String>,
    pub currency: String,
}

/// Display every product with the creation form.
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let config = state.config();
    let catalog = CatalogService::new(state.pool(), state.images(), &config.order_chat);

    let summary = catalog.dashboard_summary().await?;
    let categories = catalog.list_shop(None).await?.categories;

    Ok(ProductsTemplate {
        flashes: take_flashes(&session).await,
        products: views(summary.products),
        categories,
        currency: config.order_chat.currency.clone(),
    })
}

/// Handle the product creation form.
#[instrument(skip_all)]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Redirect> {
    let (input, uploads) = match read_product_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected product upload");
            push_flash(&session, FlashMessage::danger(format!("Upload failed: {}", e.body_text()))).await;
            return Ok(Redirect::to(PRODUCTS_PATH));
        }
    };

    let config = state.config();
    let catalog = CatalogService::new(state.pool(), state.images(), &config.order_chat);

    match catalog.create_product(input, uploads).await {
        Ok(product_id) => {
            tracing::info!(admin_id = %admin.id, %product_id, "Admin added product");
            push_flash(&session, FlashMessage::success("Product added successfully")).await;
        }
        Err(CatalogError::Validation(message)) => {
            push_flash(&session, FlashMessage::danger(message)).await;
        }
        Err(CatalogError::Storage(e)) => {
            tracing::error!(error = %e, "Failed to store product images");
            push_flash(&session, FlashMessage::danger("Could not save the images")).await;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to(PRODUCTS_PATH))
}

/// Delete a product and its images.
#[instrument(skip_all)]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let config = state.config();
    let catalog = CatalogService::new(state.pool(), state.images(), &config.order_chat);

    let result = match parse_product_id(&id) {
        Ok(id) => catalog.delete_product(id).await.map_err(AppError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            tracing::info!(admin_id = %admin.id, product = %id, "Admin deleted product");
            push_flash(&session, FlashMessage::success("Product deleted")).await;
        }
        Err(AppError::NotFound(_) | AppError::Catalog(CatalogError::NotFound(_))) => {
            push_flash(&session, FlashMessage::danger("Product not found")).await;
        }
        Err(e) => return Err(e),
    }

    Ok(Redirect::to(PRODUCTS_PATH))
}

/// Collect the text fields and image files from the creation form.
///
/// Unknown fields are ignored. File parts keep their submission order.
async fn read_product_form(
    mut multipart: Multipart,
) -> std::result::Result<(NewProductInput, Vec<ImageUpload>), MultipartError> {
    let mut input = NewProductInput::default();
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            IMAGES_FIELD => {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await?;
                uploads.push(ImageUpload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "name" => input.name = field.text().await?,
            "description" => input.description = field.text().await?,
            "price" => input.price = field.text().await?,
            "category" => input.category = field.text().await?,
            _ => {}
        }
    }

    Ok((input, uploads))
}
