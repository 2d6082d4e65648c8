//! Catalog service.
//!
//! Everything the storefront and admin routes do with products goes through
//! [`CatalogService`]: listings, creation with image uploads, deletion and the
//! order hand-off link.

mod error;

pub use error::CatalogError;

use sqlx::SqlitePool;
use tracing::instrument;
use url::Url;

use gothic_shop_core::{ImageList, Price, ProductId};

use crate::config::OrderChatConfig;
use crate::db::products::ProductCounts;
use crate::db::{ProductRepository, RepositoryError};
use crate::models::{NewProduct, Product};
use crate::services::assets::ImageStore;

/// Number of products on the landing page.
pub const FEATURED_LIMIT: u32 = 4;

/// Maximum product name length, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum category length, in characters.
pub const MAX_CATEGORY_LENGTH: usize = 50;

/// Raw product fields as submitted by the admin form.
#[derive(Debug, Clone, Default)]
pub struct NewProductInput {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
}

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Filename as sent by the client; may be empty.
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    fn is_blank(&self) -> bool {
        self.filename.trim().is_empty() || self.bytes.is_empty()
    }
}

/// Shop page contents.
#[derive(Debug, Clone)]
pub struct ShopListing {
    /// In-stock products matching the filter, newest first.
    pub products: Vec<Product>,
    /// Every distinct category, regardless of the filter.
    pub categories: Vec<String>,
}

/// Admin dashboard contents.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub counts: ProductCounts,
    pub products: Vec<Product>,
}

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    images: &'a ImageStore,
    order_chat: &'a OrderChatConfig,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(
        pool: &'a SqlitePool,
        images: &'a ImageStore,
        order_chat: &'a OrderChatConfig,
    ) -> Self {
        Self {
            products: ProductRepository::new(pool),
            images,
            order_chat,
        }
    }

    /// In-stock products, newest first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the query fails.
    pub async fn list_featured(&self, limit: u32) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list_in_stock(None, Some(limit)).await?)
    }

    /// In-stock products, optionally restricted to one category, plus the
    /// full category list. A blank category means no filter.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if a query fails.
    pub async fn list_shop(&self, category: Option<&str>) -> Result<ShopListing, CatalogError> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());

        let products = self.products.list_in_stock(category, None).await?;
        let categories = self.products.list_categories().await?;

        Ok(ShopListing {
            products,
            categories,
        })
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this ID.
    /// Returns `CatalogError::Database` if the query fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Validate the input, store the usable uploads in order and persist the
    /// product as in stock.
    ///
    /// Uploads with an empty filename or an empty body are skipped. If a write
    /// fails part way, files stored so far are removed again.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for bad fields, no uploads, a
    /// non-image upload, or when every upload was skipped.
    /// Returns `CatalogError::Storage` if an image cannot be written.
    /// Returns `CatalogError::Database` if the insert fails.
    #[instrument(skip(self, input, uploads), fields(name = %input.name, uploads = uploads.len()))]
    pub async fn create_product(
        &self,
        input: NewProductInput,
        uploads: Vec<ImageUpload>,
    ) -> Result<ProductId, CatalogError> {
        let fields = validate_input(&input)?;

        if uploads.is_empty() {
            return Err(CatalogError::validation("At least one image is required"));
        }

        let usable: Vec<ImageUpload> = uploads.into_iter().filter(|u| !u.is_blank()).collect();
        for upload in &usable {
            if !is_image_filename(&upload.filename) {
                return Err(CatalogError::Validation(format!(
                    "{} is not a supported image file",
                    upload.filename
                )));
            }
        }

        let mut images = ImageList::new();
        for upload in &usable {
            match self.images.store(&upload.filename, &upload.bytes).await {
                Ok(stored) => {
                    if let Err(e) = images.push(stored.clone()) {
                        // Sanitized names never contain the delimiter.
                        self.remove_images(images.iter().chain([stored.as_str()]))
                            .await;
                        return Err(CatalogError::Validation(e.to_string()));
                    }
                }
                Err(e) => {
                    self.remove_images(images.iter()).await;
                    return Err(e.into());
                }
            }
        }

        if images.is_empty() {
            return Err(CatalogError::validation(
                "At least one non-empty image is required",
            ));
        }

        let new_product = NewProduct {
            name: fields.name,
            description: input.description,
            price: fields.price,
            images,
            category: fields.category,
        };

        match self.products.create(&new_product).await {
            Ok(product) => {
                tracing::info!(product_id = %product.id, images = product.images.len(), "Created product");
                Ok(product.id)
            }
            Err(e) => {
                self.remove_images(new_product.images.iter()).await;
                Err(e.into())
            }
        }
    }

    /// Delete a product and then its images.
    ///
    /// Image removal is best effort: failures are logged and do not fail the
    /// call once the record is gone.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist or was
    /// deleted concurrently.
    /// Returns `CatalogError::Database` if a query fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        let product = self.get_product(id).await?;

        self.products.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::NotFound(id),
            other => CatalogError::Database(other),
        })?;

        self.remove_images(product.images.iter()).await;

        tracing::info!(product_id = %id, "Deleted product");
        Ok(())
    }

    /// Build the chat link that carries a prefilled order message.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    /// Returns `CatalogError::Database` if the query fails.
    pub async fn build_order_handoff(&self, id: ProductId) -> Result<Url, CatalogError> {
        let product = self.get_product(id).await?;
        Ok(order_handoff_url(self.order_chat, &product))
    }

    /// Totals and the full product list for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if a query fails.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, CatalogError> {
        let counts = self.products.counts().await?;
        let products = self.products.list_all().await?;
        Ok(DashboardSummary { counts, products })
    }

    async fn remove_images<'n>(&self, names: impl Iterator<Item = &'n str>) {
        for name in names {
            if let Err(e) = self.images.delete(name).await {
                tracing::warn!(file = %name, error = %e, "Failed to remove product image");
            }
        }
    }
}

/// Product fields after validation.
struct ValidFields {
    name: String,
    price: Price,
    category: String,
}

fn validate_input(input: &NewProductInput) -> Result<ValidFields, CatalogError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CatalogError::validation("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CatalogError::Validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }

    let category = input.category.trim();
    if category.is_empty() {
        return Err(CatalogError::validation("Category is required"));
    }
    if category.chars().count() > MAX_CATEGORY_LENGTH {
        return Err(CatalogError::Validation(format!(
            "Category must be at most {MAX_CATEGORY_LENGTH} characters"
        )));
    }

    let price = Price::parse(&input.price)
        .map_err(|e| CatalogError::Validation(format!("Invalid price: {e}")))?;

    Ok(ValidFields {
        name: name.to_owned(),
        price,
        category: category.to_owned(),
    })
}

fn is_image_filename(filename: &str) -> bool {
    mime_guess::from_path(filename)
        .first()
        .is_some_and(|mime| mime.type_() == mime_guess::mime::IMAGE)
}

/// `{base}/{phone}?text={message}` with the message form-encoded.
fn order_handoff_url(chat: &OrderChatConfig, product: &Product) -> Url {
    let message = format!(
        "Hello, I would like to order the product: {} for {} {}",
        product.name, product.price, chat.currency
    );

    let mut url = chat.base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&chat.phone);
    }
    url.query_pairs_mut().clear().append_pair("text", &message);
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::assets::AssetError;
    use crate::test_support::TestDb;
    use tempfile::TempDir;

    struct Fixture {
        db: TestDb,
        images: ImageStore,
        chat: OrderChatConfig,
        _dir: TempDir,
    }

    impl Fixture {
        async fn new() -> Self {
            let dir = TempDir::new().unwrap();
            Self {
                db: TestDb::new().await,
                images: ImageStore::new(dir.path().join("products")),
                chat: OrderChatConfig {
                    base_url: Url::parse("https://wa.me").unwrap(),
                    phone: "212632256568".to_owned(),
                    currency: "MAD".to_owned(),
                },
                _dir: dir,
            }
        }

        fn service(&self) -> CatalogService<'_> {
            CatalogService::new(self.db.pool(), &self.images, &self.chat)
        }
    }

    fn input(name: &str, price: &str, category: &str) -> NewProductInput {
        NewProductInput {
            name: name.to_owned(),
            description: "Black wool, silver clasp".to_owned(),
            price: price.to_owned(),
            category: category.to_owned(),
        }
    }

    fn upload(filename: &str, bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            filename: filename.to_owned(),
            bytes: bytes.to_vec(),
        }
    }

    fn raven_cloak() -> (NewProductInput, Vec<ImageUpload>) {
        (
            input("Raven Cloak", "450", "Cloaks"),
            vec![upload("img.png", b"0123456789")],
        )
    }

    #[tokio::test]
    async fn test_create_and_get_raven_cloak() {
        let fx = Fixture::new().await;
        let catalog = fx.service();
        let (fields, uploads) = raven_cloak();

        let id = catalog.create_product(fields, uploads).await.unwrap();
        let product = catalog.get_product(id).await.unwrap();

        assert_eq!(product.name, "Raven Cloak");
        assert_eq!(product.category, "Cloaks");
        assert_eq!(product.price.to_string(), "450");
        assert!(product.in_stock);
        assert_eq!(product.images.len(), 1);

        let stored = product.images.first().unwrap();
        assert!(stored.ends_with("_img.png"));
        assert_eq!(fx.images.read(stored).await.unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn test_create_keeps_upload_order_and_skips_blanks() {
        let fx = Fixture::new().await;
        let catalog = fx.service();

        let id = catalog
            .create_product(
                input("Bat Ring", "120.50", "Rings"),
                vec![
                    upload("front.png", b"front"),
                    upload("", b"nameless"),
                    upload("empty.png", b""),
                    upload("back.jpg", b"back"),
                ],
            )
            .await
            .unwrap();

        let product = catalog.get_product(id).await.unwrap();
        let names: Vec<&str> = product.images.iter().collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("_front.png"));
        assert!(names[1].ends_with("_back.jpg"));
        assert_eq!(fx.images.read(names[0]).await.unwrap(), b"front");
        assert_eq!(fx.images.read(names[1]).await.unwrap(), b"back");
    }

    #[tokio::test]
    async fn test_create_without_uploads_is_rejected() {
        let fx = Fixture::new().await;
        let catalog = fx.service();

        let err = catalog
            .create_product(input("Raven Cloak", "450", "Cloaks"), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = catalog
            .create_product(
                input("Raven Cloak", "450", "Cloaks"),
                vec![upload("", b""), upload("x.png", b"")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        assert!(catalog.list_featured(FEATURED_LIMIT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_fields() {
        let fx = Fixture::new().await;
        let catalog = fx.service();
        let image = || vec![upload("img.png", b"x")];

        for fields in [
            input("  ", "450", "Cloaks"),
            input(&"n".repeat(101), "450", "Cloaks"),
            input("Raven Cloak", "free", "Cloaks"),
            input("Raven Cloak", "0", "Cloaks"),
            input("Raven Cloak", "450", ""),
            input("Raven Cloak", "450", &"c".repeat(51)),
        ] {
            assert!(matches!(
                catalog.create_product(fields, image()).await,
                Err(CatalogError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_create_rejects_non_image_without_writing() {
        let fx = Fixture::new().await;
        let catalog = fx.service();

        let err = catalog
            .create_product(
                input("Raven Cloak", "450", "Cloaks"),
                vec![upload("img.png", b"ok"), upload("notes.txt", b"hi")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(!fx.images.root().exists());
    }

    #[tokio::test]
    async fn test_list_featured_limit_and_order() {
        let fx = Fixture::new().await;
        let catalog = fx.service();

        let mut ids = Vec::new();
        for i in 0..6 {
            let id = catalog
                .create_product(
                    input(&format!("Item {i}"), "10", "Misc"),
                    vec![upload("img.png", b"x")],
                )
                .await
                .unwrap();
            ids.push(id);
        }

        let featured = catalog.list_featured(FEATURED_LIMIT).await.unwrap();
        let featured_ids: Vec<ProductId> = featured.iter().map(|p| p.id).collect();
        assert_eq!(featured_ids, [ids[5], ids[4], ids[3], ids[2]]);
        assert!(featured.iter().all(|p| p.in_stock));
    }

    #[tokio::test]
    async fn test_list_shop_filter() {
        let fx = Fixture::new().await;
        let catalog = fx.service();

        let (fields, uploads) = raven_cloak();
        let cloak = catalog.create_product(fields, uploads).await.unwrap();
        catalog
            .create_product(input("Bat Ring", "120", "Rings"), vec![upload("r.png", b"r")])
            .await
            .unwrap();

        let cloaks = catalog.list_shop(Some("Cloaks")).await.unwrap();
        assert_eq!(cloaks.products.len(), 1);
        assert_eq!(cloaks.products[0].id, cloak);
        assert_eq!(cloaks.categories, ["Cloaks", "Rings"]);

        let all = catalog.list_shop(Some("  ")).await.unwrap();
        assert_eq!(all.products.len(), 2);

        let none = catalog.list_shop(Some("Hats")).await.unwrap();
        assert!(none.products.is_empty());
        assert_eq!(none.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_files() {
        let fx = Fixture::new().await;
        let catalog = fx.service();
        let (fields, uploads) = raven_cloak();

        let id = catalog.create_product(fields, uploads).await.unwrap();
        let stored = catalog
            .get_product(id)
            .await
            .unwrap()
            .images
            .first()
            .unwrap()
            .to_owned();

        catalog.delete_product(id).await.unwrap();

        assert!(matches!(
            catalog.get_product(id).await,
            Err(CatalogError::NotFound(missing)) if missing == id
        ));
        assert!(matches!(
            fx.images.read(&stored).await,
            Err(AssetError::NotFound(_))
        ));
        assert!(matches!(
            catalog.delete_product(id).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_files() {
        let fx = Fixture::new().await;
        let catalog = fx.service();
        let (fields, uploads) = raven_cloak();

        let id = catalog.create_product(fields, uploads).await.unwrap();
        let product = catalog.get_product(id).await.unwrap();
        for name in product.images.iter() {
            fx.images.delete(name).await.unwrap();
        }

        catalog.delete_product(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_order_handoff_message() {
        let fx = Fixture::new().await;
        let catalog = fx.service();
        let (fields, uploads) = raven_cloak();
        let id = catalog.create_product(fields, uploads).await.unwrap();

        let url = catalog.build_order_handoff(id).await.unwrap();
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/212632256568");

        let text = url
            .query_pairs()
            .find(|(key, _)| key == "text")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        assert_eq!(
            text,
            "Hello, I would like to order the product: Raven Cloak for 450 MAD"
        );
    }

    #[tokio::test]
    async fn test_order_handoff_missing_product() {
        let fx = Fixture::new().await;
        assert!(matches!(
            fx.service().build_order_handoff(ProductId::new(7)).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_dashboard_summary() {
        let fx = Fixture::new().await;
        let catalog = fx.service();
        let (fields, uploads) = raven_cloak();
        catalog.create_product(fields, uploads).await.unwrap();

        let summary = catalog.dashboard_summary().await.unwrap();
        assert_eq!(summary.counts.total, 1);
        assert_eq!(summary.counts.in_stock, 1);
        assert_eq!(summary.products.len(), 1);
    }

    #[test]
    fn test_is_image_filename() {
        assert!(is_image_filename("a.png"));
        assert!(is_image_filename("a.JPG"));
        assert!(is_image_filename("a.webp"));
        assert!(!is_image_filename("a.txt"));
        assert!(!is_image_filename("noext"));
    }

    #[test]
    fn test_handoff_url_with_base_path() {
        let chat = OrderChatConfig {
            base_url: Url::parse("https://chat.example/send/").unwrap(),
            phone: "123".to_owned(),
            currency: "EUR".to_owned(),
        };
        let product = Product {
            id: ProductId::new(1),
            name: "Skull & Roses".to_owned(),
            description: String::new(),
            price: Price::parse("9.99").unwrap(),
            images: ImageList::decode("a.png"),
            category: "Misc".to_owned(),
            in_stock: true,
            created_at: chrono::Utc::now(),
        };

        let url = order_handoff_url(&chat, &product);
        assert_eq!(url.path(), "/send/123");
        let (_, text) = url.query_pairs().next().unwrap();
        assert!(text.contains("Skull & Roses"));
        assert!(text.ends_with("9.99 EUR"));
    }
}
