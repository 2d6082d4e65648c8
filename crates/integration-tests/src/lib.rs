//! Integration test harness for Gothic Shop.
//!
//! Each [`TestApp`] runs the real router in-process against a fresh `SQLite`
//! database and image directory in a temporary directory. Requests go through
//! `tower::ServiceExt::oneshot`; the session cookie from the last response is
//! replayed on the next request, like a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gothic-shop-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use secrecy::SecretString;
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

use gothic_shop_core::{ProductId, Username};
use gothic_shop_web::config::{AdminSeedConfig, DEFAULT_MAX_UPLOAD_BYTES, OrderChatConfig};
use gothic_shop_web::services::CatalogService;
use gothic_shop_web::{AppState, ShopConfig, app};

/// Seeded admin username.
pub const ADMIN_USERNAME: &str = "admin";

/// Seeded admin password.
pub const ADMIN_PASSWORD: &str = "correct horse battery";

const BOUNDARY: &str = "----gothic-shop-test-boundary";

/// A response with its body already read.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Assert a 303 redirect to `path` and return self for chaining.
    #[track_caller]
    pub fn assert_redirect(&self, path: &str) -> &Self {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "expected redirect to {path}");
        assert_eq!(self.location(), Some(path));
        self
    }
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// The application under test.
pub struct TestApp {
    router: Router,
    state: AppState,
    cookie: Option<String>,
    dir: TempDir,
}

impl TestApp {
    /// Start an application with an empty catalog and the seeded admin.
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Like [`Self::spawn`], adjusting the configuration first.
    pub async fn spawn_with(configure: impl FnOnce(&mut ShopConfig)) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        configure(&mut config);
        let state = AppState::initialize(config).await.unwrap();

        Self {
            router: app(state.clone()),
            state,
            cookie: None,
            dir,
        }
    }

    /// Shared application state, for assertions below the HTTP layer.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Directory holding uploaded images.
    #[must_use]
    pub fn image_dir(&self) -> PathBuf {
        self.dir.path().join("images")
    }

    /// Catalog service bound to the application's state.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(
            self.state.pool(),
            self.state.images(),
            &self.state.config().order_chat,
        )
    }

    /// Forget the session cookie (a new browser).
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    /// Send a request, replaying and then updating the session cookie.
    pub async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let mut request = request;
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default().to_owned();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_multipart(&mut self, uri: &str, parts: &[Part<'_>]) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send(request).await
    }

    /// Log in as the seeded admin.
    pub async fn login(&mut self) {
        self.post_form(
            "/admin/login",
            &[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)],
        )
        .await
        .assert_redirect("/admin/dashboard");
    }

    /// Submit the admin creation form with one image and return the new ID.
    pub async fn create_product(
        &mut self,
        name: &str,
        price: &str,
        category: &str,
        filename: &str,
        bytes: &[u8],
    ) -> ProductId {
        let before: Vec<ProductId> = self.all_product_ids().await;

        self.post_multipart(
            "/admin/products",
            &[
                Part::Text("name", name),
                Part::Text("description", "Made for long nights"),
                Part::Text("price", price),
                Part::Text("category", category),
                Part::File {
                    field: "images",
                    filename,
                    content_type: "image/png",
                    bytes,
                },
            ],
        )
        .await
        .assert_redirect("/admin/products");

        self.all_product_ids()
            .await
            .into_iter()
            .find(|id| !before.contains(id))
            .unwrap()
    }

    /// IDs of every product, newest first.
    pub async fn all_product_ids(&self) -> Vec<ProductId> {
        self.catalog()
            .dashboard_summary()
            .await
            .unwrap()
            .products
            .into_iter()
            .map(|p| p.id)
            .collect()
    }
}

fn test_config(dir: &TempDir) -> ShopConfig {
    let root = dir.path();
    ShopConfig {
        database_url: SecretString::from(format!(
            "sqlite://{}",
            root.join("data").join("shop.db").display()
        )),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:5000".to_string(),
        static_dir: root.join("static"),
        product_image_dir: root.join("images"),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        admin: AdminSeedConfig {
            username: Username::parse(ADMIN_USERNAME).unwrap(),
            password: SecretString::from(ADMIN_PASSWORD),
        },
        order_chat: OrderChatConfig {
            base_url: Url::parse("https://wa.me").unwrap(),
            phone: "212632256568".to_string(),
            currency: "MAD".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
