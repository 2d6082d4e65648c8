//! Public storefront pages, order hand-off and response headers.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use url::Url;

use gothic_shop_core::ProductId;
use gothic_shop_integration_tests::TestApp;
use gothic_shop_web::db::ProductRepository;

// ---------------------------------------------------------------------------
// Featured listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn featured_shows_newest_four_in_stock() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let mut ids = Vec::new();
    for name in ["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot"] {
        ids.push(app.create_product(name, "10", "Misc", "img.png", b"x").await);
    }
    ProductRepository::new(app.state().pool())
        .set_in_stock(ids[4], false)
        .await
        .unwrap();

    let page = app.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    let body = page.text();

    // Echo is hidden; the next four newest remain, newest first.
    assert!(!body.contains("Echo"));
    assert!(!body.contains("Alpha"));
    let positions: Vec<usize> = ["Foxtrot", "Delta", "Charlie", "Bravo"]
        .iter()
        .map(|name| body.find(name).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn empty_catalog_renders() {
    let mut app = TestApp::spawn().await;
    let page = app.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text().contains("No products yet"));
}

// ---------------------------------------------------------------------------
// Shop and detail pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shop_filters_by_category() {
    let mut app = TestApp::spawn().await;
    app.login().await;
    app.create_product("Raven Cloak", "450", "Cloaks", "img.png", b"0123456789")
        .await;
    app.create_product("Bat Ring", "120", "Rings", "ring.png", b"ring")
        .await;

    let all = app.get("/shop").await.text();
    assert!(all.contains("Raven Cloak"));
    assert!(all.contains("Bat Ring"));

    let cloaks = app.get("/shop?category=Cloaks").await.text();
    assert!(cloaks.contains("Raven Cloak"));
    assert!(!cloaks.contains("Bat Ring"));
    // The facet still lists every category.
    assert!(cloaks.contains("category=Rings"));

    let blank = app.get("/shop?category=").await.text();
    assert!(blank.contains("Raven Cloak"));
    assert!(blank.contains("Bat Ring"));
}

#[tokio::test]
async fn product_page_lists_all_images() {
    let mut app = TestApp::spawn().await;
    app.login().await;
    let id = app
        .create_product("Raven Cloak", "450", "Cloaks", "img.png", b"0123456789")
        .await;

    let page = app.get(&format!("/product/{id}")).await;
    assert_eq!(page.status, StatusCode::OK);
    let body = page.text();
    assert!(body.contains("Raven Cloak"));
    assert!(body.contains("450 MAD"));

    let product = app.catalog().get_product(id).await.unwrap();
    for name in product.images.iter() {
        assert!(body.contains(&format!("/images/products/{name}")));
    }
}

#[tokio::test]
async fn missing_product_is_404() {
    let mut app = TestApp::spawn().await;
    assert_eq!(app.get("/product/999").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/product/abc").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cart_page_renders() {
    let mut app = TestApp::spawn().await;
    let page = app.get("/cart").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text().contains("Your cart"));
}

// ---------------------------------------------------------------------------
// Order hand-off
// ---------------------------------------------------------------------------

#[tokio::test]
async fn order_redirects_to_chat_with_message() {
    let mut app = TestApp::spawn().await;
    app.login().await;
    let id = app
        .create_product("Raven Cloak", "450", "Cloaks", "img.png", b"0123456789")
        .await;

    let response = app.get(&format!("/order/{id}")).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let target = Url::parse(response.location().unwrap()).unwrap();
    assert_eq!(target.host_str(), Some("wa.me"));
    assert_eq!(target.path(), "/212632256568");

    let (_, text) = target
        .query_pairs()
        .find(|(key, _)| key == "text")
        .unwrap();
    assert!(text.contains("Raven Cloak"));
    assert!(text.contains("450"));
}

#[tokio::test]
async fn order_for_missing_product_is_404() {
    let mut app = TestApp::spawn().await;
    let response = app.get(&format!("/order/{}", ProductId::new(42))).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Headers and health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn responses_are_never_cached() {
    let mut app = TestApp::spawn().await;

    for uri in ["/", "/shop", "/admin/login", "/product/1"] {
        let response = app.get(uri).await;
        assert_eq!(
            response.headers.get(header::CACHE_CONTROL).unwrap(),
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(response.headers.get(header::PRAGMA).unwrap(), "no-cache");
        assert_eq!(response.headers.get(header::EXPIRES).unwrap(), "0");
    }
}

#[tokio::test]
async fn responses_carry_request_id() {
    let mut app = TestApp::spawn().await;
    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let id = response.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn readiness_checks_database() {
    let mut app = TestApp::spawn().await;
    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);
}
