//! Raw image serving.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};

use gothic_shop_integration_tests::TestApp;

#[tokio::test]
async fn serves_uploaded_bytes_with_image_type() {
    let mut app = TestApp::spawn().await;
    app.login().await;
    let id = app
        .create_product("Raven Cloak", "450", "Cloaks", "img.png", b"0123456789")
        .await;
    let product = app.catalog().get_product(id).await.unwrap();
    let stored = product.images.first().unwrap();

    let response = app.get(&format!("/images/products/{stored}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers.get(header::CONTENT_TYPE).unwrap(), "image/png");
    assert_eq!(response.body, b"0123456789");
}

#[tokio::test]
async fn unknown_image_is_404() {
    let mut app = TestApp::spawn().await;
    let response = app.get("/images/products/nothing-here.png").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn traversal_outside_image_dir_is_refused() {
    let mut app = TestApp::spawn().await;
    std::fs::write(app.image_dir().join("..").join("secret.txt"), b"secret").unwrap();

    for uri in [
        "/images/products/..%2Fsecret.txt",
        "/images/products/..%5Csecret.txt",
        "/images/products/..",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_ne!(response.body, b"secret");
    }
}

#[tokio::test]
async fn non_ascii_upload_keeps_image_type() {
    let mut app = TestApp::spawn().await;
    app.login().await;
    let id = app
        .create_product("Raven Cloak", "450", "Cloaks", "صورة.jpg", b"jpeg-bytes")
        .await;
    let product = app.catalog().get_product(id).await.unwrap();
    let stored = product.images.first().unwrap();
    assert!(stored.ends_with("_upload.jpg"));

    let response = app.get(&format!("/images/products/{stored}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get(header::CONTENT_TYPE).unwrap(),
        "image/jpeg"
    );
    assert_eq!(response.body, b"jpeg-bytes");
}
