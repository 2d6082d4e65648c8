//! Gothic Shop web application.
//!
//! A small product catalog with a public storefront, an admin panel for
//! adding and removing products, and an order hand-off that sends shoppers to
//! a chat service with a prefilled message.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for server-side rendering
//! - `SQLite` via sqlx for products and admin accounts
//! - Product images stored on the local filesystem
//! - In-memory sessions with a signed cookie

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::ShopConfig;
pub use routes::app;
pub use state::AppState;
