//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, new hub per request)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, in-memory store, signed cookie)
//! 5. Response headers (no-cache and security headers)
//! 6. Body limit (upload size)

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod response_headers;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use flash::{push_flash, take_flashes};
pub use request_id::request_id_middleware;
pub use response_headers::response_headers_middleware;
pub use session::create_session_layer;
