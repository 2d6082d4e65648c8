//! Raw product image serving.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::error::Result;
use crate::state::AppState;

/// Serve a stored product image by filename.
pub async fn serve(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse> {
    let bytes = state.images().read(&filename).await?;
    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, content_type.to_string())], bytes))
}
