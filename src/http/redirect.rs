//! Redirect responses.

use axum::http::Uri;
use axum::response::Redirect;

use super::path::parse_path;

/// Temporary (307) redirect to `location`, keeping the query string of the
/// original request `from`.
#[must_use]
pub fn redirect(from: &Uri, location: &str) -> Redirect {
    match parse_path(from).query {
        Some(query) => Redirect::temporary(&format!("{location}?{query}")),
        None => Redirect::temporary(location),
    }
}

/// `GET /` when no static directory is served: points clients at `/health`.
pub async fn root_handler(uri: Uri) -> Redirect {
    redirect(&uri, "/health")
}
