//! Static frontend served from disk.
//!
//! `/app` and every path below it return `index.html` so the client-side
//! router can take over; `/static/*` serves the directory as-is.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

/// Mount the frontend routes when `dir` holds an `index.html`.
pub fn attach(router: Router, dir: &Path) -> Router {
    let index = dir.join("index.html");
    if !index.is_file() {
        info!(dir = %dir.display(), "No frontend found, serving API only");
        return router;
    }

    router
        .route_service("/app", ServeFile::new(&index))
        .route_service("/app/{*path}", ServeFile::new(&index))
        .nest_service("/static", ServeDir::new(dir))
}
