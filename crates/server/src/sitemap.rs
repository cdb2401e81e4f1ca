//! Sitemap feed over persisted result identifiers.
//!
//! A thin consumer of the Result Store: every enumerable shared result
//! becomes one `<url>` entry. Enumeration is unordered and capped per tool.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use leafkit_core::{Error, ResultStore, Tool};

use crate::error::ApiError;
use crate::state::AppState;

/// Hard cap on entries contributed by a single tool.
const PER_TOOL_CAP: usize = 1000;

pub async fn serve_sitemap(State(state): State<AppState>) -> Result<Response, ApiError> {
    let xml = build_sitemap(&state.results, &state.config.base_url).await?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

async fn build_sitemap(results: &ResultStore, base_url: &str) -> Result<String, Error> {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for tool in Tool::ALL {
        for hash in results.list_hashes(tool, PER_TOOL_CAP).await? {
            xml.push_str(&format!("  <url><loc>{base}/tools/{}/r/{hash}</loc></url>\n", tool.slug()));
        }
    }

    xml.push_str("</urlset>\n");
    Ok(xml)
}
