//! Default static file serving
//!
//! The delegate branch for everything that is not an atlas file: path
//! cleanup, containment check against the asset root, index-file fallback,
//! and content-type resolution.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

/// Serve a GET or HEAD request from the asset root.
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match load(ctx.path, state).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_served(ctx.path, content.len() as u64);
            }
            http::response::build_file_response(content, content_type, ctx.is_head)
        }
        None => http::build_404_response("404 Not Found"),
    }
}

/// Load a file from the asset root, with index-file fallback for
/// directory paths.
async fn load(path: &str, state: &AppState) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");
    let mut file_path = state.asset_root.join(&clean_path);

    let root = match state.asset_root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Asset root not found or inaccessible '{}': {e}",
                state.asset_root.display()
            ));
            return None;
        }
    };

    // Directory paths fall back to the configured index files
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in &state.config.assets.index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let canonical = file_path.canonicalize().ok()?;
    if !canonical.starts_with(&root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                canonical.display()
            ));
            return None;
        }
    };

    let content_type = state
        .mime
        .resolve(canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}
