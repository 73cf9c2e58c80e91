//! Specialized `.atlas` serving
//!
//! The atlas format is plain text with no registered MIME type; default
//! static serving would emit it without a usable Content-Type and the
//! browser-side runtime rejects it. This branch serves the file with the
//! override Content-Type and a byte-exact Content-Length.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// Failure serving an atlas file.
///
/// `NotFound` maps to 404, everything else to 500. The Display strings are
/// what the client sees in the body; full detail goes to the error log.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Atlas file not found")]
    NotFound,
    #[error("Server error: {0}")]
    Io(io::Error),
}

impl ServeError {
    fn from_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(err)
        }
    }
}

/// Serve a GET or HEAD request for an atlas file.
///
/// Failures are mapped to responses here; nothing propagates past the
/// handler boundary.
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let result = if ctx.is_head {
        serve_head(ctx, state).await
    } else {
        serve_get(ctx, state).await
    };

    match result {
        Ok(response) => response,
        Err(ServeError::NotFound) => {
            logger::log_error(&format!("Atlas file not found: {}", ctx.path));
            http::build_404_response("Atlas file not found")
        }
        Err(err) => {
            logger::log_error(&format!("Error serving atlas file '{}': {err}", ctx.path));
            http::build_500_response(&err.to_string())
        }
    }
}

/// GET: read the full file and answer with its exact bytes.
async fn serve_get(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let file_path = resolve(ctx.path, state)?;
    if ctx.access_log {
        logger::log_serving_atlas(ctx.path);
    }

    let content = fs::read(&file_path).await.map_err(ServeError::from_io)?;
    let content_type = state
        .mime
        .resolve(file_path.extension().and_then(|e| e.to_str()));

    let size = content.len() as u64;
    let response = http::response::build_file_response(content, content_type, false);
    if ctx.access_log {
        logger::log_served(ctx.path, size);
    }
    Ok(response)
}

/// HEAD: identical control flow, but the size comes from a metadata query
/// and no byte of the file is read.
async fn serve_head(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let file_path = resolve(ctx.path, state)?;
    let metadata = fs::metadata(&file_path).await.map_err(ServeError::from_io)?;
    let content_type = state
        .mime
        .resolve(file_path.extension().and_then(|e| e.to_str()));

    let response = http::response::build_head_response(metadata.len(), content_type);
    if ctx.access_log {
        logger::log_served(ctx.path, metadata.len());
    }
    Ok(response)
}

/// Resolve a request path against the asset root.
///
/// The URL path is taken relative to the root after stripping the leading
/// separator; canonicalization keeps the result inside the root.
fn resolve(path: &str, state: &AppState) -> Result<PathBuf, ServeError> {
    let relative = path.trim_start_matches('/');
    let file_path = state.asset_root.join(relative);

    let root = state
        .asset_root
        .canonicalize()
        .map_err(ServeError::from_io)?;
    let canonical = file_path.canonicalize().map_err(ServeError::from_io)?;
    if !canonical.starts_with(&root) {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return Err(ServeError::NotFound);
    }

    Ok(canonical)
}
