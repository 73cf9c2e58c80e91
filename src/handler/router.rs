//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, the
//! atlas/default two-branch dispatch, and CORS finalization.

use crate::config::AppState;
use crate::handler::{atlas, static_files};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Paths with this suffix bypass default static serving.
const ATLAS_SUFFIX: &str = ".atlas";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub access_log: bool,
}

/// Whether a path is served by the specialized atlas branch.
pub fn is_atlas_path(path: &str) -> bool {
    path.ends_with(ATLAS_SUFFIX)
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;
    let access_log = state.config.logging.access_log;

    // 1. Request line before any processing
    if access_log {
        logger::log_request(method, path);
    }
    if path.contains(ATLAS_SUFFIX) {
        logger::log_atlas_request(method, path);
    }

    // 2. Method gate, then explicit two-branch dispatch on the path suffix
    let response = match *method {
        Method::GET | Method::HEAD => {
            let ctx = RequestContext {
                path,
                is_head,
                access_log,
            };
            if is_atlas_path(path) {
                atlas::serve(&ctx, &state).await
            } else {
                static_files::serve(&ctx, &state).await
            }
        }
        Method::OPTIONS => http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response()
        }
    };

    // 3. Every response passes through CORS finalization, regardless of
    // which branch produced it
    let response = http::finalize(response);

    if access_log {
        let entry = access_entry(&req, &response, peer_addr);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Build the formatted access log entry for a completed request
fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
) -> logger::AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = logger::AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::io::Write;

    fn test_state(root: &std::path::Path) -> Arc<AppState> {
        let mut cfg = Config::load_from("no-such-config-file").unwrap();
        cfg.assets.root = root.to_str().unwrap().to_string();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(cfg))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:54321".parse().unwrap()
    }

    fn request(method: Method, path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    /// Asset tree from the delivery layout: a 120-byte atlas and a
    /// 340-byte manifest under characters/hero/
    fn hero_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let hero = dir.path().join("characters/hero");
        std::fs::create_dir_all(&hero).unwrap();

        let mut atlas = std::fs::File::create(hero.join("hero.atlas")).unwrap();
        atlas.write_all(&[b'a'; 120]).unwrap();

        let mut manifest = std::fs::File::create(hero.join("hero.json")).unwrap();
        manifest.write_all(&[b'{'; 340]).unwrap();

        dir
    }

    async fn body_bytes(response: Response<Full<Bytes>>) -> Bytes {
        use http_body_util::BodyExt;
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[test]
    fn test_is_atlas_path() {
        assert!(is_atlas_path("/characters/hero/hero.atlas"));
        assert!(!is_atlas_path("/characters/hero/hero.json"));
        assert!(!is_atlas_path("/hero.atlas.png"));
    }

    #[tokio::test]
    async fn test_get_atlas_success() {
        let dir = hero_tree();
        let state = test_state(dir.path());

        let response = handle_request(
            request(Method::GET, "/characters/hero/hero.atlas"),
            state,
            peer(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("Content-Type").unwrap(), "text/plain");
        assert_eq!(response.headers().get("Content-Length").unwrap(), "120");
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
        let body = body_bytes(response).await;
        assert_eq!(body.len(), 120);
        assert!(body.iter().all(|b| *b == b'a'));
    }

    #[tokio::test]
    async fn test_head_atlas_matches_get_length() {
        let dir = hero_tree();
        let state = test_state(dir.path());

        let response = handle_request(
            request(Method::HEAD, "/characters/hero/hero.atlas"),
            state,
            peer(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("Content-Type").unwrap(), "text/plain");
        assert_eq!(response.headers().get("Content-Length").unwrap(), "120");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_atlas_is_404() {
        let dir = hero_tree();
        let state = test_state(dir.path());

        for method in [Method::GET, Method::HEAD] {
            let response = handle_request(
                request(method, "/characters/hero/missing.atlas"),
                Arc::clone(&state),
                peer(),
            )
            .await
            .unwrap();
            assert_eq!(response.status(), 404);
            assert_eq!(
                response.headers().get("Access-Control-Allow-Origin").unwrap(),
                "*"
            );
        }
    }

    #[tokio::test]
    async fn test_json_manifest_content_type() {
        let dir = hero_tree();
        let state = test_state(dir.path());

        let response = handle_request(
            request(Method::GET, "/characters/hero/hero.json"),
            state,
            peer(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/json"
        );
        assert_eq!(response.headers().get("Content-Length").unwrap(), "340");
    }

    #[tokio::test]
    async fn test_repeated_gets_are_identical() {
        let dir = hero_tree();
        let state = test_state(dir.path());

        let first = handle_request(
            request(Method::GET, "/characters/hero/hero.atlas"),
            Arc::clone(&state),
            peer(),
        )
        .await
        .unwrap();
        let second = handle_request(
            request(Method::GET, "/characters/hero/hero.atlas"),
            state,
            peer(),
        )
        .await
        .unwrap();

        assert_eq!(
            first.headers().get("Content-Length"),
            second.headers().get("Content-Length")
        );
        assert_eq!(body_bytes(first).await, body_bytes(second).await);
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let dir = hero_tree();
        let state = test_state(dir.path());

        let response = handle_request(request(Method::OPTIONS, "/anything"), state, peer())
            .await
            .unwrap();

        assert_eq!(response.status(), 204);
        assert_eq!(
            response.headers().get("Access-Control-Allow-Methods").unwrap(),
            "GET, POST, OPTIONS"
        );
        assert_eq!(
            response.headers().get("Access-Control-Allow-Headers").unwrap(),
            "Content-Type"
        );
    }

    #[tokio::test]
    async fn test_other_methods_rejected_with_cors() {
        let dir = hero_tree();
        let state = test_state(dir.path());

        let response = handle_request(
            request(Method::POST, "/characters/hero/hero.atlas"),
            state,
            peer(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 405);
        assert_eq!(response.headers().get("Allow").unwrap(), "GET, HEAD, OPTIONS");
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }
}
