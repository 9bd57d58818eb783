use axum::{
    extract::Request,
    http::{header, uri::Uri, Method},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info};

/// Rewrites `//recommend` and the like to a single-slash path, keeping the query.
pub async fn normalize_path(mut req: Request, next: Next) -> Response {
    if req.uri().path().contains("//") {
        let path = collapse_slashes(req.uri().path());
        let path_and_query = match req.uri().query() {
            Some(query) => format!("{}?{}", path, query),
            None => path,
        };

        let mut parts = req.uri().clone().into_parts();
        parts.path_and_query = path_and_query.parse().ok();
        match Uri::from_parts(parts) {
            Ok(uri) => *req.uri_mut() = uri,
            Err(e) => debug!("Keeping unnormalized path: {}", e),
        }
    }

    next.run(req).await
}

fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    for c in path.chars() {
        if !(c == '/' && collapsed.ends_with('/')) {
            collapsed.push(c);
        }
    }
    collapsed
}

/// One log line per request. Form submissions and JSON lookups log at info,
/// everything else (static files, robots) at debug.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    if is_recommendation_request(&method, &path) {
        info!(%method, %path, status, %content_type, elapsed_ms, "Recommendation request");
    } else {
        debug!(%method, %path, status, %content_type, elapsed_ms, "Request");
    }

    response
}

fn is_recommendation_request(method: &Method, path: &str) -> bool {
    *method == Method::POST && (path == "/" || path == "/recommend")
}
