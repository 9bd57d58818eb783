use axum::{extract::Request, http::StatusCode, response::IntoResponse, routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::recommend::RecommenderRepo;
use crate::web::PageRenderer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recommender: Arc<RecommenderRepo>,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(config: Config, recommender: Arc<RecommenderRepo>, pages: PageRenderer) -> Self {
        Self {
            config: Arc::new(config),
            recommender,
            pages: Arc::new(pages),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(crate::web::index).post(crate::web::submit_form))
        .route("/recommend", post(crate::web::recommend))
        .route("/robots.txt", get(robots_txt_handler))
        .fallback(fallback_handler);

    if let Some(ref appdir) = state.config.appdir {
        router = router.fallback_service(ServeDir::new(appdir));
    }

    let routes = router
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Paths are rewritten before the inner router matches them.
    Router::new()
        .fallback_service(routes)
        .layer(axum::middleware::from_fn(crate::middleware::normalize_path))
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method};
    use tower::ServiceExt;

    use crate::recommend::engine::tests::sample_recommender;

    fn app() -> Router {
        let repo = Arc::new(RecommenderRepo::from_recommender(sample_recommender(2)));
        let pages = PageRenderer::new("Test Films").unwrap();
        build_router(AppState::new(Config::default(), repo, pages))
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        axum::http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_recommend_endpoint_returns_json() {
        let response = app()
            .oneshot(form_post("/recommend", "title=Robot+Dawn"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["original_title"], "Steel City");
        assert!(list[0]["overview"].is_string());
    }

    #[tokio::test]
    async fn test_recommend_accepts_multipart_form() {
        let body = "--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"title\"\r\n\r\n\
            Robot Dawn\r\n\
            --XBOUNDARY--\r\n";
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/recommend")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body[0]["original_title"], "Steel City");
    }

    #[tokio::test]
    async fn test_recommend_multipart_without_title_returns_error_sentinel() {
        let body = "--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"genre\"\r\n\r\n\
            drama\r\n\
            --XBOUNDARY--\r\n";
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/recommend")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(
            body_string(response).await,
            r#"[{"original_title":"Error occurred","overview":""}]"#
        );
    }

    #[tokio::test]
    async fn test_recommend_unknown_title_returns_sentinel() {
        let response = app()
            .oneshot(form_post("/recommend", "title=Unknown"))
            .await
            .unwrap();
        assert_eq!(
            body_string(response).await,
            r#"[{"original_title":"Movie not found","overview":""}]"#
        );
    }

    #[tokio::test]
    async fn test_recommend_without_title_returns_error_sentinel() {
        let response = app().oneshot(form_post("/recommend", "other=1")).await.unwrap();
        assert_eq!(
            body_string(response).await,
            r#"[{"original_title":"Error occurred","overview":""}]"#
        );
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let request = axum::http::Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("id=\"recommendationForm\""));
        assert!(html.contains("<div id=\"recommendations\"></div>"));
    }

    #[tokio::test]
    async fn test_form_post_renders_results_and_clears_title() {
        let response = app().oneshot(form_post("/", "title=Salt+Winds")).await.unwrap();
        let html = body_string(response).await;
        assert!(html.contains("<div class=\"movie\"><h3>Black Flag</h3>"));
        assert!(html.contains("value=\"\""));
    }

    #[tokio::test]
    async fn test_form_post_unknown_title_renders_not_found() {
        let response = app().oneshot(form_post("/", "title=Nope")).await.unwrap();
        let html = body_string(response).await;
        assert!(html.contains(
            "<p class=\"error\">Sorry, no recommendations found. Please try another movie.</p>"
        ));
    }

    #[tokio::test]
    async fn test_repeated_slashes_are_collapsed() {
        let request = axum::http::Request::builder()
            .uri("http://localhost//robots.txt")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "User-agent: *\nDisallow: /\n");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let request = axum::http::Request::builder().uri("/missing").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
