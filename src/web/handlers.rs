use axum::{
    extract::{Form, FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::client::page::TITLE_FIELD;
use crate::client::{FormData, HtmlPage, LocalSource, Page, SubmissionHandler, SubmitEvent};
use crate::recommend::Recommendation;
use crate::server::AppState;

pub async fn index(State(state): State<AppState>) -> Response {
    render_page(&state, "", "")
}

/// Form posted without client-side scripting: runs the submission cycle
/// in-process and returns the page with the results filled in.
pub async fn submit_form(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let mut form = FormData::new();
    for (name, value) in fields {
        form.append(name, value);
    }

    let page = Mutex::new(HtmlPage::with_title(form.title().unwrap_or_default()));
    let handler = SubmissionHandler::new(LocalSource::new(state.recommender.clone()));
    let mut event = SubmitEvent::new(form);
    handler.handle(&mut event, &page).await;

    let page = page.into_inner();
    render_page(&state, page.title_value(), page.output())
}

/// Recommendations as JSON. Accepts urlencoded and multipart form bodies;
/// a missing or unreadable `title` yields the error sentinel.
pub async fn recommend(State(state): State<AppState>, req: Request) -> Json<Vec<Recommendation>> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let title = if is_multipart {
        multipart_title(req, &state).await
    } else {
        match Form::<HashMap<String, String>>::from_request(req, &state).await {
            Ok(Form(mut params)) => params.remove(TITLE_FIELD),
            Err(e) => {
                debug!("Unreadable form body: {}", e);
                None
            }
        }
    };

    let recommender = state.recommender.current();
    Json(recommender.respond(title.as_deref()))
}

async fn multipart_title(req: Request, state: &AppState) -> Option<String> {
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(e) => {
            debug!("Unreadable multipart body: {}", e);
            return None;
        }
    };

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(TITLE_FIELD) => return field.text().await.ok(),
            Ok(Some(_)) => continue,
            Ok(None) => return None,
            Err(e) => {
                debug!("Bad multipart field: {}", e);
                return None;
            }
        }
    }
}

fn render_page(state: &AppState, title: &str, recommendations: &str) -> Response {
    match state.pages.render(title, recommendations) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render page: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
