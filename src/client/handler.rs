use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::recommend::{Recommendation, NOT_FOUND_TITLE};

use super::page::{Page, SubmitEvent};
use super::render::{render_error, render_movie, FETCH_ERROR_MESSAGE, NOT_FOUND_MESSAGE};
use super::source::{FetchError, RecommendationSource};

/// What one submission did to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rendered this many movie blocks.
    Rendered(usize),
    NotFound,
    Failed,
    /// A newer submission was made while this one was pending; its response
    /// was dropped without touching the page.
    Stale,
}

/// One element of the response array. Fields that are absent or not
/// strings are `None`; such entries are skipped when rendering.
#[derive(Debug)]
struct ResponseEntry {
    original_title: Option<String>,
    overview: Option<String>,
}

impl ResponseEntry {
    fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            original_title: field("original_title"),
            overview: field("overview"),
        }
    }
}

/// Runs the submit, fetch, render cycle for the recommendation form.
pub struct SubmissionHandler<S> {
    source: S,
    generation: AtomicU64,
}

impl<S: RecommendationSource> SubmissionHandler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            generation: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Handles one submit event against `page`.
    ///
    /// The page lock is only taken once the response is in, so overlapping
    /// submissions may run concurrently. Only the most recent one renders.
    pub async fn handle<P: Page>(&self, event: &mut SubmitEvent, page: &Mutex<P>) -> SubmitOutcome {
        event.prevent_default();

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.fetch_entries(event).await;

        let mut page = page.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding stale recommendation response");
            return SubmitOutcome::Stale;
        }

        let outcome = match result {
            Ok(entries) => render_entries(&mut *page, &entries),
            Err(e) => {
                error!("Error: {}", e);
                page.set_output(render_error(FETCH_ERROR_MESSAGE));
                SubmitOutcome::Failed
            }
        };

        page.clear_title();
        outcome
    }

    async fn fetch_entries(&self, event: &SubmitEvent) -> Result<Vec<ResponseEntry>, SubmitError> {
        let body = self.source.fetch(event.form()).await?;
        let values: Vec<Value> = serde_json::from_str(&body)?;
        Ok(values.iter().map(ResponseEntry::from_value).collect())
    }
}

fn render_entries<P: Page + ?Sized>(page: &mut P, entries: &[ResponseEntry]) -> SubmitOutcome {
    page.clear_output();

    let not_found = match entries.first() {
        None => true,
        Some(first) => first.original_title.as_deref() == Some(NOT_FOUND_TITLE),
    };
    if not_found {
        page.set_output(render_error(NOT_FOUND_MESSAGE));
        return SubmitOutcome::NotFound;
    }

    let mut rendered = 0;
    for entry in entries {
        if let (Some(title), Some(overview)) = (&entry.original_title, &entry.overview) {
            page.append_output(&render_movie(&Recommendation::new(title.clone(), overview.clone())));
            rendered += 1;
        }
    }
    SubmitOutcome::Rendered(rendered)
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("Invalid response: {0}")]
    Parse(#[from] serde_json::Error),
}
