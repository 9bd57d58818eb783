pub mod handler;
pub mod page;
pub mod render;
pub mod source;

pub use handler::{SubmissionHandler, SubmitError, SubmitOutcome};
pub use page::{FormData, HtmlPage, Page, SubmitEvent};
pub use render::{render_error, render_movie, FETCH_ERROR_MESSAGE, NOT_FOUND_MESSAGE};
pub use source::{FetchError, HttpSource, LocalSource, RecommendationSource};
