use serde::{Deserialize, Serialize};

/// Title the server answers with when the requested movie is unknown.
pub const NOT_FOUND_TITLE: &str = "Movie not found";
/// Title the server answers with when the request itself was unusable.
pub const ERROR_TITLE: &str = "Error occurred";

/// One suggested movie as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub original_title: String,
    pub overview: String,
}

impl Recommendation {
    pub fn new(original_title: impl Into<String>, overview: impl Into<String>) -> Self {
        Self {
            original_title: original_title.into(),
            overview: overview.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(NOT_FOUND_TITLE, "")
    }

    pub fn error() -> Self {
        Self::new(ERROR_TITLE, "")
    }
}
