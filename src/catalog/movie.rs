use serde::{Deserialize, Serialize};

/// One row of the movies CSV. Columns not named here are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRecord {
    pub id: i64,
    pub original_title: String,
    #[serde(default)]
    pub overview: Option<String>,
}

/// One row of the credits CSV. Only the join key is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditRecord {
    pub movie_id: i64,
}

/// A cleaned catalog entry, produced by joining movies with credits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub id: i64,
    pub original_title: String,
    pub overview: String,
}

impl Movie {
    pub fn new(id: i64, original_title: impl Into<String>, overview: impl Into<String>) -> Self {
        Self {
            id,
            original_title: original_title.into(),
            overview: overview.into(),
        }
    }
}
