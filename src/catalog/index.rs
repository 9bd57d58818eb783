use std::collections::HashMap;

use super::movie::Movie;

/// Reverse mapping from `original_title` to catalog row. When a title
/// occurs more than once the first row wins.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    rows: HashMap<String, usize>,
}

impl TitleIndex {
    pub fn build(catalog: &[Movie]) -> Self {
        let mut rows = HashMap::with_capacity(catalog.len());
        for (row, movie) in catalog.iter().enumerate() {
            rows.entry(movie.original_title.clone()).or_insert(row);
        }
        Self { rows }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, title: &str) -> Option<usize> {
        self.rows.get(title).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
