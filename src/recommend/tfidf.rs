use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::tokenize::analyze;

/// A sparse row: `(feature, weight)` pairs sorted by feature.
pub type SparseRow = Vec<(usize, f64)>;

#[derive(Debug, Clone)]
pub struct TfidfOptions {
    pub min_df: usize,
    pub max_ngram: usize,
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            min_df: 3,
            max_ngram: 3,
        }
    }
}

/// Fitted TF-IDF model over a fixed set of documents.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<SparseRow>,
}

impl TfidfMatrix {
    /// Fits the vocabulary and transforms the same documents.
    ///
    /// Terms are kept when at least `min_df` documents contain them. Feature
    /// indices follow the lexical order of the terms. Weights are raw term
    /// counts times the smoothed idf `ln((1 + n) / (1 + df)) + 1`, and each
    /// row is scaled to unit L2 norm. Documents with no surviving terms
    /// become empty rows.
    pub fn fit_transform<S: AsRef<str>>(documents: &[S], options: &TfidfOptions) -> Self {
        let analyzed: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for term in analyze(doc.as_ref(), options.max_ngram) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for counts in &analyzed {
            for term in counts.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let min_df = options.min_df.max(1);
        let n_docs = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::new();
        for (term, df) in document_frequency.iter().filter(|(_, df)| **df >= min_df) {
            vocabulary.insert(term.to_string(), idf.len());
            idf.push(((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0);
        }

        let rows = analyzed
            .iter()
            .map(|counts| {
                let mut row: SparseRow = counts
                    .iter()
                    .filter_map(|(term, count)| {
                        vocabulary
                            .get(term)
                            .map(|&feature| (feature, *count as f64 * idf[feature]))
                    })
                    .collect();
                row.sort_by_key(|(feature, _)| *feature);
                normalize(&mut row);
                row
            })
            .collect();

        debug!(
            documents = documents.len(),
            features = idf.len(),
            "TF-IDF matrix fitted"
        );

        Self {
            vocabulary,
            idf,
            rows,
        }
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&SparseRow> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    pub fn feature(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, feature: usize) -> Option<f64> {
        self.idf.get(feature).copied()
    }
}

fn normalize(row: &mut SparseRow) {
    let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in row.iter_mut() {
            *w /= norm;
        }
    }
}
