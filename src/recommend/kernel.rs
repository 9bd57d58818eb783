use super::tfidf::{SparseRow, TfidfMatrix};

/// Sigmoid kernel `tanh(gamma * <x, y> + coef0)` over the rows of a TF-IDF
/// matrix. Rows are scored on demand through an inverted index, so the full
/// pairwise matrix is never held in memory.
#[derive(Debug, Clone)]
pub struct SigmoidKernel {
    rows: Vec<SparseRow>,
    postings: Vec<Vec<(usize, f64)>>,
    gamma: f64,
    coef0: f64,
}

impl SigmoidKernel {
    /// Uses `gamma = 1 / n_features` and `coef0 = 1`.
    pub fn new(matrix: &TfidfMatrix) -> Self {
        let n_features = matrix.n_features();
        let gamma = if n_features > 0 {
            1.0 / n_features as f64
        } else {
            0.0
        };
        Self::with_params(matrix, gamma, 1.0)
    }

    pub fn with_params(matrix: &TfidfMatrix, gamma: f64, coef0: f64) -> Self {
        let mut postings = vec![Vec::new(); matrix.n_features()];
        for (row_index, row) in matrix.rows().iter().enumerate() {
            for &(feature, weight) in row {
                postings[feature].push((row_index, weight));
            }
        }

        Self {
            rows: matrix.rows().to_vec(),
            postings,
            gamma,
            coef0,
        }
    }

    /// Kernel values of `row` against every row, in row order.
    pub fn scores(&self, row: usize) -> Option<Vec<f64>> {
        let query = self.rows.get(row)?;

        let mut dots = vec![0.0; self.rows.len()];
        for &(feature, weight) in query {
            for &(other, other_weight) in &self.postings[feature] {
                dots[other] += weight * other_weight;
            }
        }

        Some(
            dots.into_iter()
                .map(|dot| (self.gamma * dot + self.coef0).tanh())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::tfidf::TfidfOptions;

    /// Pairwise kernel value computed by merging the two sparse rows.
    fn pairwise(kernel: &SigmoidKernel, a: usize, b: usize) -> f64 {
        let (x, y) = (&kernel.rows[a], &kernel.rows[b]);
        let (mut i, mut j, mut dot) = (0, 0, 0.0);
        while i < x.len() && j < y.len() {
            match x[i].0.cmp(&y[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += x[i].1 * y[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        (kernel.gamma * dot + kernel.coef0).tanh()
    }

    fn matrix() -> TfidfMatrix {
        let docs = [
            "robot uprising city",
            "robot city",
            "pirate treasure island",
            "",
        ];
        TfidfMatrix::fit_transform(&docs, &TfidfOptions { min_df: 1, max_ngram: 1 })
    }

    #[test]
    fn test_scores_match_pairwise_kernel() {
        let m = matrix();
        let kernel = SigmoidKernel::new(&m);
        let scores = kernel.scores(0).unwrap();
        assert_eq!(scores.len(), 4);
        for (other, score) in scores.iter().enumerate() {
            assert!((score - pairwise(&kernel, 0, other)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_self_similarity_is_highest() {
        let kernel = SigmoidKernel::new(&matrix());
        let scores = kernel.scores(0).unwrap();
        let gamma = 1.0 / 6.0;
        assert!((scores[0] - (gamma + 1.0f64).tanh()).abs() < 1e-12);
        assert!(scores[0] > scores[1]);
        assert!(scores[1] > scores[2]);
    }

    #[test]
    fn test_unrelated_rows_score_coef0() {
        let kernel = SigmoidKernel::new(&matrix());
        let scores = kernel.scores(3).unwrap();
        assert!(scores.iter().all(|s| (s - 1.0f64.tanh()).abs() < 1e-12));
        assert!(kernel.scores(4).is_none());
    }
}
