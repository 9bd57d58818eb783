use tracing::{debug, error, info, warn};

use crate::catalog::{Movie, TitleIndex};
use crate::config::RecommenderConfig;

use super::kernel::SigmoidKernel;
use super::tfidf::{TfidfMatrix, TfidfOptions};
use super::types::Recommendation;

/// Content-based recommender: TF-IDF over overviews, compared with a
/// sigmoid kernel.
pub struct Recommender {
    catalog: Vec<Movie>,
    index: TitleIndex,
    kernel: SigmoidKernel,
    limit: usize,
}

impl Recommender {
    pub fn build(catalog: Vec<Movie>, config: &RecommenderConfig) -> Self {
        let options = TfidfOptions {
            min_df: config.min_df,
            max_ngram: config.max_ngram,
        };

        let overviews: Vec<&str> = catalog.iter().map(|m| m.overview.as_str()).collect();
        let matrix = TfidfMatrix::fit_transform(&overviews, &options);
        info!(
            rows = matrix.n_rows(),
            features = matrix.n_features(),
            "TF-IDF computation completed"
        );

        let kernel = SigmoidKernel::new(&matrix);
        info!("Sigmoid kernel computation completed");

        let index = TitleIndex::build(&catalog);
        info!(titles = index.len(), "Indices created");

        Self {
            catalog,
            index,
            kernel,
            limit: config.limit,
        }
    }

    pub fn movie_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.index.get(title).is_some()
    }

    /// Movies most similar to `title`, best first.
    ///
    /// Every row is ranked by kernel value with a stable descending sort, so
    /// ties keep catalog order. The top entry is skipped as the movie itself
    /// and the next `limit` entries are returned.
    pub fn recommend(&self, title: &str) -> Result<Vec<Recommendation>, RecommendError> {
        let row = self
            .index
            .get(title)
            .ok_or_else(|| RecommendError::NotFound(title.to_string()))?;

        let scores = self
            .kernel
            .scores(row)
            .ok_or(RecommendError::RowOutOfRange(row))?;

        let mut ranked: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .skip(1)
            .take(self.limit)
            .map(|(i, _)| {
                let movie = &self.catalog[i];
                Recommendation::new(movie.original_title.clone(), movie.overview.clone())
            })
            .collect();

        debug!(title, count = recommendations.len(), "Recommendations computed");
        Ok(recommendations)
    }

    /// The response body for a `/recommend` request: recommendations, or a
    /// single sentinel entry when the title is unknown or absent.
    pub fn respond(&self, title: Option<&str>) -> Vec<Recommendation> {
        let Some(title) = title else {
            warn!("Request without a title field");
            return vec![Recommendation::error()];
        };

        match self.recommend(title) {
            Ok(recommendations) => recommendations,
            Err(RecommendError::NotFound(_)) => vec![Recommendation::not_found()],
            Err(e) => {
                error!("Error in recommendation: {}", e);
                vec![Recommendation::error()]
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("Movie not found: {0}")]
    NotFound(String),
    #[error("Row {0} is outside the similarity matrix")]
    RowOutOfRange(usize),
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_catalog() -> Vec<Movie> {
        vec![
            Movie::new(1, "Robot Dawn", "A robot uprising overruns the city."),
            Movie::new(2, "Steel City", "A lone robot defends the city from raiders."),
            Movie::new(3, "Salt Winds", "Pirates hunt treasure on a cursed island."),
            Movie::new(4, "Black Flag", "A pirate crew searches for buried treasure."),
            Movie::new(5, "Quiet Rooms", ""),
        ]
    }

    pub(crate) fn sample_recommender(limit: usize) -> Recommender {
        let config = RecommenderConfig {
            limit,
            min_df: 1,
            max_ngram: 3,
        };
        Recommender::build(sample_catalog(), &config)
    }

    #[test]
    fn test_unknown_title_is_not_found() {
        let recommender = sample_recommender(10);
        assert!(matches!(
            recommender.recommend("Nonexistent"),
            Err(RecommendError::NotFound(_))
        ));
        assert!(!recommender.contains("robot dawn"));
    }

    #[test]
    fn test_excludes_self_and_ranks_similar_first() {
        let recommender = sample_recommender(10);
        let recs = recommender.recommend("Robot Dawn").unwrap();
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0].original_title, "Steel City");
        assert!(recs.iter().all(|r| r.original_title != "Robot Dawn"));
    }

    #[test]
    fn test_limit_caps_results() {
        let recommender = sample_recommender(2);
        let recs = recommender.recommend("Salt Winds").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].original_title, "Black Flag");
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let recommender = sample_recommender(10);
        let recs = recommender.recommend("Quiet Rooms").unwrap();
        // Empty overview: every row ties, the first row is dropped as "self".
        let titles: Vec<&str> = recs.iter().map(|r| r.original_title.as_str()).collect();
        assert_eq!(titles, vec!["Steel City", "Salt Winds", "Black Flag", "Quiet Rooms"]);
    }

    #[test]
    fn test_respond_uses_sentinels() {
        let recommender = sample_recommender(10);
        assert_eq!(recommender.respond(Some("Nope")), vec![Recommendation::not_found()]);
        assert_eq!(recommender.respond(None), vec![Recommendation::error()]);
        assert_eq!(recommender.respond(Some("Black Flag")).len(), 4);
    }
}
