use arc_swap::ArcSwap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::catalog::{load_catalog, CatalogError};
use crate::config::{Config, RecommenderConfig};

use super::engine::Recommender;

/// Holds the live recommender and swaps in a fresh one after each reload.
pub struct RecommenderRepo {
    current: ArcSwap<Recommender>,
    source: Option<DatasetSource>,
}

#[derive(Debug, Clone)]
struct DatasetSource {
    movies: PathBuf,
    credits: PathBuf,
    settings: RecommenderConfig,
}

impl RecommenderRepo {
    /// Loads the dataset named in the config and builds the first recommender.
    pub async fn load(config: &Config) -> Result<Self, RecommenderRepoError> {
        let source = DatasetSource {
            movies: config.movies_path(),
            credits: config.credits_path(),
            settings: config.recommender.clone(),
        };

        let recommender = build_from(source.clone()).await?;
        Ok(Self {
            current: ArcSwap::from_pointee(recommender),
            source: Some(source),
        })
    }

    /// Wraps an already built recommender. Such a repo cannot reload.
    pub fn from_recommender(recommender: Recommender) -> Self {
        Self {
            current: ArcSwap::from_pointee(recommender),
            source: None,
        }
    }

    pub fn current(&self) -> Arc<Recommender> {
        self.current.load_full()
    }

    /// Rebuilds from disk. On failure the previous recommender stays live.
    pub async fn reload(&self) -> Result<(), RecommenderRepoError> {
        let source = self.source.clone().ok_or(RecommenderRepoError::NoSource)?;
        let recommender = build_from(source).await?;
        info!(movies = recommender.movie_count(), "Recommender reloaded");
        self.current.store(Arc::new(recommender));
        Ok(())
    }

    /// Spawns the periodic reload task. Returns false, spawning nothing, for
    /// a zero interval.
    pub fn start_background_reload(self: Arc<Self>, interval_secs: u64) -> bool {
        if interval_secs == 0 {
            warn!("Background reload interval is zero, reloading disabled");
            return false;
        }

        tokio::spawn(async move {
            let period = tokio::time::Duration::from_secs(interval_secs);
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                info!("Starting background dataset reload");
                if let Err(e) = self.reload().await {
                    error!("Background reload failed: {}", e);
                }
            }
        });
        true
    }
}

async fn build_from(source: DatasetSource) -> Result<Recommender, RecommenderRepoError> {
    tokio::task::spawn_blocking(move || -> Result<Recommender, RecommenderRepoError> {
        let catalog = load_catalog(&source.movies, &source.credits)?;
        Ok(Recommender::build(catalog, &source.settings))
    })
    .await
    .map_err(|e| RecommenderRepoError::Task(e.to_string()))?
}

#[derive(Debug, thiserror::Error)]
pub enum RecommenderRepoError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Recommender was not loaded from a dataset")]
    NoSource,
    #[error("Build task failed: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::engine::tests::sample_recommender;

    #[tokio::test]
    async fn test_in_memory_repo_cannot_reload() {
        let repo = RecommenderRepo::from_recommender(sample_recommender(10));
        assert_eq!(repo.current().movie_count(), 5);
        assert!(matches!(repo.reload().await, Err(RecommenderRepoError::NoSource)));
        assert_eq!(repo.current().movie_count(), 5);
    }

    #[tokio::test]
    async fn test_zero_reload_interval_spawns_nothing() {
        let repo = Arc::new(RecommenderRepo::from_recommender(sample_recommender(10)));
        assert!(!repo.clone().start_background_reload(0));
        tokio::task::yield_now().await;
        assert_eq!(repo.current().movie_count(), 5);
    }

    #[tokio::test]
    async fn test_load_fails_on_missing_dataset() {
        let mut config = Config::default();
        config.dataset.movies = "/nonexistent/movies.csv".to_string();
        config.dataset.credits = "/nonexistent/credits.csv".to_string();
        assert!(matches!(
            RecommenderRepo::load(&config).await,
            Err(RecommenderRepoError::Catalog(CatalogError::Read(_, _)))
        ));
    }
}
