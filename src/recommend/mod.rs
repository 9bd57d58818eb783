pub mod engine;
pub mod kernel;
pub mod repo;
pub mod tfidf;
pub mod tokenize;
pub mod types;

pub use engine::{RecommendError, Recommender};
pub use kernel::SigmoidKernel;
pub use repo::{RecommenderRepo, RecommenderRepoError};
pub use tfidf::{TfidfMatrix, TfidfOptions};
pub use types::{Recommendation, ERROR_TITLE, NOT_FOUND_TITLE};
