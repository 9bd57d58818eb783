pub mod index;
pub mod loader;
pub mod movie;

pub use index::TitleIndex;
pub use loader::{decode_text, load_catalog, merge_records, CatalogError};
pub use movie::{CreditRecord, Movie, MovieRecord};
