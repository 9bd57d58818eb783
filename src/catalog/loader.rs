use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::movie::{CreditRecord, Movie, MovieRecord};

/// Loads and joins the movies and credits files into a cleaned catalog.
pub fn load_catalog(movies_path: &Path, credits_path: &Path) -> Result<Vec<Movie>, CatalogError> {
    let movies = read_records::<MovieRecord>(movies_path)?;
    let credits = read_records::<CreditRecord>(credits_path)?;
    info!(
        movies = movies.len(),
        credits = credits.len(),
        "Data loaded successfully"
    );

    let catalog = merge_records(movies, &credits);
    if catalog.is_empty() {
        return Err(CatalogError::Empty);
    }

    info!(rows = catalog.len(), "Data preprocessing completed");
    Ok(catalog)
}

/// Inner join of movies with credits on the movie id. Output follows the
/// movies order, with one row per matching credits row. Missing overviews
/// become empty strings.
pub fn merge_records(movies: Vec<MovieRecord>, credits: &[CreditRecord]) -> Vec<Movie> {
    let mut credit_counts: HashMap<i64, usize> = HashMap::new();
    for credit in credits {
        *credit_counts.entry(credit.movie_id).or_insert(0) += 1;
    }

    let mut catalog = Vec::with_capacity(movies.len());
    for record in movies {
        let matches = credit_counts.get(&record.id).copied().unwrap_or(0);
        if matches == 0 {
            debug!(id = record.id, title = %record.original_title, "Movie has no credits, dropped");
            continue;
        }

        let overview = record.overview.unwrap_or_default();
        for _ in 0..matches {
            catalog.push(Movie::new(record.id, record.original_title.clone(), overview.clone()));
        }
    }

    catalog
}

fn read_records<T>(path: &Path) -> Result<Vec<T>, CatalogError>
where
    T: serde::de::DeserializeOwned,
{
    let bytes = std::fs::read(path).map_err(|e| CatalogError::Read(path.to_path_buf(), e))?;
    let text = decode_text(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in reader.deserialize::<T>() {
        let record = result.map_err(|e| CatalogError::Parse(path.to_path_buf(), e))?;
        records.push(record);
    }

    Ok(records)
}

/// Decodes file contents as UTF-8, falling back to ISO-8859-1.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("File is not valid UTF-8, decoding as ISO-8859-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("Failed to parse {0}: {1}")]
    Parse(PathBuf, csv::Error),
    #[error("No movies left after joining movies with credits")]
    Empty,
}
