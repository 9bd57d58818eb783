use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub appdir: Option<String>,
    #[serde(alias = "sitename", default = "default_site_name")]
    pub site_name: String,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub recommender: RecommenderConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(skip)]
    pub debug_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            appdir: None,
            site_name: default_site_name(),
            dataset: DatasetConfig::default(),
            recommender: RecommenderConfig::default(),
            client: ClientConfig::default(),
            log_format: LogFormat::default(),
            debug_logs: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    #[serde(default = "default_movies_file")]
    pub movies: String,
    #[serde(default = "default_credits_file")]
    pub credits: String,
    /// Seconds between background reloads of the dataset. Unset disables reloading.
    #[serde(default)]
    pub reload_interval: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            movies: default_movies_file(),
            credits: default_credits_file(),
            reload_interval: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommenderConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(alias = "mindf", default = "default_min_df")]
    pub min_df: usize,
    #[serde(alias = "maxngram", default = "default_max_ngram")]
    pub max_ngram: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            min_df: default_min_df(),
            max_ngram: default_max_ngram(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_server_url")]
    pub server: String,
    /// Request timeout in seconds. Unset means wait indefinitely.
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server_url(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_port() -> String {
    "5000".to_string()
}

fn default_site_name() -> String {
    "Movie Recommendation System".to_string()
}

fn default_movies_file() -> String {
    "tmdb_5000_movies.csv".to_string()
}

fn default_credits_file() -> String {
    "tmdb_5000_credits.csv".to_string()
}

fn default_limit() -> usize {
    10
}

fn default_min_df() -> usize {
    3
}

fn default_max_ngram() -> usize {
    3
}

fn default_server_url() -> String {
    "http://localhost:5000".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(path, &content)
    }

    /// Loads the config file if it exists, otherwise falls back to defaults.
    pub fn from_file_or_default(path: &str) -> Result<Self, ConfigError> {
        if std::path::Path::new(path).exists() {
            Self::from_file(path)
        } else {
            Ok(Config::default())
        }
    }

    fn from_yaml(path: &str, content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        if config.recommender.max_ngram == 0 {
            return Err(ConfigError::Invalid("recommender.max_ngram must be at least 1".to_string()));
        }

        if config.dataset.reload_interval == Some(0) {
            return Err(ConfigError::Invalid(
                "dataset.reload_interval must be at least 1 second; omit it to disable reloading".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn movies_path(&self) -> PathBuf {
        PathBuf::from(&self.dataset.movies)
    }

    pub fn credits_path(&self) -> PathBuf {
        PathBuf::from(&self.dataset.credits)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = Config::from_yaml("test.yaml", "{}").unwrap();
        assert_eq!(config.listen.port, "5000");
        assert_eq!(config.site_name, "Movie Recommendation System");
        assert_eq!(config.dataset.movies, "tmdb_5000_movies.csv");
        assert_eq!(config.recommender.limit, 10);
        assert_eq!(config.recommender.min_df, 3);
        assert_eq!(config.recommender.max_ngram, 3);
        assert_eq!(config.client.timeout(), None);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
listen:
  address: 127.0.0.1
  port: "8080"
appdir: ./static
dataset:
  movies: data/movies.csv
  credits: data/credits.csv
  reload_interval: 600
recommender:
  limit: 5
  mindf: 1
client:
  server: http://films.local:8080
  timeout: 30
log_format: json
"#;
        let config = Config::from_yaml("test.yaml", yaml).unwrap();
        assert_eq!(config.listen.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.listen.port, "8080");
        assert_eq!(config.appdir.as_deref(), Some("./static"));
        assert_eq!(config.movies_path(), PathBuf::from("data/movies.csv"));
        assert_eq!(config.dataset.reload_interval, Some(600));
        assert_eq!(config.recommender.limit, 5);
        assert_eq!(config.recommender.min_df, 1);
        assert_eq!(config.client.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_zero_ngram() {
        let yaml = "recommender:\n  max_ngram: 0\n";
        assert!(matches!(
            Config::from_yaml("test.yaml", yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_zero_reload_interval() {
        let yaml = "dataset:\n  reload_interval: 0\n";
        assert!(matches!(
            Config::from_yaml("test.yaml", yaml),
            Err(ConfigError::Invalid(_))
        ));
    }
}
