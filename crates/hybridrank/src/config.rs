//! Layered configuration: defaults, then an optional TOML file, then
//! `HYBRIDRANK__*` environment variables (`__` separates nested keys, e.g.
//! `HYBRIDRANK__FUSION__KEYWORD_WEIGHT=0.4`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat, Map};
use hybridrank_core::{ChunkingConfig, FusionConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    corpus::DEFAULT_CANDIDATE_CHUNKS,
    lexical::source::DEFAULT_KEYWORD_LIMIT,
    logging::LoggingConfig,
    vector::EmbeddingConfig,
};

const ENV_PREFIX: &str = "HYBRIDRANK";
const ENV_SEPARATOR: &str = "__";

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Which keyword lookup backs hybrid search.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum KeywordBackend {
    /// Term matching over the in-memory store.
    Memory,
    /// Tantivy BM25 index.
    #[default]
    Lexical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub keyword_backend: KeywordBackend,
    /// Per-lookup deadline; unset means wait indefinitely.
    pub lookup_timeout_ms: Option<u64>,
    /// Global chunk cutoff applied before per-document aggregation.
    pub candidate_chunks: Option<usize>,
    /// Maximum BM25 hits fetched per query.
    pub keyword_limit: usize,
    /// On-disk lexical index location; in memory when unset.
    pub index_dir: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keyword_backend: KeywordBackend::default(),
            lookup_timeout_ms: Some(5_000),
            candidate_chunks: Some(DEFAULT_CANDIDATE_CHUNKS),
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            index_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridRankConfig {
    pub chunking: ChunkingConfig,
    pub fusion: FusionConfig,
    pub search: SearchConfig,
    pub embedding: EmbeddingConfig,
    pub logging: LoggingConfig,
}

impl HybridRankConfig {
    /// Loads configuration from `path` (or the default location when `None`)
    /// and the process environment.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`HybridRankConfig::load`], reading environment overrides from
    /// `env` instead of the process environment when given.
    pub fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path.to_path_buf())
                .format(FileFormat::Toml)
                .required(true),
            None => File::from(Self::default_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(env);

        let config: HybridRankConfig = Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hybridrank")
            .join("config.toml")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking
            .validate()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        self.fusion
            .validate()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        self.embedding
            .validate()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        self.logging
            .validate()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;

        if self.search.lookup_timeout_ms == Some(0) {
            return Err(ConfigError::Validation(
                "search.lookup_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.search.candidate_chunks == Some(0) {
            return Err(ConfigError::Validation(
                "search.candidate_chunks must be greater than 0".to_string(),
            ));
        }
        if self.search.keyword_limit == 0 {
            return Err(ConfigError::Validation(
                "search.keyword_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
