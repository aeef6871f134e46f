//! Configuration loader and typed settings.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_EMBEDDING__API_KEY`). Provides a helper to expand `~` and `${VAR}` in
//! paths.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::chunker::ChunkingConfig;
use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use crate::types::SearchParams;

pub const DEFAULT_EMBEDDINGS_ENDPOINT: &str =
    "https://ai-proxy.lab.epam.com/openai/deployments/{deployment}/embeddings";

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Ok(Self::from_figment(Self::figment_for_env(&env_name)))
    }

    /// Defaults, then the TOML files for `env_name`, then `APP_*` variables.
    pub fn figment_for_env(env_name: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment.merge(Env::prefixed("APP_").split("__"))
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::Configuration(format!("Failed to get '{key}': {e}")))
    }

    /// Like [`Config::get`], but an absent key yields `T::default()`.
    pub fn get_or_default<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.contains(key) {
            self.get(key)
        } else {
            Ok(T::default())
        }
    }

    /// Extract and validate the typed settings.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::Configuration(format!("Failed to load settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingSettings,
    pub retrieval: RetrievalSettings,
    pub store: StoreSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.embedding.dimensions == 0 {
            return Err(Error::invalid("embedding.dimensions must be greater than 0"));
        }
        if self.embedding.batch_size == 0 {
            return Err(Error::invalid("embedding.batch_size must be greater than 0"));
        }
        if self.retrieval.min_score_threshold.is_nan() {
            return Err(Error::invalid("retrieval.min_score_threshold must be a number"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// URL template; `{deployment}` is replaced with `deployment`.
    pub endpoint: String,
    pub deployment: String,
    pub api_key: Option<String>,
    pub dimensions: usize,
    pub timeout_secs: u64,
    /// Maximum number of texts sent in one request.
    pub batch_size: usize,
    /// Use the deterministic hashing embedder instead of the remote endpoint.
    pub use_fake: bool,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_EMBEDDINGS_ENDPOINT.to_string(),
            deployment: "text-embedding-3-small-1".to_string(),
            api_key: None,
            dimensions: 1536,
            timeout_secs: 60,
            batch_size: 256,
            use_fake: false,
        }
    }
}

impl EmbeddingSettings {
    pub fn url(&self) -> String {
        self.endpoint.replace("{deployment}", &self.deployment)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub metric: DistanceMetric,
    pub top_k: usize,
    pub min_score_threshold: f64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { metric: DistanceMetric::Cosine, top_k: 3, min_score_threshold: 0.5 }
    }
}

impl RetrievalSettings {
    pub fn search_params(&self) -> SearchParams {
        SearchParams { metric: self.metric, top_k: self.top_k, threshold: self.min_score_threshold }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// LanceDB directory.
    pub uri: String,
    pub table: String,
    pub truncate_before_insert: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { uri: "data/vectordb".to_string(), table: "vectors".to_string(), truncate_before_insert: true }
    }
}

impl StoreSettings {
    pub fn path(&self) -> PathBuf {
        expand_path(&self.uri)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
