use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::recommender::{
    RecommenderSettings, DEFAULT_CONTRAINDICATION_THRESHOLD, DEFAULT_MAX_RESULTS,
};
use crate::models::ScoringWeights;
use crate::services::embedding::{DEFAULT_DIMENSIONS, DEFAULT_MAX_INPUT_BYTES};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
    pub cache_size: Option<u64>,
    /// Where model files are downloaded (minilm only)
    pub model_cache_dir: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            dimensions: default_dimensions(),
            max_input_bytes: default_max_input_bytes(),
            cache_size: None,
            model_cache_dir: None,
        }
    }
}

fn default_provider() -> String { "hashing".to_string() }
fn default_dimensions() -> usize { DEFAULT_DIMENSIONS }
fn default_max_input_bytes() -> usize { DEFAULT_MAX_INPUT_BYTES }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub ttl_secs: Option<u64>,
    pub max_entries: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_contraindication_threshold")]
    pub contraindication_threshold: f32,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            contraindication_threshold: default_contraindication_threshold(),
            max_results: default_max_results(),
        }
    }
}

impl ScoringSettings {
    pub fn to_recommender_settings(&self) -> RecommenderSettings {
        RecommenderSettings {
            weights: ScoringWeights {
                goals_benefits: self.weights.goals_benefits,
                physical_benefits: self.weights.physical_benefits,
                mental_benefits: self.weights.mental_benefits,
                physical_match: self.weights.physical_match,
                mental_match: self.weights.mental_match,
            },
            contraindication_threshold: self.contraindication_threshold,
            max_results: self.max_results,
        }
    }
}

fn default_contraindication_threshold() -> f32 { DEFAULT_CONTRAINDICATION_THRESHOLD }
fn default_max_results() -> usize { DEFAULT_MAX_RESULTS }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_primary_weight")]
    pub goals_benefits: f64,
    #[serde(default = "default_primary_weight")]
    pub physical_benefits: f64,
    #[serde(default = "default_primary_weight")]
    pub mental_benefits: f64,
    #[serde(default = "default_match_weight")]
    pub physical_match: f64,
    #[serde(default = "default_match_weight")]
    pub mental_match: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            goals_benefits: default_primary_weight(),
            physical_benefits: default_primary_weight(),
            mental_benefits: default_primary_weight(),
            physical_match: default_match_weight(),
            mental_match: default_match_weight(),
        }
    }
}

fn default_primary_weight() -> f64 { 4.0 }
fn default_match_weight() -> f64 { 2.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local configuration file (config/local.toml)
    /// 4. Environment variables (prefixed with ASANA__)
    /// 5. CATALOG_PATH, if set
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ASANA__SERVER__PORT -> server.port
            .add_source(environment());

        if let Ok(path) = std::env::var("CATALOG_PATH") {
            builder = builder.set_override("catalog.path", path)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("ASANA")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
