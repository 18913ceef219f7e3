use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub solver: SolverSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_gender_mismatch_penalty")]
    pub gender_mismatch_penalty: f64,
    #[serde(default = "default_origin_mismatch_penalty")]
    pub origin_mismatch_penalty: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_state_match_weight")]
    pub state_match: f64,
    #[serde(default = "default_country_match_weight")]
    pub country_match: f64,
    #[serde(default = "default_text_similarity_weight")]
    pub text_similarity: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            gender_mismatch_penalty: default_gender_mismatch_penalty(),
            origin_mismatch_penalty: default_origin_mismatch_penalty(),
            location: default_location_weight(),
            state_match: default_state_match_weight(),
            country_match: default_country_match_weight(),
            text_similarity: default_text_similarity_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            gender_mismatch_penalty: config.gender_mismatch_penalty,
            origin_mismatch_penalty: config.origin_mismatch_penalty,
            location: config.location,
            state_match: config.state_match,
            country_match: config.country_match,
            text_similarity: config.text_similarity,
        }
    }
}

fn default_gender_mismatch_penalty() -> f64 { 20.0 }
fn default_origin_mismatch_penalty() -> f64 { 5.0 }
fn default_location_weight() -> f64 { 3.0 }
fn default_state_match_weight() -> f64 { 2.0 }
fn default_country_match_weight() -> f64 { 1.0 }
fn default_text_similarity_weight() -> f64 { 5.0 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Cost for pairs without a usable score; must stay finite
    #[serde(default = "default_sentinel_cost")]
    pub sentinel_cost: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            sentinel_cost: default_sentinel_cost(),
        }
    }
}

fn default_sentinel_cost() -> f64 { crate::core::DEFAULT_SENTINEL_COST }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            dimension: default_embedding_dimension(),
        }
    }
}

fn default_embedding_provider() -> String { "hash".to_string() }
fn default_embedding_dimension() -> usize { 384 }

#[derive(Debug, Clone, Serialize, Deserialize)]
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
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Explicit file passed on the command line, if any
    /// 5. Environment variables (prefixed with MENTOR_MATCH_)
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            // e.g., MENTOR_MATCH__SCORING__WEIGHTS__LOCATION -> scoring.weights.location
            .add_source(
                Environment::with_prefix("MENTOR_MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a single file, without the default search path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    /// Render the effective settings as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Message(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.scoring.weights;
        let weights = [
            ("gender_mismatch_penalty", w.gender_mismatch_penalty),
            ("origin_mismatch_penalty", w.origin_mismatch_penalty),
            ("location", w.location),
            ("state_match", w.state_match),
            ("country_match", w.country_match),
            ("text_similarity", w.text_similarity),
        ];
        if let Some((name, value)) = weights.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Message(format!(
                "scoring.weights.{} must be finite, got {}",
                name, value
            )));
        }

        if !self.solver.sentinel_cost.is_finite() {
            return Err(ConfigError::Message(
                "solver.sentinel_cost must be finite".to_string(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(ConfigError::Message(
                "embedding.dimension must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
