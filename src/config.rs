use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub appwrite: Option<AppwriteSettings>,
    #[serde(default)]
    pub collection: CollectionSettings,
    pub ai: AiSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Document store connection; without it the service keeps data in memory
#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_profiles_collection")]
    pub profiles: String,
    #[serde(default = "default_applications_collection")]
    pub applications: String,
    #[serde(default = "default_settings_collection")]
    pub settings: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            profiles: default_profiles_collection(),
            applications: default_applications_collection(),
            settings: default_settings_collection(),
        }
    }
}

fn default_profiles_collection() -> String { "profiles".to_string() }
fn default_applications_collection() -> String { "applications".to_string() }
fn default_settings_collection() -> String { "settings".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    pub completion_url: String,
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

fn default_ai_timeout() -> u64 { 60 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skills_weight")]
    pub skills: u32,
    #[serde(default = "default_experience_weight")]
    pub experience: u32,
    #[serde(default = "default_summary_weight")]
    pub summary: u32,
    #[serde(default = "default_research_bonus")]
    pub research_bonus: u32,
    #[serde(default = "default_phd_bonus")]
    pub phd_bonus: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skills: default_skills_weight(),
            experience: default_experience_weight(),
            summary: default_summary_weight(),
            research_bonus: default_research_bonus(),
            phd_bonus: default_phd_bonus(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            skills: config.skills,
            experience: config.experience,
            summary: config.summary,
            research_bonus: config.research_bonus,
            phd_bonus: config.phd_bonus,
        }
    }
}

fn default_skills_weight() -> u32 { 15 }
fn default_experience_weight() -> u32 { 10 }
fn default_summary_weight() -> u32 { 5 }
fn default_research_bonus() -> u32 { 20 }
fn default_phd_bonus() -> u32 { 25 }

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
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCHOLAR_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCHOLAR__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SCHOLAR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SCHOLAR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
