// ============================================================
// APPLICATION CONFIG
// ============================================================
// Layered settings: defaults, refleksija.toml, REFLEKSIJA_* environment

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::survey::SurveyVocabulary;

pub const CONFIG_FILE: &str = "refleksija.toml";
pub const ENV_PREFIX: &str = "REFLEKSIJA_";

/// Fallback variables for the Gemini key, checked in order
const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub log_filter: String,

    /// Optional TOML file replacing the built-in survey vocabulary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_path: Option<PathBuf>,

    #[serde(default)]
    pub llm: LLMConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            data_dir: PathBuf::from("./data"),
            log_filter: "info".to_string(),
            vocabulary_path: None,
            llm: LLMConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env`, then merge defaults, the config file and the environment
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        let mut config = Self::from_figment(Self::figment(Path::new(CONFIG_FILE)))?;
        if config.llm.api_key.is_none() {
            config.llm.api_key = API_KEY_VARS
                .iter()
                .find_map(|name| std::env::var(name).ok())
                .filter(|key| !key.trim().is_empty());
        }

        config.validate().map_err(AppError::ConfigError)?;
        Ok(config)
    }

    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }
        if self.llm.model.trim().is_empty() {
            return Err("llm.model must not be empty".to_string());
        }
        if self.llm.base_url.trim().is_empty() {
            return Err("llm.base_url must not be empty".to_string());
        }
        url::Url::parse(&self.llm.base_url)
            .map_err(|e| format!("llm.base_url is not a valid URL: {}", e))?;
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    /// Built-in vocabulary, or the one at `vocabulary_path`
    pub fn load_vocabulary(&self) -> Result<SurveyVocabulary> {
        let Some(path) = &self.vocabulary_path else {
            return Ok(SurveyVocabulary::default());
        };

        let vocabulary: SurveyVocabulary = Figment::from(Toml::file(path)).extract()?;
        vocabulary.validate().map_err(AppError::ConfigError)?;

        info!(
            path = %path.display(),
            phrases = vocabulary.likert_scale.len(),
            fragments = vocabulary.taxonomy.len(),
            "Loaded survey vocabulary"
        );
        Ok(vocabulary)
    }
}
