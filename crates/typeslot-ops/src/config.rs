//! Configuration for the operations layer.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{OpsError, OpsResult};

/// Production prediction endpoint.
pub const INFER_URL: &str = "https://type4py.com/api/predict";
/// Development prediction endpoint.
pub const INFER_URL_DEV: &str = "http://dev.type4py.com/api/predict";
/// Production telemetry endpoint.
pub const TELEMETRY_URL: &str = "https://type4py.com/api/telemetry/accept_type";
/// Development telemetry endpoint.
pub const TELEMETRY_URL_DEV: &str = "http://dev.type4py.com/api/telemetry/accept_type";

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "predictor",
    "infer_url",
    "telemetry_url",
    "fixture_path",
    "dev_mode",
    "filter_predictions",
    "share_accepted_predictions",
    "auto_infer",
    "max_source_kb",
    "infer_timeout_secs",
    "telemetry_timeout_secs",
    "bind",
    "activation_id",
];

/// Which predictor adapter the context is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    /// HTTP prediction service.
    #[default]
    Remote,
    /// Canned payload from a JSON file.
    Fixture,
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictorKind::Remote => write!(f, "remote"),
            PredictorKind::Fixture => write!(f, "fixture"),
        }
    }
}

impl FromStr for PredictorKind {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(PredictorKind::Remote),
            "fixture" => Ok(PredictorKind::Fixture),
            other => Err(OpsError::Config(format!(
                "Unknown predictor: {} (expected remote or fixture)",
                other
            ))),
        }
    }
}

/// Configuration for typeslot operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Predictor adapter to use.
    #[serde(default)]
    pub predictor: PredictorKind,

    /// Override for the prediction endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infer_url: Option<String>,

    /// Override for the telemetry endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry_url: Option<String>,

    /// Payload file for the fixture predictor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture_path: Option<PathBuf>,

    /// Use the development endpoints.
    #[serde(default)]
    pub dev_mode: bool,

    /// Ask the service to filter out unlikely predictions.
    #[serde(default = "default_true")]
    pub filter_predictions: bool,

    /// Report accepted predictions to the telemetry endpoint.
    #[serde(default)]
    pub share_accepted_predictions: bool,

    /// Infer a file on first hint request when nothing is stored for it.
    #[serde(default)]
    pub auto_infer: bool,

    /// Maximum source size sent for prediction (in KB).
    #[serde(default = "default_max_source_kb")]
    pub max_source_kb: u64,

    #[serde(default = "default_infer_timeout_secs")]
    pub infer_timeout_secs: u64,

    #[serde(default = "default_telemetry_timeout_secs")]
    pub telemetry_timeout_secs: u64,

    /// Address the HTTP API binds to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Random per-installation id sent with prediction requests.
    #[serde(default = "new_activation_id")]
    pub activation_id: String,
}

fn default_true() -> bool {
    true
}

fn default_max_source_kb() -> u64 {
    1024
}

fn default_infer_timeout_secs() -> u64 {
    60
}

fn default_telemetry_timeout_secs() -> u64 {
    5
}

fn default_bind() -> String {
    "127.0.0.1:8090".to_string()
}

fn new_activation_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            predictor: PredictorKind::default(),
            infer_url: None,
            telemetry_url: None,
            fixture_path: None,
            dev_mode: false,
            filter_predictions: true,
            share_accepted_predictions: false,
            auto_infer: false,
            max_source_kb: default_max_source_kb(),
            infer_timeout_secs: default_infer_timeout_secs(),
            telemetry_timeout_secs: default_telemetry_timeout_secs(),
            bind: default_bind(),
            activation_id: new_activation_id(),
        }
    }
}

impl Config {
    /// Load configuration from disk with environment overrides.
    ///
    /// The first load writes the file so the generated `activation_id`
    /// stays the same across runs.
    pub fn load() -> OpsResult<Self> {
        let config = match Self::config_file_path() {
            Some(path) => Self::load_or_init(&path)?,
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Load `path`, writing it back when it is missing or lacks an
    /// `activation_id`.
    pub fn load_or_init(path: &Path) -> OpsResult<Self> {
        let (config, complete) = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let value: serde_json::Value = serde_json::from_str(&contents)?;
            let has_id = value.get("activation_id").is_some();
            (serde_json::from_value(value)?, has_id)
        } else {
            (Self::default(), false)
        };

        if !complete {
            match config.save_to(path) {
                Ok(()) => debug!(path = %path.display(), "Persisted activation id"),
                Err(err) => warn!(
                    path = %path.display(),
                    error = %err,
                    "Could not persist config, activation id will change next run"
                ),
            }
        }
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> OpsResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Apply `TYPESLOT_*` environment variables on top of this config.
    pub fn with_env_overrides(mut self) -> OpsResult<Self> {
        if let Ok(predictor) = std::env::var("TYPESLOT_PREDICTOR") {
            self.predictor = predictor.parse()?;
        }
        if let Ok(url) = std::env::var("TYPESLOT_INFER_URL") {
            self.infer_url = Some(url);
        }
        if let Ok(url) = std::env::var("TYPESLOT_TELEMETRY_URL") {
            self.telemetry_url = Some(url);
        }
        if let Ok(path) = std::env::var("TYPESLOT_FIXTURE") {
            self.fixture_path = Some(PathBuf::from(path));
        }
        if let Ok(value) = std::env::var("TYPESLOT_DEV_MODE") {
            self.dev_mode = parse_bool("dev_mode", &value)?;
        }
        if let Ok(bind) = std::env::var("TYPESLOT_BIND") {
            self.bind = bind;
        }
        Ok(self)
    }

    /// Save configuration to disk.
    pub fn save(&self) -> OpsResult<()> {
        if let Some(path) = Self::config_file_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    /// Save configuration to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> OpsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Defaults for every setting except the installation's `activation_id`.
    pub fn reset(&self) -> Self {
        Self {
            activation_id: self.activation_id.clone(),
            ..Self::default()
        }
    }

    /// Get the path to the configuration file.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "typeslot", "typeslot")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Prediction endpoint after applying overrides and dev mode.
    pub fn effective_infer_url(&self) -> &str {
        match &self.infer_url {
            Some(url) => url,
            None if self.dev_mode => INFER_URL_DEV,
            None => INFER_URL,
        }
    }

    /// Telemetry endpoint after applying overrides and dev mode.
    pub fn effective_telemetry_url(&self) -> &str {
        match &self.telemetry_url {
            Some(url) => url,
            None if self.dev_mode => TELEMETRY_URL_DEV,
            None => TELEMETRY_URL,
        }
    }

    /// Maximum source size in bytes.
    pub fn max_source_bytes(&self) -> usize {
        usize::try_from(self.max_source_kb.saturating_mul(1024)).unwrap_or(usize::MAX)
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "predictor" => Some(self.predictor.to_string()),
            "infer_url" => Some(self.effective_infer_url().to_string()),
            "telemetry_url" => Some(self.effective_telemetry_url().to_string()),
            "fixture_path" => self.fixture_path.as_ref().map(|p| p.display().to_string()),
            "dev_mode" => Some(self.dev_mode.to_string()),
            "filter_predictions" => Some(self.filter_predictions.to_string()),
            "share_accepted_predictions" => Some(self.share_accepted_predictions.to_string()),
            "auto_infer" => Some(self.auto_infer.to_string()),
            "max_source_kb" => Some(self.max_source_kb.to_string()),
            "infer_timeout_secs" => Some(self.infer_timeout_secs.to_string()),
            "telemetry_timeout_secs" => Some(self.telemetry_timeout_secs.to_string()),
            "bind" => Some(self.bind.clone()),
            "activation_id" => Some(self.activation_id.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key.
    pub fn set(&mut self, key: &str, value: &str) -> OpsResult<()> {
        match key {
            "predictor" => self.predictor = value.parse()?,
            "infer_url" => self.infer_url = Some(value.to_string()),
            "telemetry_url" => self.telemetry_url = Some(value.to_string()),
            "fixture_path" => self.fixture_path = Some(PathBuf::from(value)),
            "dev_mode" => self.dev_mode = parse_bool(key, value)?,
            "filter_predictions" => self.filter_predictions = parse_bool(key, value)?,
            "share_accepted_predictions" => {
                self.share_accepted_predictions = parse_bool(key, value)?
            }
            "auto_infer" => self.auto_infer = parse_bool(key, value)?,
            "max_source_kb" => self.max_source_kb = parse_number(value)?,
            "infer_timeout_secs" => self.infer_timeout_secs = parse_number(value)?,
            "telemetry_timeout_secs" => self.telemetry_timeout_secs = parse_number(value)?,
            "bind" => self.bind = value.to_string(),
            "activation_id" => {
                return Err(OpsError::Config(
                    "activation_id is generated and cannot be set".to_string(),
                ));
            }
            _ => {
                return Err(OpsError::Config(format!(
                    "Unknown config key: {}. Valid keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> OpsResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(OpsError::Config(format!(
            "Invalid boolean for {}: {}",
            key, value
        ))),
    }
}

fn parse_number(value: &str) -> OpsResult<u64> {
    value
        .parse()
        .map_err(|_| OpsError::Config(format!("Invalid number: {}", value)))
}
