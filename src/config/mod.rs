use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::core::alert::DEFAULT_MAX_RECORDED;
use crate::core::error::DefenseError;
use crate::core::identity::{default_users, UserSeed};

pub const DEFAULT_CONFIG_PATH: &str = "config/crimson.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_true")]
    pub seed_demo_alerts: bool,
    /// Write critical detections through to the alert store.
    #[serde(default)]
    pub escalate_critical: bool,
    #[serde(default = "default_device")]
    pub device: String,
    #[serde(default = "default_max_recorded")]
    pub max_recorded: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default = "default_users")]
    pub users: Vec<UserSeed>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            latency_budget_ms: default_latency_budget_ms(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            seed_demo_alerts: true,
            escalate_critical: false,
            device: default_device(),
            max_recorded: default_max_recorded(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            alerts: AlertConfig::default(),
            users: default_users(),
        }
    }
}

impl AppConfig {
    pub fn latency_budget(&self) -> Duration {
        Duration::from_millis(self.engine.latency_budget_ms)
    }

    pub fn validate(&self) -> Result<(), DefenseError> {
        if self.engine.latency_budget_ms == 0 {
            return Err(DefenseError::Config(
                "engine.latency_budget_ms must be > 0".to_string(),
            ));
        }
        if self.alerts.max_recorded == 0 {
            return Err(DefenseError::Config(
                "alerts.max_recorded must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load from `path`, or the default location. A missing file yields defaults.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, DefenseError> {
    let path = Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH));

    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| DefenseError::Config(e.to_string()))?;
    let cfg: AppConfig = toml::from_str(&content)?;
    cfg.validate()?;
    Ok(cfg)
}

fn default_latency_budget_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_device() -> String {
    "local-device".to_string()
}

fn default_max_recorded() -> usize {
    DEFAULT_MAX_RECORDED
}
