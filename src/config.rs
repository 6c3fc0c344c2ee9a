use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub lang: String,
    pub country: String,
    pub sys: String,
    pub app_version: String,
    pub catalog_timeout_secs: u64,
    pub archive_timeout_secs: u64,
    pub panel_timeout_secs: u64,
    pub panel_delay_ms: u64,
    pub firmware_version: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.watch.qcy.com/".to_string(),
            lang: "en".to_string(),
            country: "US".to_string(),
            sys: "android".to_string(),
            app_version: "4.0.7_695".to_string(),
            catalog_timeout_secs: 30,
            archive_timeout_secs: 60,
            panel_timeout_secs: 10,
            panel_delay_ms: 300,
            firmware_version: None,
        }
    }
}

impl AppConfig {
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn archive_timeout(&self) -> Duration {
        Duration::from_secs(self.archive_timeout_secs)
    }

    pub fn panel_timeout(&self) -> Duration {
        Duration::from_secs(self.panel_timeout_secs)
    }

    pub fn panel_delay(&self) -> Duration {
        Duration::from_millis(self.panel_delay_ms)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
