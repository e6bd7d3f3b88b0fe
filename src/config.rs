use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdzunaConfig {
    pub app_id: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CareerjetConfig {
    pub affid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Seconds between fetch rounds; 0 runs a single round and exits.
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
    #[serde(default = "default_max_jobs")]
    pub max_jobs_per_source: usize,
    /// Restricts fetching to these source names when set.
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub adzuna: AdzunaConfig,
    #[serde(default)]
    pub careerjet: CareerjetConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            check_interval_seconds: default_check_interval(),
            fetch_timeout_seconds: default_fetch_timeout(),
            max_jobs_per_source: default_max_jobs(),
            sources: None,
            adzuna: AdzunaConfig::default(),
            careerjet: CareerjetConfig::default(),
        }
    }
}

fn default_database_path() -> String {
    "jobs.db".to_string()
}

fn default_check_interval() -> u64 {
    3600
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_max_jobs() -> usize {
    100
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.database_path, "jobs.db");
        assert_eq!(config.fetch_timeout_seconds, 30);
        assert_eq!(config.max_jobs_per_source, 100);
        assert!(config.sources.is_none());
        assert!(config.adzuna.app_id.is_none());
        assert!(config.careerjet.affid.is_none());
    }

    #[test]
    fn reads_credentials_and_source_filter() {
        let config = parse_config(
            r#"{
                "database_path": "/tmp/jobs.db",
                "check_interval_seconds": 0,
                "sources": ["remotive", "adzuna"],
                "adzuna": {"app_id": "id", "api_key": "key"},
                "careerjet": {"affid": "aff"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.check_interval_seconds, 0);
        assert_eq!(config.sources.as_deref().map(|s| s.len()), Some(2));
        assert_eq!(config.adzuna.api_key.as_deref(), Some("key"));
        assert_eq!(config.careerjet.affid.as_deref(), Some("aff"));
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        assert!(matches!(parse_config("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(load_config("/nonexistent/config.json"), Err(ConfigError::Io(_))));
    }
}
