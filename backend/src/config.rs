//! Runtime settings read from the environment.
//!
//! Every setting has a default so the server starts with no configuration at
//! all; values that are present but malformed stop start-up.

use crate::error::{MappingError, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_JSON_LIMIT: usize = 10 * 1024 * 1024; // 10 MB

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub schemas_dir: PathBuf,
    pub json_limit: usize,
}

impl AppConfig {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("MAPPER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("MAPPER_PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| MappingError::Config(format!("MAPPER_PORT '{}': {}", port, e)))?,
            None => DEFAULT_PORT,
        };
        let data_dir = PathBuf::from(
            lookup("MAPPER_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );
        let schemas_dir = lookup("MAPPER_SCHEMAS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("schemas"));
        let json_limit = match lookup("MAPPER_JSON_LIMIT") {
            Some(limit) => limit.parse::<usize>().map_err(|e| {
                MappingError::Config(format!("MAPPER_JSON_LIMIT '{}': {}", limit, e))
            })?,
            None => DEFAULT_JSON_LIMIT,
        };

        Ok(Self {
            host,
            port,
            data_dir,
            schemas_dir,
            json_limit,
        })
    }

    /// SQLite file holding the resource configurations.
    pub fn resources_db(&self) -> PathBuf {
        self.data_dir.join("resources.sqlite")
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.url(), "http://127.0.0.1:8080");
        assert_eq!(config.schemas_dir, PathBuf::from("./data/schemas"));
        assert_eq!(config.resources_db(), PathBuf::from("./data/resources.sqlite"));
        assert_eq!(config.json_limit, DEFAULT_JSON_LIMIT);
    }

    #[test]
    fn schemas_dir_follows_data_dir_unless_set() {
        let config = config_from(&[("MAPPER_DATA_DIR", "/srv/ipt")]).unwrap();
        assert_eq!(config.schemas_dir, PathBuf::from("/srv/ipt/schemas"));

        let config = config_from(&[
            ("MAPPER_DATA_DIR", "/srv/ipt"),
            ("MAPPER_SCHEMAS_DIR", "/opt/schemas"),
        ])
        .unwrap();
        assert_eq!(config.schemas_dir, PathBuf::from("/opt/schemas"));
    }

    #[test]
    fn malformed_port_is_rejected() {
        let err = config_from(&[("MAPPER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, MappingError::Config(_)));
    }
}
