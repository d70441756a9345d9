use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use serde_yaml;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const IN_MEMORY: &str = ":memory:";

#[derive(Parser, Debug)]
#[command(name = "booknotes")]
#[command(about = "Runs the booknotes service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".booknotes")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    database: String,
    port: u16,
    #[serde(default = "default_host")]
    host: String,
    #[serde(default)]
    pub turso_url: Option<String>,
    #[serde(default)]
    pub turso_auth_token: Option<String>,
    #[serde(default = "default_sync_interval")]
    pub sync_interval_seconds: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_sync_interval() -> u64 {
    60
}

impl Default for App {
    fn default() -> Self {
        App {
            database: IN_MEMORY.to_string(),
            port: 3000,
            host: default_host(),
            turso_url: None,
            turso_auth_token: None,
            sync_interval_seconds: default_sync_interval(),
        }
    }
}

impl App {
    pub fn get_db(&self) -> &str {
        &self.database
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database == IN_MEMORY
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub app: App,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path).with_context(|| format!("failed to load config from {path}"))?;
        Ok(cfg)
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Config> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!(var = var_name, "environment variable not found");
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let cfg = Config::from_yaml("app:\n  database: books.db\n  port: 8080\n").unwrap();
        assert_eq!(cfg.app.get_db(), "books.db");
        assert_eq!(cfg.app.get_port(), 8080);
        assert_eq!(cfg.app.get_address(), "0.0.0.0:8080");
        assert_eq!(cfg.app.sync_interval_seconds, 60);
        assert!(cfg.app.turso_url.is_none());
        assert!(!cfg.app.is_in_memory());
    }

    #[test]
    fn substitutes_defaults_for_unset_vars() {
        let yaml = "app:\n  database: \"${BOOKNOTES_TEST_UNSET_DB:-:memory:}\"\n  port: ${BOOKNOTES_TEST_UNSET_PORT:-4000}\n";
        let cfg = Config::from_yaml(yaml).unwrap();
        assert!(cfg.app.is_in_memory());
        assert_eq!(cfg.app.get_port(), 4000);
    }

    #[test]
    fn substitutes_set_vars() {
        let path = env::var("PATH").unwrap_or_default();
        let out = Config::substitute_env_vars("value: ${PATH}").unwrap();
        assert_eq!(out, format!("value: {path}"));
    }

    #[test]
    fn unterminated_placeholder_is_left_alone() {
        let out = Config::substitute_env_vars("value: ${OOPS").unwrap();
        assert_eq!(out, "value: ${OOPS");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::new("/definitely/not/here/config.yaml").unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }
}
