use std::env;
use std::fs;

use serde::Deserialize;

use crate::common::error::{Result, WeekError};

const CONFIG_PATH: &str = "config.toml";

/// Service configuration. Non-secret settings come from `config.toml` when
/// it exists (all keys optional); secrets only ever come from the
/// environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub data_file: String,
    pub public_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_file: "data/week.json".to_string(),
            public_dir: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// `owner/name` slug of the repository hosting the published file
    pub repo: String,
    pub file_path: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            file_path: "data/week.json".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = match fs::read_to_string(CONFIG_PATH) {
            Ok(text) => toml::from_str(&text).map_err(|e| {
                WeekError::Config(format!("failed to parse {CONFIG_PATH}: {e}"))
            })?,
            Err(_) => Config::default(),
        };

        if let Ok(port) = env::var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| WeekError::Config(format!("PORT is not a number: {port}")))?;
        }
        if let Ok(repo) = env::var("GH_REPO") {
            config.github.repo = repo;
        }
        if let Ok(file_path) = env::var("GH_FILE_PATH") {
            config.github.file_path = file_path;
        }

        Ok(config)
    }

    /// The GitHub token, required for any Contents API call.
    pub fn github_token(&self) -> Result<String> {
        let token = env::var("GH_TOKEN")?;
        if token.trim().is_empty() {
            return Err(WeekError::Config("GH_TOKEN is empty".to_string()));
        }
        Ok(token.trim().to_string())
    }

    /// Admin credentials for the login route, trimmed of stray whitespace.
    pub fn admin_credentials(&self) -> Result<(String, String)> {
        let user = env::var("BASIC_AUTH_USER").unwrap_or_default();
        let pass = env::var("BASIC_AUTH_PASS").unwrap_or_default();
        let (user, pass) = (user.trim().to_string(), pass.trim().to_string());
        if user.is_empty() || pass.is_empty() {
            return Err(WeekError::Config(
                "Server missing BASIC_AUTH_USER or BASIC_AUTH_PASS".to_string(),
            ));
        }
        Ok((user, pass))
    }
}
