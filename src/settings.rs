//! Typed snapshot of environment configuration.
//!
//! `Settings::load()` never fails: optional fields degrade to `None` and
//! malformed port values degrade to `None`. Missing secrets only surface as
//! errors at the point of use, through the `require_*` accessors.

use std::collections::HashMap;
use std::env;

use crate::error::{ConfigError, Result};

fn default_app_env() -> String {
    "dev".to_string()
}

fn default_log_level() -> String {
    "INFO".to_string()
}

/// Immutable snapshot of recognized environment variables.
///
/// Constructed once at startup; re-reading the environment means building a
/// new snapshot.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_env: String,
    pub log_level: String,

    // Server identity
    pub server_admin_name: Option<String>,
    pub server_name: Option<String>,

    // Lunaverse host access
    pub lunaverse_host: Option<String>,
    pub lunaverse_ssh_user: Option<String>,
    pub lunaverse_ssh_port: Option<u16>,
    pub lunaverse_ssh_password: Option<String>,

    // Web consoles
    pub cockpit_url: Option<String>,
    pub pgadmin_url: Option<String>,

    // Local Postgres
    pub postgres_host: Option<String>,
    pub postgres_port: Option<u16>,
    pub postgres_db: Option<String>,
    pub postgres_user: Option<String>,
    pub postgres_password: Option<String>,

    // DigitalOcean Postgres
    pub do_pg_host: Option<String>,
    pub do_pg_port: Option<u16>,
    pub do_pg_user: Option<String>,
    pub do_pg_password: Option<String>,

    // API tokens
    pub hf_token: Option<String>,
    pub github_token: Option<String>,
    pub taskade_token: Option<String>,
    pub namesilo_api_key: Option<String>,

    // Misc references
    pub hf_ssh_key_fingerprint: Option<String>,
    pub namesilo_account_url: Option<String>,
    pub namesilo_site_builder_url: Option<String>,
}

impl Settings {
    /// Build a snapshot from an explicit variable map. Never fails.
    pub fn from_env(vars: &HashMap<String, String>) -> Self {
        let get = |name: &str| vars.get(name).cloned();
        let get_port = |name: &str| vars.get(name).and_then(|v| v.parse::<u16>().ok());

        Self {
            app_env: get("APP_ENV").unwrap_or_else(default_app_env),
            log_level: get("LOG_LEVEL").unwrap_or_else(default_log_level),

            server_admin_name: get("SERVER_ADMIN_NAME"),
            server_name: get("SERVER_NAME"),

            lunaverse_host: get("LUNAVERSE_HOST"),
            lunaverse_ssh_user: get("LUNAVERSE_SSH_USER"),
            lunaverse_ssh_port: get_port("LUNAVERSE_SSH_PORT"),
            lunaverse_ssh_password: get("LUNAVERSE_SSH_PASSWORD"),

            cockpit_url: get("COCKPIT_URL"),
            pgadmin_url: get("PGADMIN_URL"),

            postgres_host: get("POSTGRES_HOST"),
            postgres_port: get_port("POSTGRES_PORT"),
            postgres_db: get("POSTGRES_DB"),
            postgres_user: get("POSTGRES_USER"),
            postgres_password: get("POSTGRES_PASSWORD"),

            do_pg_host: get("DO_PG_HOST"),
            do_pg_port: get_port("DO_PG_PORT"),
            do_pg_user: get("DO_PG_USER"),
            do_pg_password: get("DO_PG_PASSWORD"),

            hf_token: get("HF_TOKEN"),
            github_token: get("GITHUB_TOKEN"),
            taskade_token: get("TASKADE_TOKEN"),
            namesilo_api_key: get("NAMESILO_API_KEY"),

            hf_ssh_key_fingerprint: get("HF_SSH_KEY_FINGERPRINT"),
            namesilo_account_url: get("NAMESILO_ACCOUNT_URL"),
            namesilo_site_builder_url: get("NAMESILO_SITE_BUILDER_URL"),
        }
    }

    /// Build a snapshot from the current process environment.
    pub fn load() -> Self {
        Self::from_env(&env::vars().collect())
    }

    pub fn require_hf_token(&self) -> Result<String> {
        self.require(&self.hf_token, "HF_TOKEN")
    }

    pub fn require_github_token(&self) -> Result<String> {
        self.require(&self.github_token, "GITHUB_TOKEN")
    }

    pub fn require_taskade_token(&self) -> Result<String> {
        self.require(&self.taskade_token, "TASKADE_TOKEN")
    }

    pub fn require_namesilo_key(&self) -> Result<String> {
        self.require(&self.namesilo_api_key, "NAMESILO_API_KEY")
    }

    pub fn require_postgres_password(&self) -> Result<String> {
        self.require(&self.postgres_password, "POSTGRES_PASSWORD")
    }

    pub fn require_do_pg_password(&self) -> Result<String> {
        self.require(&self.do_pg_password, "DO_PG_PASSWORD")
    }

    pub fn require_lunaverse_ssh_password(&self) -> Result<String> {
        self.require(&self.lunaverse_ssh_password, "LUNAVERSE_SSH_PASSWORD")
    }

    /// Return the snapshot value if non-empty, otherwise re-read the process
    /// environment just-in-time before failing. Never returns an empty string.
    fn require(&self, field: &Option<String>, name: &str) -> Result<String> {
        match field {
            Some(value) if !value.trim().is_empty() => Ok(value.clone()),
            _ => require_env(name),
        }
    }
}

/// Read an environment variable, treating absent or whitespace-only values as
/// missing.
fn require_env(name: &str) -> Result<String> {
    let value = env::var(name).unwrap_or_default();
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::MissingVariable(name.to_string()).into());
    }
    Ok(value.to_string())
}
