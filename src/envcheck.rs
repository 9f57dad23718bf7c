//! Mode-based environment-variable validation.

use std::collections::HashMap;
use std::env;

use clap::ValueEnum;

/// Named groups of environment variables required for a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Local development environment
    LocalDev,
    /// Server operations (SSH access to Lunaverse)
    ServerOps,
    /// Local Postgres database access
    DbLocal,
    /// DigitalOcean Postgres database access
    DbDo,
}

impl Mode {
    pub fn required_vars(self) -> &'static [&'static str] {
        match self {
            Mode::LocalDev => &["APP_ENV", "LOG_LEVEL"],
            Mode::ServerOps => &["LUNAVERSE_HOST", "LUNAVERSE_SSH_USER", "LUNAVERSE_SSH_PORT"],
            Mode::DbLocal => &["POSTGRES_HOST", "POSTGRES_PORT", "POSTGRES_DB", "POSTGRES_USER"],
            Mode::DbDo => &["DO_PG_HOST", "DO_PG_PORT", "DO_PG_USER"],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Mode::LocalDev => "Local development environment",
            Mode::ServerOps => "Server operations (SSH access to Lunaverse)",
            Mode::DbLocal => "Local Postgres database access",
            Mode::DbDo => "DigitalOcean Postgres database access",
        }
    }

    /// CLI spelling of the mode, e.g. `local-dev`.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::LocalDev => "local-dev",
            Mode::ServerOps => "server-ops",
            Mode::DbLocal => "db-local",
            Mode::DbDo => "db-do",
        }
    }
}

/// Names of the mode's required variables that are absent or
/// whitespace-only in `vars`.
pub fn missing_vars(mode: Mode, vars: &HashMap<String, String>) -> Vec<&'static str> {
    mode.required_vars()
        .iter()
        .filter(|name| {
            vars.get(**name)
                .map(|v| v.trim().is_empty())
                .unwrap_or(true)
        })
        .copied()
        .collect()
}

/// Check the current process environment for `mode`.
pub fn check_mode(mode: Mode) -> Vec<&'static str> {
    missing_vars(mode, &env::vars().collect())
}
