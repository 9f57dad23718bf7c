//! Setup verification: confirm the `.ops` working tree and required tooling
//! are in place before the other commands are used.

use std::fs;
use std::process::Command;

use crate::error::Result;
use crate::ops_paths::OpsPaths;

/// Outcome of one verification check.
#[derive(Debug)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    pub message: String,
}

fn check_ops_dirs(paths: &OpsPaths) -> Check {
    let missing: Vec<String> = paths
        .required_dirs()
        .into_iter()
        .filter(|dir| !dir.exists())
        .map(|dir| dir.display().to_string())
        .collect();

    if missing.is_empty() {
        Check {
            name: ".ops directories",
            passed: true,
            message: "All .ops directories exist".to_string(),
        }
    } else {
        Check {
            name: ".ops directories",
            passed: false,
            message: format!(
                "Missing directories: {}. Run: opskit verify --fix",
                missing.join(", ")
            ),
        }
    }
}

fn check_git_available() -> Check {
    let available = Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    Check {
        name: "git",
        passed: available,
        message: if available {
            "git is available".to_string()
        } else {
            "git not found on PATH".to_string()
        },
    }
}

/// Run all verification checks.
pub fn verify(paths: &OpsPaths) -> Vec<Check> {
    vec![check_ops_dirs(paths), check_git_available()]
}

/// Create any missing `.ops` directories. Idempotent; returns the
/// directories that were created.
pub fn bootstrap(paths: &OpsPaths) -> Result<Vec<String>> {
    let mut created = Vec::new();
    for dir in paths.required_dirs() {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            created.push(dir.display().to_string());
        }
    }
    Ok(created)
}
