//! Reproduce-and-record workflow: capture an environment fingerprint, rerun
//! the failing command, and file the output in the knowledge base.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Local;

use crate::error::Result;
use crate::ops_paths::OpsPaths;
use crate::{convo, fingerprint, kb};

/// Artifacts produced by a diagnose run.
#[derive(Debug)]
pub struct DiagnoseReport {
    pub fingerprint_path: PathBuf,
    pub failure_path: PathBuf,
    pub exit_code: i32,
    pub recorded: kb::RecordedFailure,
}

/// Run `cmd` through the shell, capturing combined stdout and stderr.
fn run_capture(cmd: &str) -> Result<(i32, String)> {
    let output = Command::new("sh").arg("-c").arg(cmd).output()?;
    let mut combined = output.stdout;
    combined.extend_from_slice(&output.stderr);
    let code = output.status.code().unwrap_or(-1);
    Ok((code, String::from_utf8_lossy(&combined).into_owned()))
}

/// Reproduce a failure and record it.
///
/// Writes the environment fingerprint and the command output under
/// `.ops/logs/`, records the output in the knowledge base, and optionally
/// appends it to a conversation log. A failed append is reported as a
/// warning, not an error.
pub fn diagnose(paths: &OpsPaths, cmd: &str, convo_log: Option<&Path>) -> Result<DiagnoseReport> {
    let logs_dir = paths.logs();
    fs::create_dir_all(&logs_dir)?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let fingerprint_path = logs_dir.join(format!("{ts}__env_fingerprint.txt"));
    let failure_path = logs_dir.join(format!("{ts}__failure_output.txt"));

    fs::write(&fingerprint_path, fingerprint::fingerprint())?;

    let (exit_code, output) = run_capture(cmd)?;
    fs::write(&failure_path, &output)?;

    let recorded = kb::record_failure_text(paths, &output)?;

    if let Some(log) = convo_log {
        if let Err(e) = convo::append_log(log, &output) {
            tracing::warn!(error = %e, log = %log.display(), "failed to append to convo log");
        }
    }

    Ok(DiagnoseReport {
        fingerprint_path,
        failure_path,
        exit_code,
        recorded,
    })
}
