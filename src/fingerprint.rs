//! Environment fingerprinting for failure reports.

use std::process::Command;

/// Tools probed for the fingerprint, with the argument that prints a version.
const TOOLS: &[(&str, &[&str])] = &[
    ("rustc", &["--version"]),
    ("cargo", &["--version"]),
    ("git", &["--version"]),
    ("node", &["--version"]),
];

/// Run a command and return its trimmed stdout, or `n/a` when the tool is
/// unavailable or exits unsuccessfully.
fn probe(program: &str, args: &[&str]) -> String {
    match Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => "n/a".to_string(),
    }
}

/// Collect the environment fingerprint as `key: value` lines.
pub fn fingerprint() -> String {
    let mut lines = vec![
        format!("os: {}", std::env::consts::OS),
        format!("arch: {}", std::env::consts::ARCH),
    ];
    for (tool, args) in TOOLS {
        lines.push(format!("{tool}: {}", probe(tool, args)));
    }
    lines.join("\n") + "\n"
}
