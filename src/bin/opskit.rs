//! opskit CLI - operational utilities for the development workflow

use clap::{Parser, Subcommand};
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use opskit::envcheck::{self, Mode};
use opskit::ops_paths::OpsPaths;
use opskit::settings::Settings;
use opskit::{convo, diagnose, fingerprint, kb, verify};

#[derive(Parser)]
#[command(name = "opskit")]
#[command(about = "Operational utilities: env checks, conversation capture, failure knowledge base")]
#[command(version)]
struct Cli {
    /// Base directory for the .ops tree (defaults to the current directory)
    #[arg(long, global = true)]
    ops_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that required environment variables are set for a given mode
    CheckEnv {
        /// Mode to check
        #[arg(value_enum)]
        mode: Mode,
    },

    /// Manage conversation logs
    #[command(subcommand)]
    Convo(ConvoCommands),

    /// Record an error log in the failure knowledge base
    RecordFailure {
        /// Path to the error log
        log: PathBuf,
    },

    /// Reproduce a failure, capture its output, and record it
    Diagnose {
        /// Command to reproduce the failure
        #[arg(long)]
        cmd: String,

        /// Optional raw conversation log to append the output to
        #[arg(long)]
        convo_log: Option<PathBuf>,
    },

    /// Print an environment fingerprint
    Fingerprint,

    /// Verify the repository is set up for the other commands
    Verify {
        /// Create any missing .ops directories
        #[arg(long)]
        fix: bool,
    },
}

#[derive(Subcommand)]
enum ConvoCommands {
    /// Start a new raw conversation log
    New {
        /// Topic or title of the conversation
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Append text to an existing raw log
    Append {
        /// Path to the raw log
        log: PathBuf,
        /// File to append, or '-' to read from stdin
        source: String,
    },
    /// Generate a redacted brief from a raw log
    Brief {
        /// Path to the raw log
        raw_log: PathBuf,
    },
}

fn main() -> ExitCode {
    let settings = Settings::load();
    opskit::init_tracing(&settings.log_level);

    let cli = Cli::parse();
    let paths = match &cli.ops_root {
        Some(root) => OpsPaths::new(root),
        None => OpsPaths::default(),
    };

    match run(cli, &paths) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, paths: &OpsPaths) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::CheckEnv { mode } => Ok(cmd_check_env(mode)),
        Commands::Convo(cmd) => match cmd {
            ConvoCommands::New { title } => {
                let path = convo::new_log(paths, &title.join(" "))?;
                println!("{}", path.display());
                Ok(ExitCode::SUCCESS)
            }
            ConvoCommands::Append { log, source } => {
                let content = if source == "-" {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                } else {
                    String::from_utf8_lossy(&fs::read(&source)?).into_owned()
                };
                convo::append_log(&log, &content)?;
                println!("Appended to {}", log.display());
                Ok(ExitCode::SUCCESS)
            }
            ConvoCommands::Brief { raw_log } => {
                let out = convo::write_brief(paths, &raw_log)?;
                println!("{}", out.display());
                Ok(ExitCode::SUCCESS)
            }
        },
        Commands::RecordFailure { log } => {
            let recorded = kb::record_failure(paths, &log)?;
            println!(
                "Recorded failure signature: {} -> {}",
                recorded.signature,
                recorded.case_dir.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Diagnose { cmd, convo_log } => {
            let report = diagnose::diagnose(paths, &cmd, convo_log.as_deref())?;
            println!("[diagnose] env:     {}", report.fingerprint_path.display());
            println!("[diagnose] failure: {}", report.failure_path.display());
            println!("[diagnose] exit:    {}", report.exit_code);
            println!(
                "Recorded failure signature: {} -> {}",
                report.recorded.signature,
                report.recorded.case_dir.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Fingerprint => {
            print!("{}", fingerprint::fingerprint());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify { fix } => cmd_verify(paths, fix),
    }
}

fn cmd_check_env(mode: Mode) -> ExitCode {
    let missing = envcheck::check_mode(mode);
    if missing.is_empty() {
        println!(
            "✓ All required environment variables present for mode '{}'",
            mode.as_str()
        );
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "Missing required environment variables for mode '{}':",
            mode.as_str()
        );
        for name in missing {
            eprintln!("  - {name}");
        }
        ExitCode::from(2)
    }
}

fn cmd_verify(paths: &OpsPaths, fix: bool) -> anyhow::Result<ExitCode> {
    if fix {
        let created = verify::bootstrap(paths)?;
        for dir in &created {
            println!("Created {dir}");
        }
        if created.is_empty() {
            println!("Nothing to fix");
        }
    }

    let checks = verify::verify(paths);
    let mut all_passed = true;
    for check in &checks {
        let status = if check.passed { "ok" } else { "FAIL" };
        println!("[{status}] {}: {}", check.name, check.message);
        if !check.passed {
            all_passed = false;
        }
    }

    if all_passed {
        println!("Setup verification complete.");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Setup incomplete. Address the issues above.");
        Ok(ExitCode::FAILURE)
    }
}
