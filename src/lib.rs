//! opskit - Operational toolkit for a development workflow
//!
//! This library provides the core functionality for:
//! - Loading typed environment configuration with lazy required-field checks
//! - Redacting secret values from all log output
//! - Capturing conversation logs and recording failures in a knowledge base

pub mod convo;
pub mod diagnose;
pub mod envcheck;
pub mod error;
pub mod fingerprint;
pub mod kb;
pub mod ops_paths;
pub mod redact;
pub mod settings;
pub mod verify;

pub use error::{Error, Result};

use std::env;
use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging with environment-based filtering and secret
/// redaction. `RUST_LOG` overrides `default_level`; every rendered line
/// passes through the redacting writer before reaching stdout. When
/// `STRUCTURED_LOGGING` is set to a truthy value (1/true/yes/json), records
/// are emitted as JSON for log aggregation.
pub fn init_tracing(default_level: &str) {
    let redactor = redact::SecretRedactor::from_env();
    let writer = redact::RedactingMakeWriter::new(io::stdout, redactor);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_lowercase()));

    let structured_flag = env::var("STRUCTURED_LOGGING")
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let structured = matches!(structured_flag.as_str(), "1" | "true" | "yes" | "json");

    if structured {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(writer))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(writer))
            .with(filter)
            .init();
    }
}
