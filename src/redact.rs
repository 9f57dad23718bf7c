//! Secret redaction for log output.
//!
//! Values of the variables in [`SECRET_VARS`] must never reach a log sink in
//! cleartext. The redactor captures the values once at construction and
//! substitutes `[REDACTED]` for every occurrence in each rendered log line.

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;

/// Placeholder substituted for secret values.
pub const REDACTED: &str = "[REDACTED]";

/// Environment variables whose values are considered sensitive.
pub const SECRET_VARS: &[&str] = &[
    "LUNAVERSE_SSH_PASSWORD",
    "POSTGRES_PASSWORD",
    "POSTGRES_SUPERUSER_PASSWORD",
    "POSTGRES_ALT_PASSWORD",
    "PGADMIN_MASTER_PASSWORD",
    "DEFAULT_ADMIN_PASSWORD",
    "LUNAVERSE_APP_PASSWORD",
    "HF_TOKEN",
    "GITHUB_TOKEN",
    "TASKADE_TOKEN",
    "NAMESILO_API_KEY",
    "DO_PG_PASSWORD",
];

/// Immutable table of secret values, captured at construction time.
///
/// Values are substituted longest-first so a secret that is a substring of
/// another secret is consumed by the longer one's replacement.
#[derive(Debug, Clone, Default)]
pub struct SecretRedactor {
    values: Vec<String>,
}

impl SecretRedactor {
    /// Capture the current values of [`SECRET_VARS`] from the process
    /// environment. Unset and empty variables are skipped.
    pub fn from_env() -> Self {
        let values = SECRET_VARS
            .iter()
            .filter_map(|name| env::var(name).ok())
            .collect();
        Self::from_values(values)
    }

    /// Build a redactor over an explicit list of secret values.
    pub fn from_values(values: Vec<String>) -> Self {
        let mut values: Vec<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
        values.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        values.dedup();
        Self { values }
    }

    /// Replace every occurrence of every captured secret with `[REDACTED]`.
    /// A message containing no secrets is returned unchanged.
    pub fn redact(&self, message: &str) -> String {
        let mut out = message.to_string();
        for value in &self.values {
            if out.contains(value.as_str()) {
                out = out.replace(value.as_str(), REDACTED);
            }
        }
        out
    }
}

/// Line-buffered writer that redacts secrets before the underlying writer.
pub struct RedactingWriter<W: Write> {
    inner: W,
    redactor: Arc<SecretRedactor>,
    buffer: Vec<u8>,
}

impl<W: Write> RedactingWriter<W> {
    fn write_redacted(&mut self, line: &[u8]) -> io::Result<()> {
        // Lossy decoding still redacts ASCII secrets in non-UTF8 lines.
        let text = String::from_utf8_lossy(line);
        let redacted = self.redactor.redact(&text);
        self.inner.write_all(redacted.as_bytes())
    }
}

impl<W: Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            self.write_redacted(&line)?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.write_redacted(&rest)?;
        }
        self.inner.flush()
    }
}

/// `MakeWriter` wrapper that redacts secrets in everything the inner
/// `MakeWriter` would emit.
pub struct RedactingMakeWriter<M> {
    inner: M,
    redactor: Arc<SecretRedactor>,
}

impl<M> RedactingMakeWriter<M> {
    pub fn new(inner: M, redactor: SecretRedactor) -> Self {
        Self {
            inner,
            redactor: Arc::new(redactor),
        }
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            redactor: self.redactor.clone(),
            buffer: Vec::new(),
        }
    }
}
