//! Conversation-log capture: raw logs, timestamped appends, redacted briefs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;

use crate::error::{ConvoError, Result};
use crate::ops_paths::OpsPaths;
use crate::redact::REDACTED;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex pattern"));

static HF_TOKEN_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(HF_TOKEN\s*=\s*)(\S+)").expect("Invalid regex pattern"));

static NAMESILO_KEY_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(NAMESILO_API_KEY\s*=\s*)(\S+)").expect("Invalid regex pattern"));

static GENERIC_CREDENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(api[_-]?key|token|secret)\s*[:=]\s*\S+").expect("Invalid regex pattern")
});

/// Maximum number of bytes of raw text carried into a brief.
const BRIEF_EXCERPT_BYTES: usize = 4000;

/// Lowercase, collapse non-alphanumeric runs to `-`, trim the dashes.
/// Falls back to `conversation` when nothing survives.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let slug = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "conversation".to_string()
    } else {
        slug.to_string()
    }
}

/// Create a new raw conversation log under `.ops/conversations/raw/` and
/// return its path.
pub fn new_log(paths: &OpsPaths, title: &str) -> Result<PathBuf> {
    let now = Local::now();
    let fname = format!("{}__{}.txt", now.format("%Y%m%d_%H%M%S"), slugify(title));

    let raw_dir = paths.conversations_raw();
    fs::create_dir_all(&raw_dir)?;
    let path = raw_dir.join(fname);

    let header = format!(
        "TITLE: {title}\nCREATED: {created}\nFORMAT: raw_text\n\n---- BEGIN LOG ----\n\n",
        created = now.to_rfc3339(),
    );
    fs::write(&path, header)?;

    Ok(path)
}

/// Append `content` to an existing raw log, preceded by a timestamped stamp.
pub fn append_log(log_path: &Path, content: &str) -> Result<()> {
    if !log_path.exists() {
        return Err(ConvoError::LogNotFound(log_path.to_path_buf()).into());
    }

    let existing = fs::read_to_string(log_path)?;
    let stamp = format!("\n\n[{}] APPEND\n", Local::now().to_rfc3339());
    fs::write(log_path, format!("{existing}{stamp}{content}\n"))?;

    Ok(())
}

/// Redact credential-looking assignments from brief text.
pub fn redact_brief_text(text: &str) -> String {
    let text = HF_TOKEN_ASSIGN.replace_all(text, format!("${{1}}{REDACTED}"));
    let text = NAMESILO_KEY_ASSIGN.replace_all(&text, format!("${{1}}{REDACTED}"));
    let text = GENERIC_CREDENTIAL.replace_all(&text, format!("${{1}}: {REDACTED}"));
    text.into_owned()
}

/// Write a brief skeleton for a raw log into `.ops/conversations/briefs/`,
/// carrying a redacted tail excerpt of the raw text. Returns the brief path.
pub fn write_brief(paths: &OpsPaths, raw_path: &Path) -> Result<PathBuf> {
    if !raw_path.exists() {
        return Err(ConvoError::RawLogNotFound(raw_path.to_path_buf()).into());
    }

    let briefs_dir = paths.conversation_briefs();
    fs::create_dir_all(&briefs_dir)?;

    let raw = fs::read_to_string(raw_path)?;
    let raw = redact_brief_text(&raw);
    let excerpt = tail_bytes(&raw, BRIEF_EXCERPT_BYTES);

    let brief = format!(
        "# Conversation Brief\n\
         Source: {source}\n\
         Generated: {generated}\n\
         \n\
         ## What we were trying to do\n- (fill in)\n\
         \n\
         ## What we decided\n- (fill in)\n\
         \n\
         ## What changed / what we built\n- (fill in)\n\
         \n\
         ## Open issues / blockers\n- (fill in)\n\
         \n\
         ## Next steps\n1)\n2)\n3)\n\
         \n\
         ## Raw excerpt (redacted)\n```text\n{excerpt}\n```\n",
        source = raw_path.display(),
        generated = Local::now().to_rfc3339(),
    );

    let stem = raw_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    let out = briefs_dir.join(format!("{stem}__brief.md"));
    fs::write(&out, brief)?;

    Ok(out)
}

/// Last `max` bytes of `s`, aligned down to a char boundary.
fn tail_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Fix Postgres Setup"), "fix-postgres-setup");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
        assert_eq!(slugify("v2.0: the reckoning!"), "v2-0-the-reckoning");
    }

    #[test]
    fn test_slugify_falls_back_when_empty() {
        assert_eq!(slugify(""), "conversation");
        assert_eq!(slugify("!!!"), "conversation");
    }

    #[test]
    fn test_new_log_writes_header() {
        let dir = TempDir::new().unwrap();
        let paths = OpsPaths::new(dir.path());

        let path = new_log(&paths, "Debug session").unwrap();
        assert!(path.starts_with(paths.conversations_raw()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with("__debug-session.txt"), "name: {name}");

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("TITLE: Debug session"));
        assert!(content.contains("FORMAT: raw_text"));
        assert!(content.contains("---- BEGIN LOG ----"));
    }

    #[test]
    fn test_append_stamps_and_appends() {
        let dir = TempDir::new().unwrap();
        let paths = OpsPaths::new(dir.path());

        let path = new_log(&paths, "session").unwrap();
        append_log(&path, "first chunk").unwrap();
        append_log(&path, "second chunk").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("APPEND"));
        let first = content.find("first chunk").unwrap();
        let second = content.find("second chunk").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_append_missing_log_errors() {
        let dir = TempDir::new().unwrap();
        let result = append_log(&dir.path().join("nope.txt"), "content");
        assert!(result.is_err());
    }

    #[test]
    fn test_brief_redacts_assignments() {
        let text = "export HF_TOKEN=hf_abc123\nNAMESILO_API_KEY = ns_key_1\napi_key: super-secret\n";
        let redacted = redact_brief_text(text);
        assert!(!redacted.contains("hf_abc123"));
        assert!(!redacted.contains("ns_key_1"));
        assert!(!redacted.contains("super-secret"));
        // The generic credential pass rewrites the assignment form too.
        assert!(redacted.contains("HF_TOKEN: [REDACTED]"));
    }

    #[test]
    fn test_write_brief_produces_redacted_excerpt() {
        let dir = TempDir::new().unwrap();
        let paths = OpsPaths::new(dir.path());

        let raw = new_log(&paths, "secrets").unwrap();
        append_log(&raw, "setting HF_TOKEN=hf_leaky_token for upload").unwrap();

        let brief = write_brief(&paths, &raw).unwrap();
        assert!(brief.starts_with(paths.conversation_briefs()));

        let content = fs::read_to_string(&brief).unwrap();
        assert!(content.contains("# Conversation Brief"));
        assert!(!content.contains("hf_leaky_token"));
        assert!(content.contains(REDACTED));
    }

    #[test]
    fn test_tail_bytes_respects_char_boundaries() {
        let s = "aé".repeat(10);
        let tail = tail_bytes(&s, 5);
        assert!(tail.len() <= 5);
        assert!(s.ends_with(tail));
    }
}
