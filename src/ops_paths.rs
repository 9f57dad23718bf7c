//! Layout of the `.ops` working tree.

use std::path::{Path, PathBuf};

/// Paths under the `.ops` directory, resolved against a base directory
/// (normally the repository root).
#[derive(Debug, Clone)]
pub struct OpsPaths {
    root: PathBuf,
}

impl OpsPaths {
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            root: base.as_ref().join(".ops"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn conversations_raw(&self) -> PathBuf {
        self.root.join("conversations").join("raw")
    }

    pub fn conversation_briefs(&self) -> PathBuf {
        self.root.join("conversations").join("briefs")
    }

    pub fn kb_cases(&self) -> PathBuf {
        self.root.join("error_kb").join("cases")
    }

    pub fn kb_index(&self) -> PathBuf {
        self.root.join("error_kb").join("error_index.json")
    }

    pub fn logs(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Directories every command expects to exist.
    pub fn required_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.conversations_raw(),
            self.conversation_briefs(),
            self.kb_cases(),
            self.logs(),
        ]
    }
}

impl Default for OpsPaths {
    fn default() -> Self {
        Self::new(".")
    }
}
