//! Allow-list of domains that must never be written to the zone.
//!
//! # File format
//!
//! ```text
//! # Comments start at the beginning of a line with a hash symbol.
//! # Exact match: only example.com itself.
//! example.com
//! # Right-hand match: example.net and every name below it.
//! .example.net
//! ```
//!
//! Lines shorter than two characters are ignored. Surrounding whitespace is
//! trimmed before a line is classified.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Error type for allow-list loading operations.
#[derive(Debug, thiserror::Error)]
pub enum AllowListError {
    /// File was not found at the specified path.
    #[error("allow-list file not found: {0:?}")]
    NotFound(PathBuf),

    /// Permission denied when accessing the file.
    #[error("permission denied reading allow-list: {0:?}")]
    PermissionDenied(PathBuf),

    /// I/O error while reading the file.
    #[error("failed to read allow-list file {path:?}: {source}")]
    Io {
        /// Path to the file that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Immutable index of allow-listed domains.
///
/// Every suffix rule is also stored as an exact rule, so `suffixes` is always
/// a subset of `exact`.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    /// Domains that match only themselves.
    exact: HashSet<String>,
    /// Domains that match themselves and any name ending in `.` + domain.
    suffixes: HashSet<String>,
}

impl AllowList {
    /// Build an allow-list from raw file lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowlist = Self::default();
        for line in lines {
            allowlist.add_rule(line.as_ref());
        }
        allowlist
    }

    /// Load an allow-list from a file, reading it line by line.
    ///
    /// # Errors
    ///
    /// Returns an [`AllowListError`] if the file cannot be opened or read.
    pub async fn load(path: &Path) -> Result<Self, AllowListError> {
        let file = File::open(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AllowListError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                AllowListError::PermissionDenied(path.to_path_buf())
            }
            _ => AllowListError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let mut allowlist = Self::default();
        let mut lines = BufReader::new(file).lines();
        while let Some(line) = lines.next_line().await.map_err(|e| AllowListError::Io {
            path: path.to_path_buf(),
            source: e,
        })? {
            allowlist.add_rule(&line);
        }

        tracing::debug!(
            path = ?path,
            exact = allowlist.exact.len(),
            suffixes = allowlist.suffixes.len(),
            "loaded allow-list"
        );
        Ok(allowlist)
    }

    fn add_rule(&mut self, line: &str) {
        let line = line.trim();
        if line.chars().nth(1).is_none() || line.starts_with('#') {
            return;
        }

        if let Some(domain) = line.strip_prefix('.') {
            self.suffixes.insert(domain.to_string());
            self.exact.insert(domain.to_string());
        } else {
            self.exact.insert(line.to_string());
        }
    }

    /// Check whether a domain is covered by an exact or right-hand rule.
    ///
    /// Single-label names can only match exactly. Right-hand candidates are
    /// checked from the full name downwards and never include the bare
    /// top-level label, so `a.b.c` checks `a.b.c` then `b.c`.
    pub fn is_allowed(&self, domain: &str) -> bool {
        if self.exact.contains(domain) {
            return true;
        }

        let mut current = domain;
        while let Some(pos) = current.find('.') {
            if self.suffixes.contains(current) {
                return true;
            }
            current = &current[pos + 1..];
        }

        false
    }

    /// Returns the number of distinct allow-listed domains.
    #[inline]
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    /// Returns the number of right-hand (suffix) rules.
    #[inline]
    pub fn suffix_len(&self) -> usize {
        self.suffixes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
