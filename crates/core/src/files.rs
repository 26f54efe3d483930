// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-set validation for session creation (§3, §6, §8 property 5).

use crate::error::ValidationError;
use std::collections::BTreeMap;

/// Filenames must match this pattern (§6 "Filenames (whole API)").
const NAME_PATTERN_MAX_LEN: usize = 128;
/// Per-file size cap in bytes. The spec's §6 error string reads
/// "file too large (>200000 bytes)"; we use that literal bound rather than
/// 200 * 1024 so the error text and the enforced limit agree exactly.
pub const MAX_FILE_BYTES: usize = 200_000;
/// Per-session file count cap (§3, §6).
pub const MAX_FILES: usize = 50;

/// A validated, ordered set of source files for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    files: BTreeMap<String, String>,
}

impl FileSet {
    /// Validate and build a `FileSet` from `(name, content)` pairs.
    ///
    /// Checked in order: file count, each name's pattern, each file's size.
    /// Entry-file membership is validated separately by the caller once the
    /// entry filename is known (`contains`).
    pub fn new(entries: Vec<(String, String)>) -> Result<Self, ValidationError> {
        if entries.len() > MAX_FILES {
            return Err(ValidationError::TooManyFiles { max: MAX_FILES });
        }
        let mut files = BTreeMap::new();
        for (name, content) in entries {
            validate_filename(&name)?;
            if content.len() > MAX_FILE_BYTES {
                return Err(ValidationError::FileTooLarge { max: MAX_FILE_BYTES });
            }
            files.insert(name, content);
        }
        Ok(Self { files })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Safe-name regex from §4.1/§6, checked without pulling in the `regex` crate:
/// `^[A-Za-z0-9._-]{1,128}$`.
pub fn validate_filename(name: &str) -> Result<(), ValidationError> {
    let ok = !name.is_empty()
        && name.len() <= NAME_PATTERN_MAX_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
    if ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidFilename(name.to_string()))
    }
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
