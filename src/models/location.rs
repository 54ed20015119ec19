//! Locations and their format policies.
//!
//! A [`Location`] is a studio site with a parallel-room capacity and a
//! format policy. Policies are substring rules: a format name is matched
//! case-insensitively against the location's deny list and, when one is
//! configured, its allow list. Sites with special equipment typically
//! carry an allow list; ordinary sites carry a short deny list.

use serde::{Deserialize, Serialize};

/// A studio site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Unique name within the roster.
    pub name: String,
    /// Number of classes that may run in parallel (rooms).
    pub capacity: u32,
    /// Format-name substrings that may not run here.
    pub denied_formats: Vec<String>,
    /// When non-empty, only formats matching one of these substrings may
    /// run here. Checked after the deny list.
    pub allowed_formats: Vec<String>,
}

impl Location {
    /// Creates a location with an empty policy (everything allowed).
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
            denied_formats: Vec::new(),
            allowed_formats: Vec::new(),
        }
    }

    /// Adds a denied format substring.
    pub fn with_denied(mut self, substring: impl Into<String>) -> Self {
        self.denied_formats.push(substring.into());
        self
    }

    /// Adds an allowed format substring (switches the policy to
    /// allow-list mode).
    pub fn with_allowed(mut self, substring: impl Into<String>) -> Self {
        self.allowed_formats.push(substring.into());
        self
    }

    /// Whether a format may run at this location.
    pub fn allows_format(&self, format: &str) -> bool {
        let lower = format.to_lowercase();
        if self
            .denied_formats
            .iter()
            .any(|s| lower.contains(&s.to_lowercase()))
        {
            return false;
        }
        if self.allowed_formats.is_empty() {
            return true;
        }
        self.allowed_formats
            .iter()
            .any(|s| lower.contains(&s.to_lowercase()))
    }
}
