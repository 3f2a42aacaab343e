//! Target editor profiles.
//!
//! The XMEML dialect is read by two editors that disagree on a handful of
//! tag shapes and numeric conventions. Every timeline and media record is
//! rendered for exactly one of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The non-linear editor a document is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetEditor {
    /// Adobe Premiere Pro.
    #[default]
    Premiere,
    /// Blackmagic DaVinci Resolve.
    Resolve,
}

impl TargetEditor {
    /// Suffix appended to exported file names so both variants can live
    /// side by side.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            TargetEditor::Premiere => "PRE",
            TargetEditor::Resolve => "RESOLVE",
        }
    }

    /// Lowercase identifier used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetEditor::Premiere => "premiere",
            TargetEditor::Resolve => "resolve",
        }
    }
}

impl fmt::Display for TargetEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetEditor {
    type Err = crate::error::XmemlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "premiere" | "ppro" => Ok(TargetEditor::Premiere),
            "resolve" | "davinci" => Ok(TargetEditor::Resolve),
            other => Err(crate::error::XmemlError::config(format!(
                "unknown target editor '{other}' (expected 'premiere' or 'resolve')"
            ))),
        }
    }
}
