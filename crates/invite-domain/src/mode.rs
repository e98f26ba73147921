use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Visibility scope over the field catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// The curated subset listed in the catalog's basic allow-list.
    #[default]
    Basic,
    /// Every field of the active sections.
    Full,
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EditorMode::Basic => "basic",
            EditorMode::Full => "full",
        };
        f.write_str(label)
    }
}

impl FromStr for EditorMode {
    type Err = ParseModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(EditorMode::Basic),
            "full" => Ok(EditorMode::Full),
            _ => Err(ParseModeError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raised when a string names neither `basic` nor `full`.
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown editor mode `{}` (expected basic or full)", self.0)
    }
}

impl std::error::Error for ParseModeError {}
