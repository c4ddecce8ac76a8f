use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical format identifier reported by a storage backend.
///
/// The scan engine only supports [`StoreFormat::Revlog`]; any other
/// identifier round-trips through [`StoreFormat::Other`] so the format gate
/// can name what it actually found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreFormat {
    /// The append-only revlog format: content-addressed representations
    /// located by (revision, offset), immutable once written.
    Revlog,
    /// Any unrecognized format identifier.
    Other(String),
}

impl StoreFormat {
    pub fn parse(identifier: &str) -> Self {
        match identifier {
            "revlog" => StoreFormat::Revlog,
            other => StoreFormat::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StoreFormat::Revlog => "revlog",
            StoreFormat::Other(s) => s,
        }
    }
}

impl fmt::Display for StoreFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_identifier() {
        assert_eq!(StoreFormat::parse("revlog"), StoreFormat::Revlog);
    }

    #[test]
    fn parse_preserves_unknown_identifier() {
        let format = StoreFormat::parse("bdb");
        assert_eq!(format, StoreFormat::Other("bdb".into()));
        assert_eq!(format.as_str(), "bdb");
    }

    #[test]
    fn display_matches_identifier() {
        assert_eq!(StoreFormat::Revlog.to_string(), "revlog");
    }
}
