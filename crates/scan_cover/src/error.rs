//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, invalid spawn points, neighbor-cap overflow during coverage construction,
//! internal invariant violations, cache corruption, cancellation, IO and
//! serialization failures.
use std::path::PathBuf;

use thiserror::Error;

use crate::geo::LatLon;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "candidate {candidate} reaches {found} spawn points, above max_neighbors = {cap}; raise the cap"
    )]
    NeighborCapExceeded {
        candidate: usize,
        found: usize,
        cap: usize,
    },

    #[error("spawn point {index} {point} is not a valid coordinate")]
    InvalidSpawnPoint { index: usize, point: LatLon },

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("corrupt cover cache record '{}': {reason}", path.display())]
    CorruptCache { path: PathBuf, reason: String },

    #[error("cover computation cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "boom"));
    }

    #[test]
    fn neighbor_cap_message_names_the_cap() {
        let err = Error::NeighborCapExceeded {
            candidate: 3,
            found: 12,
            cap: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("candidate 3"));
        assert!(msg.contains("max_neighbors = 10"));
    }

    #[test]
    fn invalid_spawn_point_message_names_index() {
        let err = Error::InvalidSpawnPoint {
            index: 4,
            point: LatLon::new(95.0, 1.0),
        };
        assert!(err.to_string().starts_with("spawn point 4 (95.000000"));
    }

    #[test]
    fn corrupt_cache_message_includes_path() {
        let err = Error::CorruptCache {
            path: PathBuf::from("/tmp/region.json"),
            reason: "eof".into(),
        };
        assert!(err.to_string().contains("/tmp/region.json"));
    }
}
