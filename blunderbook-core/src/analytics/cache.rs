//! Content-addressed keys for cached insight output.
//!
//! Cached statements are only valid for the exact snapshot they were computed
//! from and the release that wrote them, so the key is a SHA-256 over the
//! statement format followed by the serialized collection. Two collections
//! of the same size but different content never share a key.

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::types::Game;

/// Version of the generated statement text. Entries cached under another
/// format are never read back; bump this when insight wording changes.
pub const INSIGHT_FORMAT: &str = concat!(env!("CARGO_PKG_VERSION"), "+text.1");

/// Hex-encoded SHA-256 of a game collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey(String);

impl SnapshotKey {
    /// Hash the canonical JSON form of `games` under the current format.
    pub fn of(games: &[Game]) -> Result<Self> {
        Self::with_format(games, INSIGHT_FORMAT)
    }

    fn with_format(games: &[Game], format: &str) -> Result<Self> {
        let mut hasher = Sha256::new();
        hasher.update(format.as_bytes());
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(games)?);
        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
