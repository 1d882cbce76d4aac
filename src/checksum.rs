//! Checksums of compared template text

use sha2::{Digest, Sha256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SHA256 checksum of a template as read from disk
///
/// Recorded in reports so a CI log identifies exactly which baseline and
/// candidate were compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    pub fn of_text(text: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(text.as_bytes())))
    }

    /// Full hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First twelve hex digits, for one-line summaries
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_of_text() {
        let a = Checksum::of_text("message AgentUpdate");
        assert_eq!(a, Checksum::of_text("message AgentUpdate"));
        assert_ne!(a, Checksum::of_text("message AgentUpdate2"));
        assert_eq!(a.as_str().len(), 64);
        assert_eq!(a.short(), &a.as_str()[..12]);
    }
}
