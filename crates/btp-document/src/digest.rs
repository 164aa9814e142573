//! # Document Digest
//!
//! SHA-256 over the serialized HTML bytes. Rendering is deterministic, so
//! two renders of the same snapshot carry the same digest; consumers use it
//! to tell whether a printed document still matches its data.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 digest of a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl DocumentDigest {
    /// Digest the given markup.
    pub fn of(html: &str) -> Self {
        let hash = Sha256::digest(html.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self { bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for DocumentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}
