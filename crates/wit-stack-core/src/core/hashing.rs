// crates/wit-stack-core/src/core/hashing.rs
// ============================================================================
// Module: Canonical Hashing
// Description: Canonical JSON bytes and template digests.
// Purpose: Make synthesis determinism checkable as byte and digest equality.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Templates are hashed over their canonical JSON form (JCS): same stage and
//! catalogs must always yield the same digest. Digests serialize as lowercase
//! hex strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while hashing canonical JSON.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum HashError {
    /// Canonical JSON serialization failed.
    #[error("canonical json error: {0}")]
    Canonical(String),
    /// Hex rendering of the digest failed.
    #[error("digest format error: {0}")]
    Format(String),
}

// ============================================================================
// SECTION: Digests
// ============================================================================

/// SHA-256 digest of a template's canonical JSON bytes.
///
/// # Invariants
/// - Always 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateDigest(String);

impl TemplateDigest {
    /// Returns the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Serializes a value to canonical JSON (JCS) bytes.
///
/// # Errors
///
/// Returns [`HashError::Canonical`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonical(err.to_string()))
}

/// Hashes a value over its canonical JSON bytes.
///
/// # Errors
///
/// Returns [`HashError`] when serialization or hex rendering fails.
pub fn hash_canonical_json<T: Serialize>(value: &T) -> Result<TemplateDigest, HashError> {
    let bytes = canonical_json_bytes(value)?;
    let digest = Sha256::digest(&bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        write!(hex, "{byte:02x}").map_err(|err| HashError::Format(err.to_string()))?;
    }
    Ok(TemplateDigest(hex))
}
