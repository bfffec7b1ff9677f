// crates/wit-stack-core/src/core/stage.rs
// ============================================================================
// Module: Deployment Stage
// Description: Stage tokens threaded through every resource name and pattern.
// Purpose: Provide the single per-environment isolation parameter.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The stage token is the only externally varying input besides the fixed
//! catalogs. Every physical resource name and every policy resource pattern
//! embeds exactly one stage token, so two stages can never produce colliding
//! names. Parsing fails fast on unknown tokens because every downstream name
//! depends on the stage.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Stage
// ============================================================================

/// Deployment stage for an isolated stack instance.
///
/// # Invariants
/// - Variants are stable for serialization and template matching.
/// - `as_str` output is embedded verbatim in physical names and patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Development environment.
    Dev,
    /// Pre-production environment.
    Beta,
    /// Production environment.
    Prod,
}

impl Stage {
    /// All stages in deployment order.
    pub const ALL: [Self; 3] = [Self::Dev, Self::Beta, Self::Prod];

    /// Returns the stage token embedded in resource names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Beta => "beta",
            Self::Prod => "prod",
        }
    }

    /// Returns true for the production stage.
    #[must_use]
    pub const fn is_prod(self) -> bool {
        matches!(self, Self::Prod)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when parsing a stage token.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StageError {
    /// The supplied token is not a known stage.
    #[error("unknown stage token: {token}")]
    Unknown {
        /// The rejected token.
        token: String,
    },
    /// The supplied token is empty.
    #[error("stage token is empty")]
    Empty,
}

impl FromStr for Stage {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "beta" => Ok(Self::Beta),
            "prod" => Ok(Self::Prod),
            "" => Err(StageError::Empty),
            other => Err(StageError::Unknown {
                token: other.to_string(),
            }),
        }
    }
}
