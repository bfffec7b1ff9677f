// crates/wit-stack-core/src/core/policy.rs
// ============================================================================
// Module: Access Policy Model
// Description: Permission statements, actions, and ARN-like glob patterns.
// Purpose: Model least-privilege grants scoped to stage-qualified patterns.
// Dependencies: crate::core::{graph, identifiers}, serde, thiserror
// ============================================================================

//! ## Overview
//! Policy statements are additive-only allow grants: the permission model is
//! a union of grants, never first-match, so statement order carries no
//! meaning. Resource patterns wildcard the logical-name segment only; the
//! stage segment is always literal, which rules out cross-stage privilege
//! leakage by construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::graph::ResourceRef;
use crate::core::identifiers::StatementSid;

// ============================================================================
// SECTION: Effect and Actions
// ============================================================================

/// Statement effect.
///
/// # Invariants
/// - Variants are stable for serialization and template matching.
/// - The builders in this crate only ever emit `Allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Grant the listed actions.
    Allow,
    /// Deny the listed actions.
    Deny,
}

/// Permission verb in `<service>:<Operation>` form.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyAction(String);

impl PolicyAction {
    /// Creates a new permission verb.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self(action.into())
    }

    /// Returns the verb as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PolicyAction {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Resource Patterns
// ============================================================================

/// ARN-like resource pattern with `*` wildcards.
///
/// # Invariants
/// - Wildcards match any run of characters, including the empty run.
/// - Builders wildcard the logical-name segment only; stage stays literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArnPattern(String);

impl ArnPattern {
    /// Creates a new resource pattern.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// Returns the pattern as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the pattern matches the candidate string.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        glob_match(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Display for ArnPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ArnPattern {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Matches a `*`-wildcard pattern against a candidate byte string.
///
/// Iterative backtracking matcher: `*` consumes zero or more bytes, every
/// other byte matches literally.
fn glob_match(pattern: &[u8], candidate: &[u8]) -> bool {
    let mut p = 0;
    let mut c = 0;
    let mut star: Option<(usize, usize)> = None;

    while c < candidate.len() {
        if p < pattern.len() && (pattern[p] == candidate[c]) {
            p += 1;
            c += 1;
        } else if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, c));
            p += 1;
        } else if let Some((star_p, star_c)) = star {
            p = star_p + 1;
            c = star_c + 1;
            star = Some((star_p, star_c + 1));
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == b'*' {
        p += 1;
    }
    p == pattern.len()
}

// ============================================================================
// SECTION: Policy Statements
// ============================================================================

/// Errors raised when constructing policy statements.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// The action list was empty.
    #[error("statement {sid} has no actions")]
    EmptyActions {
        /// Statement identifier.
        sid: String,
    },
    /// The resource list was empty.
    #[error("statement {sid} has no resources")]
    EmptyResources {
        /// Statement identifier.
        sid: String,
    },
}

/// Declared permission statement attached to an identity.
///
/// # Invariants
/// - `actions` and `resources` are non-empty (enforced at construction).
/// - Resource references may be forward references resolved after the
///   resource graph is fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    /// Statement identifier, unique within its identity.
    pub sid: StatementSid,
    /// Statement effect.
    pub effect: Effect,
    /// Granted permission verbs.
    pub actions: Vec<PolicyAction>,
    /// Resource patterns or forward references.
    pub resources: Vec<ResourceRef>,
}

impl PolicyStatement {
    /// Creates a statement, rejecting empty action or resource lists.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when `actions` or `resources` is empty.
    pub fn new(
        sid: StatementSid,
        effect: Effect,
        actions: Vec<PolicyAction>,
        resources: Vec<ResourceRef>,
    ) -> Result<Self, PolicyError> {
        if actions.is_empty() {
            return Err(PolicyError::EmptyActions {
                sid: sid.as_str().to_string(),
            });
        }
        if resources.is_empty() {
            return Err(PolicyError::EmptyResources {
                sid: sid.as_str().to_string(),
            });
        }
        Ok(Self {
            sid,
            effect,
            actions,
            resources,
        })
    }
}
