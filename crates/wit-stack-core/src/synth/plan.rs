// crates/wit-stack-core/src/synth/plan.rs
// ============================================================================
// Module: Stack Plan
// Description: Stage-independent inputs to stack synthesis.
// Purpose: Carry the catalogs and parameters the builders fan out over.
// Dependencies: crate::core::{identifiers, resources}, serde
// ============================================================================

//! ## Overview
//! A stack plan is everything synthesis needs besides the stage token: the
//! project prefix, account/region parameters, the table and route catalogs,
//! and the function/site/policy options. Catalogs are supplied by callers
//! (the config crate in practice) rather than hardcoded, so similarly-shaped
//! stacks can reuse the builders without code changes. The default plan
//! matches the Project WIT catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AccountId;
use crate::core::identifiers::LogicalName;
use crate::core::identifiers::ProjectName;
use crate::core::identifiers::Region;
use crate::core::resources::HttpMethod;

// ============================================================================
// CONSTANTS: Project WIT catalog defaults
// ============================================================================

/// Default project prefix.
pub const DEFAULT_PROJECT: &str = "project-wit";

/// Default table logical-name catalog.
pub const DEFAULT_TABLES: [&str; 6] = ["tasks", "tags", "sprints", "comments", "users", "lanes"];

/// Default role base name, stage-qualified at synthesis.
pub const DEFAULT_ROLE_BASE: &str = "dynamo-auth-role";

/// Default function base name, stage-qualified at synthesis.
pub const DEFAULT_FUNCTION_BASE: &str = "credential-retriever";

// ============================================================================
// SECTION: Plan Components
// ============================================================================

/// Route catalog entry.
///
/// # Invariants
/// - `path` starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Route path segment.
    pub path: String,
    /// HTTP verb.
    pub method: HttpMethod,
}

/// Deployable-unit parameters.
///
/// # Invariants
/// - `code_asset` and `handler` are opaque to synthesis; the handler's logic
///   is an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionPlan {
    /// Function base name, stage-qualified at synthesis.
    pub base_name: String,
    /// Packaged-code asset location.
    pub code_asset: String,
    /// Entry-point symbol within the packaged code.
    pub handler: String,
    /// Runtime identifier for the function host.
    pub runtime: String,
    /// Role base name, stage-qualified at synthesis.
    pub role_base_name: String,
}

impl FunctionPlan {
    /// Returns the Project WIT credential-retriever defaults.
    #[must_use]
    pub fn project_wit_default() -> Self {
        Self {
            base_name: DEFAULT_FUNCTION_BASE.to_string(),
            code_asset: "lambda".to_string(),
            handler: "credential-retriever.main".to_string(),
            runtime: "python3.6".to_string(),
            role_base_name: DEFAULT_ROLE_BASE.to_string(),
        }
    }
}

/// Policy options controlling optional grants.
///
/// # Invariants
/// - Disabling `grant_stream_read` removes the stream/index statement only;
///   the CRUD and self-assume statements are always emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOptions {
    /// Emit the stream/index read statement. No table enables a change
    /// stream today, so this grant is dormant until one does.
    pub grant_stream_read: bool,
}

impl Default for PolicyOptions {
    fn default() -> Self {
        Self {
            grant_stream_read: true,
        }
    }
}

/// Static-site options.
///
/// # Invariants
/// - Document names are object keys within the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitePlan {
    /// Index document object key.
    pub index_document: String,
    /// Error document object key.
    pub error_document: String,
    /// Retain bucket contents when the prod stage is torn down.
    pub retain_on_prod: bool,
}

impl Default for SitePlan {
    fn default() -> Self {
        Self {
            index_document: "index.html".to_string(),
            error_document: "error.html".to_string(),
            retain_on_prod: true,
        }
    }
}

// ============================================================================
// SECTION: Stack Plan
// ============================================================================

/// Stage-independent synthesis inputs.
///
/// # Invariants
/// - `tables` and `routes` are non-empty (validated at synthesis).
/// - The plan is immutable during synthesis; the same plan plus the same
///   stage always yields the same template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackPlan {
    /// Project prefix for physical names.
    pub project: ProjectName,
    /// Provider account parameter.
    pub account: AccountId,
    /// Provider region parameter.
    pub region: Region,
    /// Table logical-name catalog.
    pub tables: Vec<LogicalName>,
    /// Route catalog; the first entry is the primary auth route.
    pub routes: Vec<RoutePlan>,
    /// Deployable-unit parameters.
    pub function: FunctionPlan,
    /// Policy options.
    pub policy: PolicyOptions,
    /// Static-site options.
    pub site: SitePlan,
}

impl StackPlan {
    /// Returns the Project WIT plan for the given account and region.
    #[must_use]
    pub fn project_wit(account: AccountId, region: Region) -> Self {
        Self {
            project: ProjectName::new(DEFAULT_PROJECT),
            account,
            region,
            tables: DEFAULT_TABLES
                .iter()
                .map(|name| LogicalName::new(*name))
                .collect(),
            routes: vec![RoutePlan {
                path: "/auth".to_string(),
                method: HttpMethod::Get,
            }],
            function: FunctionPlan::project_wit_default(),
            policy: PolicyOptions::default(),
            site: SitePlan::default(),
        }
    }
}
