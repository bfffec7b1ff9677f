// crates/wit-stack-core/src/core/resources.rs
// ============================================================================
// Module: Resource Specifications
// Description: Declared shapes for roles, functions, routes, tables, buckets.
// Purpose: Capture the immutable per-stage resource declarations.
// Dependencies: crate::core::{graph, identifiers, policy}, serde
// ============================================================================

//! ## Overview
//! Resource specifications are immutable once synthesized: the only mutation
//! the model permits is additive statement attachment on a role before
//! template emission, mirroring the additive-only identity lifecycle. All
//! cross-resource links are [`ResourceRef`] values resolved in a second pass
//! once the resource graph arena is fully populated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::graph::ResourceRef;
use crate::core::identifiers::ExportName;
use crate::core::identifiers::LogicalName;
use crate::core::identifiers::ResourceName;
use crate::core::policy::PolicyStatement;

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Service principal trusted to assume stack roles.
///
/// The trust boundary is fixed to the function runtime and is deliberately
/// not parameterizable per call.
pub const FUNCTION_SERVICE_PRINCIPAL: &str = "lambda.amazonaws.com";

/// Assumable identity bound to the function-execution trust boundary.
///
/// # Invariants
/// - `trust_principal` is always [`FUNCTION_SERVICE_PRINCIPAL`].
/// - Statement attachment is additive only; no removal is modeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    /// Stage-qualified role name.
    pub name: ResourceName,
    /// Trust principal allowed to assume the role.
    pub trust_principal: String,
    /// Attached permission statements.
    pub statements: Vec<PolicyStatement>,
}

impl RoleSpec {
    /// Creates a role with the fixed function-runtime trust principal.
    #[must_use]
    pub fn new(name: ResourceName) -> Self {
        Self {
            name,
            trust_principal: FUNCTION_SERVICE_PRINCIPAL.to_string(),
            statements: Vec::new(),
        }
    }

    /// Attaches a statement to the role.
    pub fn attach(&mut self, statement: PolicyStatement) {
        self.statements.push(statement);
    }
}

// ============================================================================
// SECTION: Deployable Unit
// ============================================================================

/// Packaged, independently invocable compute function.
///
/// # Invariants
/// - `role` must reference an already declared [`RoleSpec`] node.
/// - `environment` values are resolved after the arena is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Stage-qualified function name.
    pub name: ResourceName,
    /// Packaged-code asset location.
    pub code_asset: String,
    /// Entry-point symbol within the packaged code.
    pub handler: String,
    /// Runtime identifier for the function host.
    pub runtime: String,
    /// Executing identity reference.
    pub role: ResourceRef,
    /// Environment key-value map with late-resolved values.
    pub environment: BTreeMap<String, ResourceRef>,
}

// ============================================================================
// SECTION: Route
// ============================================================================

/// HTTP verb for a gateway route.
///
/// # Invariants
/// - Variants are stable for serialization and template matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
}

impl HttpMethod {
    /// Returns the canonical uppercase verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway route proxying one path+verb to a function.
///
/// # Invariants
/// - `path` starts with `/`.
/// - `target` must reference an already declared [`FunctionSpec`] node.
/// - Requests and responses pass through without transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Stage-qualified gateway name, also used as the API identifier.
    pub api_name: ResourceName,
    /// Route path segment.
    pub path: String,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Target function reference.
    pub target: ResourceRef,
}

// ============================================================================
// SECTION: Table
// ============================================================================

/// Partition key attribute type.
///
/// # Invariants
/// - Variants are stable for serialization and template matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// String-typed attribute.
    String,
    /// Number-typed attribute.
    Number,
    /// Binary-typed attribute.
    Binary,
}

/// Partition key definition for a keyed table.
///
/// # Invariants
/// - `name` is non-empty for every catalog table (`id` in the fixed shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionKey {
    /// Attribute name.
    pub name: String,
    /// Attribute type.
    pub attribute_type: AttributeType,
}

impl PartitionKey {
    /// Returns the uniform catalog partition key: string-typed `id`.
    #[must_use]
    pub fn catalog_default() -> Self {
        Self {
            name: "id".to_string(),
            attribute_type: AttributeType::String,
        }
    }
}

/// Table capacity mode.
///
/// # Invariants
/// - Variants are stable for serialization and template matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    /// On-demand, pay-per-request capacity.
    OnDemand,
    /// Provisioned capacity.
    Provisioned,
}

/// Managed keyed storage table.
///
/// # Invariants
/// - `name` equals `<project>-<logical>-<stage>`.
/// - No secondary indexes and no change streams are modeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Logical entity name drawn from the catalog.
    pub logical: LogicalName,
    /// Stage-qualified physical name.
    pub name: ResourceName,
    /// Partition key definition.
    pub partition_key: PartitionKey,
    /// Capacity mode.
    pub billing_mode: BillingMode,
}

// ============================================================================
// SECTION: Bucket
// ============================================================================

/// Teardown policy applied when a stage is destroyed.
///
/// # Invariants
/// - Variants are stable for serialization and template matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Contents are deleted with the stage.
    Destroy,
    /// Contents are retained when the stage is torn down.
    Retain,
}

/// Static-site document configuration.
///
/// # Invariants
/// - Both documents are object keys within the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteConfig {
    /// Index document object key.
    pub index_document: String,
    /// Error document object key.
    pub error_document: String,
}

/// Managed object store configured for static-site hosting.
///
/// # Invariants
/// - `name` equals `<project>-<stage>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSpec {
    /// Stage-qualified bucket name.
    pub name: ResourceName,
    /// Public-read flag for site objects.
    pub public_read: bool,
    /// Static-site document configuration.
    pub website: WebsiteConfig,
    /// Teardown policy for the stage.
    pub removal_policy: RemovalPolicy,
}

// ============================================================================
// SECTION: Outputs
// ============================================================================

/// Derived output value exported for downstream tooling.
///
/// # Invariants
/// - `value` is resolved after all other entities resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Output key.
    pub key: String,
    /// Computed value reference.
    pub value: ResourceRef,
    /// Human-readable description.
    pub description: String,
    /// Export name for cross-stack consumption.
    pub export_name: ExportName,
}
