// crates/wit-stack-core/src/core/graph.rs
// ============================================================================
// Module: Resource Graph Arena
// Description: Arena of declared resources with two-phase reference resolution.
// Purpose: Let builders declare forward references resolved after population.
// Dependencies: crate::core::{identifiers, policy, resources, stage}, serde, thiserror
// ============================================================================

//! ## Overview
//! The resource graph is an arena of declared resources with stable 1-based
//! handles. Declaration and resolution are separate phases: builders declare
//! entities holding [`ResourceRef`] forward references (the self-assume
//! statement references the role before any statement is attached; the
//! invoke-grant references the route), and every reference is resolved
//! against the fully populated arena at template emission. This mirrors how
//! the external provisioning engine resolves forward identifiers at apply
//! time, but makes the round-trip checkable offline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::AccountId;
use crate::core::identifiers::Region;
use crate::core::resources::BucketSpec;
use crate::core::resources::FunctionSpec;
use crate::core::resources::OutputSpec;
use crate::core::resources::RoleSpec;
use crate::core::resources::RouteSpec;
use crate::core::resources::TableSpec;
use crate::core::stage::Stage;

// ============================================================================
// SECTION: Naming Context
// ============================================================================

/// Parameters threaded through identifier resolution.
///
/// # Invariants
/// - One context per stage instance; contexts are never shared across stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingContext {
    /// Provider account identifier.
    pub account: AccountId,
    /// Provider region identifier.
    pub region: Region,
    /// Deployment stage for this graph.
    pub stage: Stage,
}

// ============================================================================
// SECTION: Handles and References
// ============================================================================

/// Stable handle into the resource graph arena.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based); index `get() - 1` into the arena.
/// - Handles are only valid for the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeHandle(NonZeroU64);

impl NodeHandle {
    /// Creates a handle from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Creates a handle from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw handle value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

/// Resolvable attribute of a declared resource.
///
/// # Invariants
/// - Variants are stable for serialization and template matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrKind {
    /// Provider-scoped resource identifier.
    Arn,
    /// Stage-qualified physical name.
    Name,
    /// Public URL (routes and buckets only).
    Url,
}

impl AttrKind {
    /// Returns the attribute label used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arn => "arn",
            Self::Name => "name",
            Self::Url => "url",
        }
    }
}

/// Reference to a literal pattern or a declared resource attribute.
///
/// # Invariants
/// - `Attr` references are resolved only after the arena is fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceRef {
    /// Literal string or ARN-like glob pattern.
    Literal {
        /// Literal value.
        value: String,
    },
    /// Attribute of a declared resource, resolved in the second phase.
    Attr {
        /// Handle of the referenced resource.
        handle: NodeHandle,
        /// Attribute to resolve.
        attr: AttrKind,
    },
}

impl ResourceRef {
    /// Creates a literal reference.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Creates a reference to a resource's identifier.
    #[must_use]
    pub const fn arn(handle: NodeHandle) -> Self {
        Self::Attr {
            handle,
            attr: AttrKind::Arn,
        }
    }

    /// Creates a reference to a resource's physical name.
    #[must_use]
    pub const fn name(handle: NodeHandle) -> Self {
        Self::Attr {
            handle,
            attr: AttrKind::Name,
        }
    }

    /// Creates a reference to a resource's public URL.
    #[must_use]
    pub const fn url(handle: NodeHandle) -> Self {
        Self::Attr {
            handle,
            attr: AttrKind::Url,
        }
    }
}

// ============================================================================
// SECTION: Resource Nodes
// ============================================================================

/// Declared resource specification variants.
///
/// # Invariants
/// - Variants are stable for serialization and template matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceSpec {
    /// Assumable identity.
    Role(RoleSpec),
    /// Deployable compute function.
    Function(FunctionSpec),
    /// Gateway route.
    Route(RouteSpec),
    /// Keyed storage table.
    Table(TableSpec),
    /// Static-site object store.
    Bucket(BucketSpec),
}

/// Arena entry pairing a logical identifier with its specification.
///
/// # Invariants
/// - `logical_id` is unique within the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Logical identifier within the template.
    pub logical_id: String,
    /// Declared resource specification.
    pub spec: ResourceSpec,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by graph declaration and resolution.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// A handle did not refer to a declared node.
    #[error("unknown resource handle: {handle}")]
    UnknownHandle {
        /// Raw handle value.
        handle: u64,
    },
    /// Two declarations used the same logical identifier.
    #[error("duplicate logical id: {logical_id}")]
    DuplicateLogicalId {
        /// Conflicting logical identifier.
        logical_id: String,
    },
    /// Two outputs used the same key.
    #[error("duplicate output key: {key}")]
    DuplicateOutputKey {
        /// Conflicting output key.
        key: String,
    },
    /// A role operation targeted a non-role node.
    #[error("resource {logical_id} is not a role")]
    NotARole {
        /// Logical identifier of the targeted node.
        logical_id: String,
    },
    /// The requested attribute is not defined for the resource kind.
    #[error("resource {logical_id} has no {attr} attribute")]
    AttributeUnsupported {
        /// Logical identifier of the targeted node.
        logical_id: String,
        /// Requested attribute label.
        attr: &'static str,
    },
}

// ============================================================================
// SECTION: Resource Graph
// ============================================================================

/// Arena of declared resources for one stage instance.
///
/// # Invariants
/// - Handles are stable for the lifetime of the graph.
/// - Declaration order is preserved; emission sorts by logical id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGraph {
    /// Naming parameters for identifier resolution.
    context: NamingContext,
    /// Declared resource nodes.
    nodes: Vec<ResourceNode>,
    /// Derived outputs, computed after all other entities resolve.
    outputs: Vec<OutputSpec>,
}

impl ResourceGraph {
    /// Creates an empty graph for the given naming context.
    #[must_use]
    pub const fn new(context: NamingContext) -> Self {
        Self {
            context,
            nodes: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Returns the naming context.
    #[must_use]
    pub const fn context(&self) -> &NamingContext {
        &self.context
    }

    /// Returns the stage this graph belongs to.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.context.stage
    }

    /// Returns the number of declared resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true when no resources are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the declared nodes in declaration order.
    #[must_use]
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    /// Returns the declared outputs in declaration order.
    #[must_use]
    pub fn outputs(&self) -> &[OutputSpec] {
        &self.outputs
    }

    /// Declares a resource and returns its stable handle.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateLogicalId`] when the logical id is
    /// already declared.
    pub fn declare(
        &mut self,
        logical_id: impl Into<String>,
        spec: ResourceSpec,
    ) -> Result<NodeHandle, GraphError> {
        let logical_id = logical_id.into();
        if self.nodes.iter().any(|node| node.logical_id == logical_id) {
            return Err(GraphError::DuplicateLogicalId {
                logical_id,
            });
        }
        self.nodes.push(ResourceNode {
            logical_id,
            spec,
        });
        let raw = u64::try_from(self.nodes.len()).unwrap_or(u64::MAX);
        NodeHandle::from_raw(raw).ok_or(GraphError::UnknownHandle {
            handle: raw,
        })
    }

    /// Returns the node behind a handle.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownHandle`] for dangling handles.
    pub fn node(&self, handle: NodeHandle) -> Result<&ResourceNode, GraphError> {
        let index = usize::try_from(handle.get() - 1).map_err(|_| GraphError::UnknownHandle {
            handle: handle.get(),
        })?;
        self.nodes.get(index).ok_or(GraphError::UnknownHandle {
            handle: handle.get(),
        })
    }

    /// Returns a mutable role for additive statement attachment.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownHandle`] for dangling handles and
    /// [`GraphError::NotARole`] when the node is not a role.
    pub fn role_mut(&mut self, handle: NodeHandle) -> Result<&mut RoleSpec, GraphError> {
        let index = usize::try_from(handle.get() - 1).map_err(|_| GraphError::UnknownHandle {
            handle: handle.get(),
        })?;
        let node = self.nodes.get_mut(index).ok_or(GraphError::UnknownHandle {
            handle: handle.get(),
        })?;
        match &mut node.spec {
            ResourceSpec::Role(role) => Ok(role),
            ResourceSpec::Function(_)
            | ResourceSpec::Route(_)
            | ResourceSpec::Table(_)
            | ResourceSpec::Bucket(_) => Err(GraphError::NotARole {
                logical_id: node.logical_id.clone(),
            }),
        }
    }

    /// Declares a derived output.
    pub fn add_output(&mut self, output: OutputSpec) {
        self.outputs.push(output);
    }

    /// Resolves a reference against the populated arena.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] for dangling handles or unsupported attributes.
    pub fn resolve(&self, reference: &ResourceRef) -> Result<String, GraphError> {
        match reference {
            ResourceRef::Literal {
                value,
            } => Ok(value.clone()),
            ResourceRef::Attr {
                handle,
                attr,
            } => self.attr(*handle, *attr),
        }
    }

    /// Resolves an attribute of a declared resource.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] for dangling handles or unsupported attributes.
    pub fn attr(&self, handle: NodeHandle, attr: AttrKind) -> Result<String, GraphError> {
        let node = self.node(handle)?;
        let ctx = &self.context;
        let unsupported = || GraphError::AttributeUnsupported {
            logical_id: node.logical_id.clone(),
            attr: attr.as_str(),
        };
        match (&node.spec, attr) {
            (ResourceSpec::Role(role), AttrKind::Arn) => Ok(format!(
                "arn:aws:iam::{account}:role/{name}",
                account = ctx.account,
                name = role.name
            )),
            (ResourceSpec::Role(role), AttrKind::Name) => Ok(role.name.as_str().to_string()),
            (ResourceSpec::Function(function), AttrKind::Arn) => Ok(format!(
                "arn:aws:lambda:{region}:{account}:function:{name}",
                region = ctx.region,
                account = ctx.account,
                name = function.name
            )),
            (ResourceSpec::Function(function), AttrKind::Name) => {
                Ok(function.name.as_str().to_string())
            }
            (ResourceSpec::Route(route), AttrKind::Arn) => Ok(format!(
                "arn:aws:execute-api:{region}:{account}:{api}/{stage}/{method}{path}",
                region = ctx.region,
                account = ctx.account,
                api = route.api_name,
                stage = ctx.stage,
                method = route.method,
                path = route.path
            )),
            (ResourceSpec::Route(route), AttrKind::Name) => Ok(route.api_name.as_str().to_string()),
            (ResourceSpec::Route(route), AttrKind::Url) => Ok(format!(
                "https://{api}.execute-api.{region}.amazonaws.com/{stage}{path}",
                api = route.api_name,
                region = ctx.region,
                stage = ctx.stage,
                path = route.path
            )),
            (ResourceSpec::Table(table), AttrKind::Arn) => Ok(format!(
                "arn:aws:dynamodb:{region}:{account}:table/{name}",
                region = ctx.region,
                account = ctx.account,
                name = table.name
            )),
            (ResourceSpec::Table(table), AttrKind::Name) => Ok(table.name.as_str().to_string()),
            (ResourceSpec::Bucket(bucket), AttrKind::Arn) => Ok(format!(
                "arn:aws:s3:::{name}",
                name = bucket.name
            )),
            (ResourceSpec::Bucket(bucket), AttrKind::Name) => Ok(bucket.name.as_str().to_string()),
            (ResourceSpec::Bucket(bucket), AttrKind::Url) => Ok(format!(
                "http://{name}.s3-website-{region}.amazonaws.com",
                name = bucket.name,
                region = ctx.region
            )),
            (
                ResourceSpec::Role(_) | ResourceSpec::Function(_) | ResourceSpec::Table(_),
                AttrKind::Url,
            ) => Err(unsupported()),
        }
    }
}
