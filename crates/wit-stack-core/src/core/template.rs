// crates/wit-stack-core/src/core/template.rs
// ============================================================================
// Module: Template Emission
// Description: Resolved, declarative template emitted from a resource graph.
// Purpose: Produce the deterministic document consumed by the deploy tooling.
// Dependencies: crate::core::{graph, hashing, policy, resources, stage}, serde
// ============================================================================

//! ## Overview
//! Emission is the second phase of synthesis: every [`ResourceRef`] in the
//! populated arena is resolved to a concrete string, and resources/outputs
//! are keyed through `BTreeMap` so serialization order is deterministic. An
//! empty graph emits an empty resource set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::graph::AttrKind;
use crate::core::graph::GraphError;
use crate::core::graph::NodeHandle;
use crate::core::graph::ResourceGraph;
use crate::core::graph::ResourceSpec;
use crate::core::hashing::HashError;
use crate::core::hashing::TemplateDigest;
use crate::core::hashing::canonical_json_bytes;
use crate::core::hashing::hash_canonical_json;
use crate::core::policy::Effect;
use crate::core::policy::PolicyStatement;
use crate::core::resources::BillingMode;
use crate::core::resources::HttpMethod;
use crate::core::resources::PartitionKey;
use crate::core::resources::RemovalPolicy;
use crate::core::resources::WebsiteConfig;
use crate::core::stage::Stage;

// ============================================================================
// SECTION: Resolved Statements
// ============================================================================

/// Permission statement with all references resolved to strings.
///
/// # Invariants
/// - `actions` and `resources` are non-empty (carried over from declaration).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStatement {
    /// Statement identifier.
    pub sid: String,
    /// Statement effect.
    pub effect: Effect,
    /// Granted permission verbs.
    pub actions: Vec<String>,
    /// Resolved resource patterns.
    pub resources: Vec<String>,
}

impl ResolvedStatement {
    /// Resolves a declared statement against the populated graph.
    fn resolve(graph: &ResourceGraph, statement: &PolicyStatement) -> Result<Self, GraphError> {
        let resources = statement
            .resources
            .iter()
            .map(|reference| graph.resolve(reference))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sid: statement.sid.as_str().to_string(),
            effect: statement.effect,
            actions: statement
                .actions
                .iter()
                .map(|action| action.as_str().to_string())
                .collect(),
            resources,
        })
    }
}

// ============================================================================
// SECTION: Template Resources
// ============================================================================

/// Resolved resource entry in the emitted template.
///
/// # Invariants
/// - Variants are stable for serialization and template matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateResource {
    /// Assumable identity with resolved statements.
    IamRole {
        /// Stage-qualified role name.
        role_name: String,
        /// Trust principal allowed to assume the role.
        trust_principal: String,
        /// Resolved permission statements.
        statements: Vec<ResolvedStatement>,
    },
    /// Deployable compute function.
    LambdaFunction {
        /// Stage-qualified function name.
        function_name: String,
        /// Packaged-code asset location.
        code_asset: String,
        /// Entry-point symbol.
        handler: String,
        /// Runtime identifier.
        runtime: String,
        /// Resolved executing-role identifier.
        role_arn: String,
        /// Resolved environment map.
        environment: BTreeMap<String, String>,
    },
    /// Gateway route with resolved identifiers.
    ApiRoute {
        /// Stage-qualified gateway name.
        api_name: String,
        /// HTTP verb.
        method: HttpMethod,
        /// Route path segment.
        path: String,
        /// Resolved route identifier.
        method_arn: String,
        /// Resolved public invoke URL.
        invoke_url: String,
        /// Resolved target function identifier.
        target_arn: String,
    },
    /// Keyed storage table.
    DynamoDbTable {
        /// Stage-qualified table name.
        table_name: String,
        /// Partition key definition.
        partition_key: PartitionKey,
        /// Capacity mode.
        billing_mode: BillingMode,
    },
    /// Static-site object store.
    S3Bucket {
        /// Stage-qualified bucket name.
        bucket_name: String,
        /// Public-read flag.
        public_read: bool,
        /// Static-site document configuration.
        website: WebsiteConfig,
        /// Teardown policy.
        removal_policy: RemovalPolicy,
        /// Resolved public site URL.
        website_url: String,
    },
}

impl TemplateResource {
    /// Returns the stage-qualified physical name of the resource.
    #[must_use]
    pub fn physical_name(&self) -> &str {
        match self {
            Self::IamRole {
                role_name, ..
            } => role_name,
            Self::LambdaFunction {
                function_name, ..
            } => function_name,
            Self::ApiRoute {
                api_name, ..
            } => api_name,
            Self::DynamoDbTable {
                table_name, ..
            } => table_name,
            Self::S3Bucket {
                bucket_name, ..
            } => bucket_name,
        }
    }
}

// ============================================================================
// SECTION: Template Outputs
// ============================================================================

/// Resolved derived output.
///
/// # Invariants
/// - `value` was resolved after all other entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOutput {
    /// Resolved output value.
    pub value: String,
    /// Human-readable description.
    pub description: String,
    /// Export name for cross-stack consumption.
    pub export_name: String,
}

// ============================================================================
// SECTION: Template
// ============================================================================

/// Deterministic declarative template for one stage instance.
///
/// # Invariants
/// - Resources and outputs are keyed maps with deterministic ordering.
/// - Re-emitting the same graph yields byte-identical canonical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Stage the template was synthesized for.
    pub stage: Stage,
    /// Resolved resources keyed by logical id.
    pub resources: BTreeMap<String, TemplateResource>,
    /// Resolved outputs keyed by output key.
    pub outputs: BTreeMap<String, TemplateOutput>,
}

impl Template {
    /// Emits a resolved template from a populated resource graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] when a reference dangles, an attribute is
    /// unsupported, or output keys collide.
    pub fn from_graph(graph: &ResourceGraph) -> Result<Self, GraphError> {
        let mut resources = BTreeMap::new();
        for (index, node) in graph.nodes().iter().enumerate() {
            let raw = u64::try_from(index + 1).unwrap_or(u64::MAX);
            let handle = NodeHandle::from_raw(raw).ok_or(GraphError::UnknownHandle {
                handle: raw,
            })?;
            let resolved = resolve_resource(graph, handle, &node.spec)?;
            resources.insert(node.logical_id.clone(), resolved);
        }

        let mut outputs = BTreeMap::new();
        for output in graph.outputs() {
            let resolved = TemplateOutput {
                value: graph.resolve(&output.value)?,
                description: output.description.clone(),
                export_name: output.export_name.as_str().to_string(),
            };
            if outputs.insert(output.key.clone(), resolved).is_some() {
                return Err(GraphError::DuplicateOutputKey {
                    key: output.key.clone(),
                });
            }
        }

        Ok(Self {
            stage: graph.stage(),
            resources,
            outputs,
        })
    }

    /// Returns the canonical JSON bytes of the template.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonical serialization fails.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, HashError> {
        canonical_json_bytes(self)
    }

    /// Returns the SHA-256 digest of the canonical template bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when serialization or hex rendering fails.
    pub fn digest(&self) -> Result<TemplateDigest, HashError> {
        hash_canonical_json(self)
    }

    /// Returns the set of stage-qualified physical names in the template.
    #[must_use]
    pub fn physical_names(&self) -> BTreeSet<String> {
        self.resources
            .values()
            .map(|resource| resource.physical_name().to_string())
            .collect()
    }
}

/// Resolves one declared resource into its template entry.
///
/// `handle` is the arena handle of the node being emitted, used to resolve
/// the node's own derived attributes (route identifier, site URL).
fn resolve_resource(
    graph: &ResourceGraph,
    handle: NodeHandle,
    spec: &ResourceSpec,
) -> Result<TemplateResource, GraphError> {
    match spec {
        ResourceSpec::Role(role) => {
            let statements = role
                .statements
                .iter()
                .map(|statement| ResolvedStatement::resolve(graph, statement))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TemplateResource::IamRole {
                role_name: role.name.as_str().to_string(),
                trust_principal: role.trust_principal.clone(),
                statements,
            })
        }
        ResourceSpec::Function(function) => {
            let environment = function
                .environment
                .iter()
                .map(|(key, reference)| Ok((key.clone(), graph.resolve(reference)?)))
                .collect::<Result<BTreeMap<_, _>, GraphError>>()?;
            Ok(TemplateResource::LambdaFunction {
                function_name: function.name.as_str().to_string(),
                code_asset: function.code_asset.clone(),
                handler: function.handler.clone(),
                runtime: function.runtime.clone(),
                role_arn: graph.resolve(&function.role)?,
                environment,
            })
        }
        ResourceSpec::Route(route) => Ok(TemplateResource::ApiRoute {
            api_name: route.api_name.as_str().to_string(),
            method: route.method,
            path: route.path.clone(),
            method_arn: graph.attr(handle, AttrKind::Arn)?,
            invoke_url: graph.attr(handle, AttrKind::Url)?,
            target_arn: graph.resolve(&route.target)?,
        }),
        ResourceSpec::Table(table) => Ok(TemplateResource::DynamoDbTable {
            table_name: table.name.as_str().to_string(),
            partition_key: table.partition_key.clone(),
            billing_mode: table.billing_mode,
        }),
        ResourceSpec::Bucket(bucket) => Ok(TemplateResource::S3Bucket {
            bucket_name: bucket.name.as_str().to_string(),
            public_read: bucket.public_read,
            website: bucket.website.clone(),
            removal_policy: bucket.removal_policy,
            website_url: graph.attr(handle, AttrKind::Url)?,
        }),
    }
}
