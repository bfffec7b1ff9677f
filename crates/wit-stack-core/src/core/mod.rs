// crates/wit-stack-core/src/core/mod.rs
// ============================================================================
// Module: Core Model
// Description: Stage, identifiers, policy, resources, graph, and template.
// Purpose: Re-export the canonical wit-stack data model.
// Dependencies: submodules only
// ============================================================================

//! ## Overview
//! The core model covers every entity of the stack topology: the stage
//! token, identifier newtypes, policy statements, resource specifications,
//! the resource graph arena, template emission, and canonical hashing. All
//! entities are immutable once synthesized.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod graph;
pub mod hashing;
pub mod identifiers;
pub mod policy;
pub mod resources;
pub mod stage;
pub mod template;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use graph::AttrKind;
pub use graph::GraphError;
pub use graph::NamingContext;
pub use graph::NodeHandle;
pub use graph::ResourceGraph;
pub use graph::ResourceNode;
pub use graph::ResourceRef;
pub use graph::ResourceSpec;
pub use hashing::HashError;
pub use hashing::TemplateDigest;
pub use identifiers::AccountId;
pub use identifiers::ExportName;
pub use identifiers::LogicalName;
pub use identifiers::ProjectName;
pub use identifiers::Region;
pub use identifiers::ResourceName;
pub use identifiers::StatementSid;
pub use policy::ArnPattern;
pub use policy::Effect;
pub use policy::PolicyAction;
pub use policy::PolicyError;
pub use policy::PolicyStatement;
pub use resources::AttributeType;
pub use resources::BillingMode;
pub use resources::BucketSpec;
pub use resources::FUNCTION_SERVICE_PRINCIPAL;
pub use resources::FunctionSpec;
pub use resources::HttpMethod;
pub use resources::OutputSpec;
pub use resources::PartitionKey;
pub use resources::RemovalPolicy;
pub use resources::RoleSpec;
pub use resources::RouteSpec;
pub use resources::TableSpec;
pub use resources::WebsiteConfig;
pub use stage::Stage;
pub use stage::StageError;
pub use template::ResolvedStatement;
pub use template::Template;
pub use template::TemplateOutput;
pub use template::TemplateResource;
