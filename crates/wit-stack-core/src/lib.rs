// crates/wit-stack-core/src/lib.rs
// ============================================================================
// Module: wit-stack Core Library
// Description: Deterministic infrastructure-template synthesis for Project WIT.
// Purpose: Expose the core model and the per-stage synthesis surface.
// Dependencies: serde, serde_json, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! wit-stack-core turns a stage token plus fixed catalogs into a declarative
//! resource-graph template: one assumable identity with least-privilege
//! statements, one credential-retriever function behind a gateway route, a
//! fan-out of keyed tables, and a static-site bucket, all stage-qualified so
//! stages can never collide. Synthesis is a pure function: no I/O, no shared
//! state, byte-identical output for identical inputs. The external
//! provisioning engine owns orchestration, diffing, and rollout; this crate
//! only describes the graph it consumes.
//!
//! ## Index
//! - Model: [`core`] (stage, identifiers, policy, resources, graph, template)
//! - Synthesis: [`synth`] (builders, [`StackSynthesizer`])

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod synth;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::core::AccountId;
pub use crate::core::ArnPattern;
pub use crate::core::Effect;
pub use crate::core::GraphError;
pub use crate::core::HashError;
pub use crate::core::HttpMethod;
pub use crate::core::LogicalName;
pub use crate::core::NamingContext;
pub use crate::core::NodeHandle;
pub use crate::core::PolicyError;
pub use crate::core::PolicyStatement;
pub use crate::core::ProjectName;
pub use crate::core::Region;
pub use crate::core::ResourceGraph;
pub use crate::core::ResourceName;
pub use crate::core::ResourceRef;
pub use crate::core::ResourceSpec;
pub use crate::core::Stage;
pub use crate::core::StageError;
pub use crate::core::Template;
pub use crate::core::TemplateDigest;
pub use crate::core::TemplateResource;
pub use crate::synth::StackPlan;
pub use crate::synth::StackSynthesizer;
pub use crate::synth::SynthError;
