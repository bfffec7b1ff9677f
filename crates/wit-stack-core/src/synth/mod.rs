// crates/wit-stack-core/src/synth/mod.rs
// ============================================================================
// Module: Synthesis Builders
// Description: The five builders and the per-stage assembly root.
// Purpose: Re-export the synthesis surface of wit-stack.
// Dependencies: submodules only
// ============================================================================

//! ## Overview
//! Builders declare entities into a [`crate::core::ResourceGraph`] arena in a
//! fixed order: identity, compute and gateway, table fan-out, static site.
//! The assembly root composes them once per stage and emits the resolved
//! template.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod compute;
pub mod identity;
pub mod plan;
pub mod policy;
pub mod site;
pub mod stack;
pub mod tables;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use compute::ComputeHandles;
pub use compute::FUNCTION_LOGICAL_ID;
pub use compute::ROLE_ARN_ENV_KEY;
pub use compute::declare_compute;
pub use identity::ROLE_LOGICAL_ID;
pub use identity::declare_identity;
pub use plan::DEFAULT_PROJECT;
pub use plan::DEFAULT_TABLES;
pub use plan::FunctionPlan;
pub use plan::PolicyOptions;
pub use plan::RoutePlan;
pub use plan::SitePlan;
pub use plan::StackPlan;
pub use policy::ASSUME_ROLE_ACTION;
pub use policy::AccessPolicyBuilder;
pub use policy::CRUD_ACTIONS;
pub use policy::INVOKE_ACTION;
pub use policy::STREAM_INDEX_ACTIONS;
pub use site::AUTH_URL_OUTPUT;
pub use site::BUCKET_LOGICAL_ID;
pub use site::SITE_URL_OUTPUT;
pub use site::declare_site;
pub use stack::StackSynthesizer;
pub use stack::SynthError;
pub use tables::declare_tables;
