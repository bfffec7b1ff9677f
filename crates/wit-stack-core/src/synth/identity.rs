// crates/wit-stack-core/src/synth/identity.rs
// ============================================================================
// Module: Identity Builder
// Description: One assumable identity per stage with attached statements.
// Purpose: Declare the role and attach the base policy statements.
// Dependencies: crate::core::{graph, identifiers, resources}, crate::synth::{plan, policy, stack}
// ============================================================================

//! ## Overview
//! Exactly one identity exists per stage, trusted only by the function
//! runtime's service principal. Statements are attached in builder order for
//! deterministic emission, but the permission model is a union of grants, so
//! order carries no meaning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::graph::NodeHandle;
use crate::core::graph::ResourceGraph;
use crate::core::graph::ResourceSpec;
use crate::core::identifiers::ResourceName;
use crate::core::resources::RoleSpec;
use crate::synth::plan::StackPlan;
use crate::synth::policy::AccessPolicyBuilder;
use crate::synth::stack::SynthError;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Logical id of the per-stage identity.
pub const ROLE_LOGICAL_ID: &str = "dynamo-auth-role";

/// Declares the stage identity and attaches its base statements.
///
/// The role is declared first so the self-assume statement can carry a
/// forward reference to the role's own handle.
///
/// # Errors
///
/// Returns [`SynthError`] when declaration or statement construction fails.
pub fn declare_identity(graph: &mut ResourceGraph, plan: &StackPlan) -> Result<NodeHandle, SynthError> {
    let stage = graph.stage();
    let name = ResourceName::qualified(&plan.function.role_base_name, stage);
    let role = graph.declare(ROLE_LOGICAL_ID, ResourceSpec::Role(RoleSpec::new(name)))?;

    let builder = AccessPolicyBuilder::new(plan, stage);
    for statement in builder.base_statements(role)? {
        graph.role_mut(role)?.attach(statement);
    }
    Ok(role)
}
