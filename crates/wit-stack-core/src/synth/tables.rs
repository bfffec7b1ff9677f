// crates/wit-stack-core/src/synth/tables.rs
// ============================================================================
// Module: Table Fan-out Builder
// Description: One uniformly-shaped table per catalog logical name.
// Purpose: Fan the fixed catalog out into stage-qualified tables.
// Dependencies: crate::core::{graph, identifiers, resources}, crate::synth::{plan, stack}
// ============================================================================

//! ## Overview
//! Every catalog entry becomes one table of identical shape: a single
//! string-typed `id` partition key and on-demand capacity. No secondary
//! indexes and no change streams are declared, even though the policy
//! builder can grant stream/index reads (see `PolicyOptions::grant_stream_read`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::graph::NodeHandle;
use crate::core::graph::ResourceGraph;
use crate::core::graph::ResourceSpec;
use crate::core::identifiers::ResourceName;
use crate::core::resources::BillingMode;
use crate::core::resources::PartitionKey;
use crate::core::resources::TableSpec;
use crate::synth::plan::StackPlan;
use crate::synth::stack::SynthError;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Declares one table per catalog logical name.
///
/// # Errors
///
/// Returns [`SynthError`] when a declaration fails (duplicate catalog
/// entries surface as duplicate logical ids).
pub fn declare_tables(
    graph: &mut ResourceGraph,
    plan: &StackPlan,
) -> Result<Vec<NodeHandle>, SynthError> {
    let stage = graph.stage();
    let mut handles = Vec::with_capacity(plan.tables.len());
    for logical in &plan.tables {
        let handle = graph.declare(
            format!("table-{logical}"),
            ResourceSpec::Table(TableSpec {
                logical: logical.clone(),
                name: ResourceName::table(&plan.project, logical, stage),
                partition_key: PartitionKey::catalog_default(),
                billing_mode: BillingMode::OnDemand,
            }),
        )?;
        handles.push(handle);
    }
    Ok(handles)
}
