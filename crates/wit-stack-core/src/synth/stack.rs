// crates/wit-stack-core/src/synth/stack.rs
// ============================================================================
// Module: Assembly Root
// Description: Per-stage composition of the five builders into one template.
// Purpose: Provide the pure (stage, plan) -> template synthesis entry point.
// Dependencies: crate::core, crate::synth::{compute, identity, plan, site, tables}, thiserror
// ============================================================================

//! ## Overview
//! The assembly root composes the builders once per stage: identity, then
//! compute and gateway, then tables, then the static site. Synthesis is a
//! single-pass, side-effect-free transformation; each stage produces an
//! entirely independent graph, so the three stage instances cannot collide.
//! Re-running with the same plan and stage yields byte-identical output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::graph::GraphError;
use crate::core::graph::NamingContext;
use crate::core::graph::ResourceGraph;
use crate::core::policy::PolicyError;
use crate::core::stage::Stage;
use crate::core::template::Template;
use crate::synth::compute::declare_compute;
use crate::synth::identity::declare_identity;
use crate::synth::plan::StackPlan;
use crate::synth::site::declare_site;
use crate::synth::tables::declare_tables;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised during stack synthesis.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthError {
    /// The table catalog was empty.
    #[error("table catalog is empty")]
    EmptyTableCatalog,
    /// The route catalog was empty.
    #[error("route catalog is empty")]
    EmptyRouteCatalog,
    /// Resource graph declaration or resolution failed.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    /// Policy statement construction failed.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),
}

// ============================================================================
// SECTION: Synthesizer
// ============================================================================

/// Per-stage stack synthesizer.
///
/// # Invariants
/// - The plan is immutable for the synthesizer's lifetime.
/// - `synthesize` is deterministic: same plan plus same stage, same bytes.
#[derive(Debug, Clone)]
pub struct StackSynthesizer {
    /// Stage-independent synthesis inputs.
    plan: StackPlan,
}

impl StackSynthesizer {
    /// Creates a synthesizer over the given plan.
    #[must_use]
    pub const fn new(plan: StackPlan) -> Self {
        Self {
            plan,
        }
    }

    /// Returns the synthesis plan.
    #[must_use]
    pub const fn plan(&self) -> &StackPlan {
        &self.plan
    }

    /// Populates the resource graph for one stage.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError`] when a catalog is empty or declaration fails.
    pub fn graph(&self, stage: Stage) -> Result<ResourceGraph, SynthError> {
        if self.plan.tables.is_empty() {
            return Err(SynthError::EmptyTableCatalog);
        }
        if self.plan.routes.is_empty() {
            return Err(SynthError::EmptyRouteCatalog);
        }

        let mut graph = ResourceGraph::new(NamingContext {
            account: self.plan.account.clone(),
            region: self.plan.region.clone(),
            stage,
        });

        let role = declare_identity(&mut graph, &self.plan)?;
        let compute = declare_compute(&mut graph, &self.plan, role)?;
        declare_tables(&mut graph, &self.plan)?;
        let auth_route = *compute.routes.first().ok_or(SynthError::EmptyRouteCatalog)?;
        declare_site(&mut graph, &self.plan, auth_route)?;
        Ok(graph)
    }

    /// Synthesizes the resolved template for one stage.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError`] when graph population or emission fails.
    pub fn synthesize(&self, stage: Stage) -> Result<Template, SynthError> {
        let graph = self.graph(stage)?;
        Ok(Template::from_graph(&graph)?)
    }

    /// Synthesizes the three isolated stage templates in deployment order.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError`] when any stage fails to synthesize.
    pub fn synthesize_all(&self) -> Result<Vec<Template>, SynthError> {
        Stage::ALL.iter().map(|stage| self.synthesize(*stage)).collect()
    }
}
