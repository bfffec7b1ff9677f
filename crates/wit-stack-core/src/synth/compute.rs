// crates/wit-stack-core/src/synth/compute.rs
// ============================================================================
// Module: Compute and Gateway Builder
// Description: Deployable unit, gateway routes, and the invoke grant.
// Purpose: Close the self-invocation loop between identity and route.
// Dependencies: crate::core::{graph, identifiers, resources}, crate::synth::{plan, policy, stack}
// ============================================================================

//! ## Overview
//! The function executes as the stage identity and additionally receives the
//! identity's identifier through its environment, so the handler can assume
//! the very role it already runs as (which is why the identity carries the
//! self-assume grant). Each route gets a fourth, route-specific invoke grant
//! attached after the route is declared: the grant's resource is the route's
//! generated identifier, a genuine ordering dependency.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::graph::NodeHandle;
use crate::core::graph::ResourceGraph;
use crate::core::graph::ResourceRef;
use crate::core::graph::ResourceSpec;
use crate::core::identifiers::ResourceName;
use crate::core::resources::FunctionSpec;
use crate::core::resources::RouteSpec;
use crate::synth::plan::StackPlan;
use crate::synth::policy::AccessPolicyBuilder;
use crate::synth::stack::SynthError;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Logical id of the deployable unit.
pub const FUNCTION_LOGICAL_ID: &str = "credential-retriever-lambda";

/// Environment key exposing the identity's identifier to the handler.
pub const ROLE_ARN_ENV_KEY: &str = "roleArn";

/// Handles produced by the compute and gateway builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeHandles {
    /// Deployable unit handle.
    pub function: NodeHandle,
    /// Route handles in catalog order.
    pub routes: Vec<NodeHandle>,
}

/// Declares the function, the routes, and the per-route invoke grants.
///
/// # Errors
///
/// Returns [`SynthError`] when declaration or grant construction fails.
pub fn declare_compute(
    graph: &mut ResourceGraph,
    plan: &StackPlan,
    role: NodeHandle,
) -> Result<ComputeHandles, SynthError> {
    let stage = graph.stage();

    let mut environment = BTreeMap::new();
    environment.insert(ROLE_ARN_ENV_KEY.to_string(), ResourceRef::arn(role));
    let function = graph.declare(
        FUNCTION_LOGICAL_ID,
        ResourceSpec::Function(FunctionSpec {
            name: ResourceName::qualified(&plan.function.base_name, stage),
            code_asset: plan.function.code_asset.clone(),
            handler: plan.function.handler.clone(),
            runtime: plan.function.runtime.clone(),
            role: ResourceRef::arn(role),
            environment,
        }),
    )?;

    let api_name = ResourceName::qualified(&format!("{}-auth", plan.project), stage);
    let builder = AccessPolicyBuilder::new(plan, stage);
    let mut routes = Vec::with_capacity(plan.routes.len());
    for route_plan in &plan.routes {
        let logical_id = route_logical_id(route_plan.path.as_str(), route_plan.method.as_str());
        let route = graph.declare(
            logical_id.clone(),
            ResourceSpec::Route(RouteSpec {
                api_name: api_name.clone(),
                path: route_plan.path.clone(),
                method: route_plan.method,
                target: ResourceRef::arn(function),
            }),
        )?;

        // The grant is only attached once the route node exists.
        let sid = format!("allowInvoke-{logical_id}");
        let grant = builder.invoke_statement(sid, route)?;
        graph.role_mut(role)?.attach(grant);
        routes.push(route);
    }

    Ok(ComputeHandles {
        function,
        routes,
    })
}

/// Builds the logical id for a route from its path and verb.
fn route_logical_id(path: &str, method: &str) -> String {
    let slug = path.trim_matches('/').replace('/', "-");
    format!("route-{method}-{slug}", method = method.to_lowercase())
}
