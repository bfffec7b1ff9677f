// crates/wit-stack-core/src/synth/site.rs
// ============================================================================
// Module: Static Site Builder
// Description: Public static-hosting bucket plus the two derived outputs.
// Purpose: Declare the site bucket and export the site and API URLs.
// Dependencies: crate::core::{graph, identifiers, resources}, crate::synth::{plan, stack}
// ============================================================================

//! ## Overview
//! One public object store per stage serves the static site. The teardown
//! policy is stage-conditional: dev and beta destroy contents with the
//! stage, prod retains them unless the plan opts out. Both outputs are
//! resolved after all other entities; the API URL embeds the actual stage
//! segment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::graph::NodeHandle;
use crate::core::graph::ResourceGraph;
use crate::core::graph::ResourceRef;
use crate::core::graph::ResourceSpec;
use crate::core::identifiers::ExportName;
use crate::core::identifiers::ResourceName;
use crate::core::resources::BucketSpec;
use crate::core::resources::OutputSpec;
use crate::core::resources::RemovalPolicy;
use crate::core::resources::WebsiteConfig;
use crate::core::stage::Stage;
use crate::synth::plan::StackPlan;
use crate::synth::stack::SynthError;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Logical id of the static-site bucket.
pub const BUCKET_LOGICAL_ID: &str = "static-site";

/// Output key for the public site URL.
pub const SITE_URL_OUTPUT: &str = "webSiteStaticUrl";

/// Output key for the auth API URL.
pub const AUTH_URL_OUTPUT: &str = "webSiteAuthUrl";

/// Declares the site bucket and the two derived outputs.
///
/// `auth_route` is the primary route whose public URL becomes the
/// `webSiteAuthUrl` output.
///
/// # Errors
///
/// Returns [`SynthError`] when the declaration fails.
pub fn declare_site(
    graph: &mut ResourceGraph,
    plan: &StackPlan,
    auth_route: NodeHandle,
) -> Result<NodeHandle, SynthError> {
    let stage = graph.stage();
    let removal_policy = if stage.is_prod() && plan.site.retain_on_prod {
        RemovalPolicy::Retain
    } else {
        RemovalPolicy::Destroy
    };

    let bucket = graph.declare(
        BUCKET_LOGICAL_ID,
        ResourceSpec::Bucket(BucketSpec {
            name: ResourceName::qualified(plan.project.as_str(), stage),
            public_read: true,
            website: WebsiteConfig {
                index_document: plan.site.index_document.clone(),
                error_document: plan.site.error_document.clone(),
            },
            removal_policy,
        }),
    )?;

    graph.add_output(OutputSpec {
        key: SITE_URL_OUTPUT.to_string(),
        value: ResourceRef::url(bucket),
        description: "Public URL of the static site".to_string(),
        export_name: export_name(plan, SITE_URL_OUTPUT, stage),
    });
    graph.add_output(OutputSpec {
        key: AUTH_URL_OUTPUT.to_string(),
        value: ResourceRef::url(auth_route),
        description: "Invoke URL of the auth route".to_string(),
        export_name: export_name(plan, AUTH_URL_OUTPUT, stage),
    });

    Ok(bucket)
}

/// Builds the stage-qualified export name for an output key.
fn export_name(plan: &StackPlan, key: &str, stage: Stage) -> ExportName {
    ExportName::new(format!(
        "{project}-{key}-{stage}",
        project = plan.project,
        stage = stage.as_str()
    ))
}
