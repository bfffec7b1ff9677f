// crates/wit-stack-core/tests/stack_synthesis.rs
// ============================================================================
// Module: Stack Synthesis Tests
// Description: End-to-end template checks for the assembly root.
// Purpose: Validate the dev scenario, the invoke-grant round trip, and
//          stage-conditional site policy.
// Dependencies: wit-stack-core, serde_json
// ============================================================================

//! End-to-end synthesis tests for the Project WIT stack.

use std::collections::BTreeSet;

use wit_stack_core::core::NamingContext;
use wit_stack_core::core::RemovalPolicy;
use wit_stack_core::core::ResourceGraph;
use wit_stack_core::core::Stage;
use wit_stack_core::core::Template;
use wit_stack_core::core::TemplateResource;
use wit_stack_core::synth::AUTH_URL_OUTPUT;
use wit_stack_core::synth::INVOKE_ACTION;
use wit_stack_core::synth::ROLE_LOGICAL_ID;
use wit_stack_core::synth::SITE_URL_OUTPUT;
use wit_stack_core::synth::StackPlan;
use wit_stack_core::synth::StackSynthesizer;
use wit_stack_core::synth::SynthError;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Returns the default Project WIT synthesizer used across these tests.
fn synthesizer() -> StackSynthesizer {
    StackSynthesizer::new(StackPlan::project_wit("326480716745".into(), "us-east-1".into()))
}

#[test]
fn dev_scenario_produces_the_expected_topology() -> TestResult {
    let template = synthesizer().synthesize(Stage::Dev)?;

    let role = template
        .resources
        .get(ROLE_LOGICAL_ID)
        .ok_or("missing role resource")?;
    let TemplateResource::IamRole {
        role_name,
        trust_principal,
        statements,
    } = role
    else {
        return Err("role logical id is not a role".into());
    };
    if role_name != "dynamo-auth-role-dev" {
        return Err(format!("unexpected role name: {role_name}").into());
    }
    if trust_principal != "lambda.amazonaws.com" {
        return Err(format!("unexpected trust principal: {trust_principal}").into());
    }
    // crud + stream + self-assume + invoke grant.
    if statements.len() != 4 {
        return Err(format!("expected 4 statements, got {}", statements.len()).into());
    }

    let names = template.physical_names();
    let expected_tables: BTreeSet<String> = ["tasks", "tags", "sprints", "comments", "users", "lanes"]
        .iter()
        .map(|logical| format!("project-wit-{logical}-dev"))
        .collect();
    if !expected_tables.is_subset(&names) {
        return Err("missing stage-qualified table names".into());
    }
    if !names.contains("project-wit-dev") {
        return Err("missing bucket name project-wit-dev".into());
    }

    let route = template
        .resources
        .get("route-get-auth")
        .ok_or("missing auth route")?;
    let TemplateResource::ApiRoute {
        method,
        path,
        invoke_url,
        ..
    } = route
    else {
        return Err("route logical id is not a route".into());
    };
    if method.as_str() != "GET" || path != "/auth" {
        return Err(format!("unexpected route: {method} {path}").into());
    }
    if !invoke_url.ends_with("/dev/auth") {
        return Err(format!("auth URL must embed the actual stage: {invoke_url}").into());
    }

    if !template.outputs.contains_key(SITE_URL_OUTPUT) {
        return Err("missing webSiteStaticUrl output".into());
    }
    let auth_output = template.outputs.get(AUTH_URL_OUTPUT).ok_or("missing webSiteAuthUrl")?;
    if auth_output.value != *invoke_url {
        return Err("webSiteAuthUrl must equal the route invoke URL".into());
    }
    Ok(())
}

#[test]
fn fan_out_builds_six_uniform_tables() -> TestResult {
    let template = synthesizer().synthesize(Stage::Beta)?;
    let mut count = 0;
    for resource in template.resources.values() {
        if let TemplateResource::DynamoDbTable {
            partition_key, ..
        } = resource
        {
            count += 1;
            if partition_key.name != "id" {
                return Err(format!("unexpected partition key: {}", partition_key.name).into());
            }
        }
    }
    if count != 6 {
        return Err(format!("expected 6 tables, got {count}").into());
    }
    Ok(())
}

#[test]
fn invoke_grant_round_trips_to_the_route_identifier() -> TestResult {
    let template = synthesizer().synthesize(Stage::Prod)?;

    let route = template.resources.get("route-get-auth").ok_or("missing auth route")?;
    let TemplateResource::ApiRoute {
        method_arn, ..
    } = route
    else {
        return Err("route logical id is not a route".into());
    };

    let role = template.resources.get(ROLE_LOGICAL_ID).ok_or("missing role")?;
    let TemplateResource::IamRole {
        statements, ..
    } = role
    else {
        return Err("role logical id is not a role".into());
    };
    let grant = statements
        .iter()
        .find(|statement| statement.actions.iter().any(|action| action == INVOKE_ACTION))
        .ok_or("missing invoke grant")?;
    if grant.resources != vec![method_arn.clone()] {
        return Err("invoke grant must reference exactly the route identifier".into());
    }
    Ok(())
}

#[test]
fn removal_policy_is_stage_conditional() -> TestResult {
    let synthesizer = synthesizer();
    for (stage, expected) in [
        (Stage::Dev, RemovalPolicy::Destroy),
        (Stage::Beta, RemovalPolicy::Destroy),
        (Stage::Prod, RemovalPolicy::Retain),
    ] {
        let template = synthesizer.synthesize(stage)?;
        let bucket = template.resources.get("static-site").ok_or("missing bucket")?;
        let TemplateResource::S3Bucket {
            removal_policy, ..
        } = bucket
        else {
            return Err("bucket logical id is not a bucket".into());
        };
        if *removal_policy != expected {
            return Err(format!("stage {stage} has the wrong removal policy").into());
        }
    }

    let mut plan = StackPlan::project_wit("326480716745".into(), "us-east-1".into());
    plan.site.retain_on_prod = false;
    let template = StackSynthesizer::new(plan).synthesize(Stage::Prod)?;
    let bucket = template.resources.get("static-site").ok_or("missing bucket")?;
    let TemplateResource::S3Bucket {
        removal_policy, ..
    } = bucket
    else {
        return Err("bucket logical id is not a bucket".into());
    };
    if *removal_policy != RemovalPolicy::Destroy {
        return Err("retain_on_prod = false must destroy on teardown".into());
    }
    Ok(())
}

#[test]
fn stream_grant_can_be_disabled() -> TestResult {
    let mut plan = StackPlan::project_wit("326480716745".into(), "us-east-1".into());
    plan.policy.grant_stream_read = false;
    let template = StackSynthesizer::new(plan).synthesize(Stage::Dev)?;
    let role = template.resources.get(ROLE_LOGICAL_ID).ok_or("missing role")?;
    let TemplateResource::IamRole {
        statements, ..
    } = role
    else {
        return Err("role logical id is not a role".into());
    };
    // crud + self-assume + invoke grant.
    if statements.len() != 3 {
        return Err(format!("expected 3 statements, got {}", statements.len()).into());
    }
    let has_stream_verbs = statements
        .iter()
        .any(|statement| statement.actions.iter().any(|action| action == "dynamodb:DescribeStream"));
    if has_stream_verbs {
        return Err("stream verbs must be absent when the grant is disabled".into());
    }
    Ok(())
}

#[test]
fn stage_name_sets_are_disjoint() -> TestResult {
    let synthesizer = synthesizer();
    let dev = synthesizer.synthesize(Stage::Dev)?.physical_names();
    let beta = synthesizer.synthesize(Stage::Beta)?.physical_names();
    let prod = synthesizer.synthesize(Stage::Prod)?.physical_names();
    if dev.intersection(&beta).next().is_some()
        || dev.intersection(&prod).next().is_some()
        || beta.intersection(&prod).next().is_some()
    {
        return Err("stage name sets must be disjoint".into());
    }
    Ok(())
}

#[test]
fn empty_graph_emits_an_empty_resource_set() -> TestResult {
    let graph = ResourceGraph::new(NamingContext {
        account: "326480716745".into(),
        region: "us-east-1".into(),
        stage: Stage::Dev,
    });
    let template = Template::from_graph(&graph)?;
    if !template.resources.is_empty() || !template.outputs.is_empty() {
        return Err("empty graph must emit an empty template".into());
    }

    let value = serde_json::to_value(&template).map_err(|err| err.to_string())?;
    if value.get("resources") != Some(&serde_json::json!({})) {
        return Err("serialized resources must be an empty object".into());
    }
    Ok(())
}

#[test]
fn empty_catalogs_fail_fast() -> TestResult {
    let mut plan = StackPlan::project_wit("326480716745".into(), "us-east-1".into());
    plan.tables.clear();
    if StackSynthesizer::new(plan).synthesize(Stage::Dev) != Err(SynthError::EmptyTableCatalog) {
        return Err("empty table catalog must be rejected".into());
    }

    let mut plan = StackPlan::project_wit("326480716745".into(), "us-east-1".into());
    plan.routes.clear();
    if StackSynthesizer::new(plan).synthesize(Stage::Dev) != Err(SynthError::EmptyRouteCatalog) {
        return Err("empty route catalog must be rejected".into());
    }
    Ok(())
}
