// crates/wit-stack-core/tests/policy_scoping.rs
// ============================================================================
// Module: Policy Scoping Tests
// Description: Validate stage-scoped patterns and statement invariants.
// Purpose: Ensure grants for one stage can never match another stage.
// Dependencies: wit-stack-core
// ============================================================================

//! Stage-scoping tests for the access policy builder.

use wit_stack_core::core::ArnPattern;
use wit_stack_core::core::Effect;
use wit_stack_core::core::PolicyError;
use wit_stack_core::core::PolicyStatement;
use wit_stack_core::core::ResourceRef;
use wit_stack_core::core::Stage;
use wit_stack_core::synth::AccessPolicyBuilder;
use wit_stack_core::synth::StackPlan;

type TestResult = Result<(), String>;

/// Returns the default Project WIT plan used across these tests.
fn plan() -> StackPlan {
    StackPlan::project_wit("326480716745".into(), "us-east-1".into())
}

#[test]
fn table_pattern_embeds_exactly_the_given_stage() -> TestResult {
    let plan = plan();
    for stage in Stage::ALL {
        let builder = AccessPolicyBuilder::new(&plan, stage);
        let base = builder.table_pattern_base();
        if !base.ends_with(&format!("-{stage}")) {
            return Err(format!("pattern {base} does not end with stage {stage}"));
        }
        for other in Stage::ALL {
            if other != stage && base.contains(other.as_str()) {
                return Err(format!("pattern {base} leaks stage {other}"));
            }
        }
    }
    Ok(())
}

#[test]
fn dev_pattern_never_matches_prod_table() -> TestResult {
    let plan = plan();
    let builder = AccessPolicyBuilder::new(&plan, Stage::Dev);
    let pattern = ArnPattern::new(builder.table_pattern_base());

    let dev_table = "arn:aws:dynamodb:us-east-1:326480716745:table/project-wit-tasks-dev";
    let prod_table = "arn:aws:dynamodb:us-east-1:326480716745:table/project-wit-tasks-prod";
    if !pattern.matches(dev_table) {
        return Err(format!("pattern {pattern} should match {dev_table}"));
    }
    if pattern.matches(prod_table) {
        return Err(format!("pattern {pattern} must not match {prod_table}"));
    }
    Ok(())
}

#[test]
fn crud_statement_covers_the_full_verb_set() -> TestResult {
    let plan = plan();
    let builder = AccessPolicyBuilder::new(&plan, Stage::Beta);
    let statement = builder.crud_statement().map_err(|err| err.to_string())?;
    if statement.effect != Effect::Allow {
        return Err("crud statement must allow".to_string());
    }
    if statement.actions.len() != 10 {
        return Err(format!("expected 10 crud actions, got {}", statement.actions.len()));
    }
    if statement.resources.len() != 1 {
        return Err(format!(
            "expected a single table pattern, got {}",
            statement.resources.len()
        ));
    }
    Ok(())
}

#[test]
fn stream_statement_scopes_index_and_stream_globs() -> TestResult {
    let plan = plan();
    let builder = AccessPolicyBuilder::new(&plan, Stage::Dev);
    let statement = builder.stream_index_statement().map_err(|err| err.to_string())?;
    if statement.resources.len() != 2 {
        return Err(format!(
            "expected index and stream patterns, got {}",
            statement.resources.len()
        ));
    }
    for resource in &statement.resources {
        let ResourceRef::Literal {
            value,
        } = resource
        else {
            return Err("stream patterns must be literal".to_string());
        };
        if !value.contains("-dev/") {
            return Err(format!("pattern {value} is not stage-scoped before the suffix"));
        }
        if !(value.ends_with("/index/*") || value.ends_with("/stream/*")) {
            return Err(format!("unexpected pattern suffix: {value}"));
        }
    }
    Ok(())
}

#[test]
fn statements_reject_empty_action_and_resource_lists() -> TestResult {
    let empty_actions = PolicyStatement::new(
        "empty-actions".into(),
        Effect::Allow,
        Vec::new(),
        vec![ResourceRef::literal("arn:aws:s3:::anything")],
    );
    if !matches!(empty_actions, Err(PolicyError::EmptyActions { .. })) {
        return Err("empty action list must be rejected".to_string());
    }

    let empty_resources = PolicyStatement::new(
        "empty-resources".into(),
        Effect::Allow,
        vec!["s3:GetObject".into()],
        Vec::new(),
    );
    if !matches!(empty_resources, Err(PolicyError::EmptyResources { .. })) {
        return Err("empty resource list must be rejected".to_string());
    }
    Ok(())
}

#[test]
fn glob_matching_handles_wildcard_edges() -> TestResult {
    let cases: [(&str, &str, bool); 6] = [
        ("table/wit-*-dev", "table/wit-tasks-dev", true),
        ("table/wit-*-dev", "table/wit--dev", true),
        ("table/wit-*-dev", "table/wit-tasks-prod", false),
        ("*", "anything at all", true),
        ("", "", true),
        ("", "x", false),
    ];
    for (pattern, candidate, expected) in cases {
        let got = ArnPattern::new(pattern).matches(candidate);
        if got != expected {
            return Err(format!(
                "pattern {pattern} against {candidate}: expected {expected}, got {got}"
            ));
        }
    }
    Ok(())
}
