// crates/wit-stack-config/tests/config_artifacts.rs
// ============================================================================
// Module: Config Artifact Tests
// Description: Checks for the generated example, schema, and docs.
// Purpose: Keep the artifacts valid and in sync with the model.
// Dependencies: wit-stack-config, jsonschema, serde_json, toml
// ============================================================================

//! Tests for the generated configuration artifacts.

use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use wit_stack_config::StackConfig;
use wit_stack_config::config_docs_markdown;
use wit_stack_config::config_schema;
use wit_stack_config::config_toml_example;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Compiles the generated schema under draft 2020-12.
fn compiled_schema(schema: &Value) -> Result<Validator, Box<dyn std::error::Error>> {
    Ok(jsonschema::options().with_draft(Draft::Draft202012).build(schema)?)
}

#[test]
fn example_parses_and_validates() -> TestResult {
    let example = config_toml_example();
    let config: StackConfig = toml::from_str(&example)?;
    config.validate()?;
    if config.tables.len() != 6 {
        return Err(format!("example must list 6 tables, got {}", config.tables.len()).into());
    }
    Ok(())
}

#[test]
fn schema_accepts_the_default_and_example_configs() -> TestResult {
    let schema = config_schema();
    let validator = compiled_schema(&schema)?;

    let default_value = serde_json::to_value(StackConfig::default())?;
    if !validator.is_valid(&default_value) {
        return Err("schema must accept the default config".into());
    }

    let example: StackConfig = toml::from_str(&config_toml_example())?;
    let example_value = serde_json::to_value(example)?;
    if !validator.is_valid(&example_value) {
        return Err("schema must accept the example config".into());
    }
    Ok(())
}

#[test]
fn schema_rejects_unknown_sections_and_bad_methods() -> TestResult {
    let schema = config_schema();
    let validator = compiled_schema(&schema)?;

    let unknown_section = serde_json::json!({ "metrics": {} });
    if validator.is_valid(&unknown_section) {
        return Err("schema must reject unknown sections".into());
    }

    let bad_method = serde_json::json!({
        "routes": [{ "path": "/auth", "method": "PATCH" }]
    });
    if validator.is_valid(&bad_method) {
        return Err("schema must reject unknown http methods".into());
    }
    Ok(())
}

#[test]
fn docs_open_with_the_config_title() -> TestResult {
    let docs = config_docs_markdown()?;
    if !docs.starts_with("# wit-stack.toml Configuration\n") {
        return Err("docs must open with the configuration title".into());
    }
    for section in ["## [project]", "## tables", "## [[routes]]", "## [function]", "## [policy]", "## [site]", "## Example"] {
        if !docs.contains(section) {
            return Err(format!("docs are missing the {section} section").into());
        }
    }
    Ok(())
}
