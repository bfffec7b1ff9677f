// crates/wit-stack-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Tests
// Description: Loading, fallback, and validation checks for wit-stack.toml.
// Purpose: Ensure a missing file falls back to defaults and bad models fail.
// Dependencies: wit-stack-config, wit-stack-core, tempfile
// ============================================================================

//! Loading and validation tests for the configuration model.

use std::fs;

use wit_stack_config::ConfigError;
use wit_stack_config::StackConfig;
use wit_stack_core::core::HttpMethod;
use wit_stack_core::core::Stage;
use wit_stack_core::synth::StackSynthesizer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn missing_file_falls_back_to_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("absent.toml");
    let config = StackConfig::load(Some(&path))?;
    if config != StackConfig::default() {
        return Err("missing file must yield the default catalog".into());
    }
    if config.tables.len() != 6 {
        return Err(format!("expected 6 default tables, got {}", config.tables.len()).into());
    }
    Ok(())
}

#[test]
fn empty_file_is_the_default_catalog() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("wit-stack.toml");
    fs::write(&path, "")?;
    let config = StackConfig::load(Some(&path))?;
    if config != StackConfig::default() {
        return Err("an empty file must parse to the default catalog".into());
    }
    Ok(())
}

#[test]
fn overrides_survive_loading() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("wit-stack.toml");
    fs::write(
        &path,
        concat!(
            "tables = [\"widgets\", \"orders\"]\n\n",
            "[project]\n",
            "name = \"inventory\"\n",
            "account = \"111122223333\"\n",
            "region = \"eu-west-1\"\n\n",
            "[[routes]]\n",
            "path = \"/auth\"\n",
            "method = \"POST\"\n",
        ),
    )?;
    let config = StackConfig::load(Some(&path))?;
    if config.project.name != "inventory" {
        return Err(format!("unexpected project name: {}", config.project.name).into());
    }
    if config.tables != vec!["widgets".to_string(), "orders".to_string()] {
        return Err("table catalog override was dropped".into());
    }
    let plan = config.to_plan()?;
    if plan.routes[0].method != HttpMethod::Post {
        return Err("route method override was dropped".into());
    }
    // Unset sections keep their defaults.
    if !plan.policy.grant_stream_read || plan.function.runtime != "python3.6" {
        return Err("unset sections must keep their defaults".into());
    }
    Ok(())
}

#[test]
fn malformed_toml_is_a_parse_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("wit-stack.toml");
    fs::write(&path, "[project\nname = ")?;
    match StackConfig::load(Some(&path)) {
        Err(ConfigError::Parse { .. }) => Ok(()),
        Err(other) => Err(format!("expected a parse error, got: {other}").into()),
        Ok(_) => Err("expected a parse error, got a config".into()),
    }
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("wit-stack.toml");
    fs::write(&path, "[project]\nnmae = \"typo\"\n")?;
    match StackConfig::load(Some(&path)) {
        Err(ConfigError::Parse { .. }) => Ok(()),
        Err(other) => Err(format!("expected a parse error, got: {other}").into()),
        Ok(_) => Err("expected a parse error, got a config".into()),
    }
}

#[test]
fn validation_rejects_bad_models() -> TestResult {
    let mut config = StackConfig::default();
    config.project.name.clear();
    if config.validate() != Err(ConfigError::EmptyProjectName) {
        return Err("empty project name must be rejected".into());
    }

    let mut config = StackConfig::default();
    config.tables.clear();
    if config.validate() != Err(ConfigError::EmptyTableCatalog) {
        return Err("empty table catalog must be rejected".into());
    }

    let mut config = StackConfig::default();
    config.tables.push("tasks".to_string());
    if !matches!(config.validate(), Err(ConfigError::DuplicateTable { .. })) {
        return Err("duplicate logical names must be rejected".into());
    }

    let mut config = StackConfig::default();
    config.routes.clear();
    if config.validate() != Err(ConfigError::EmptyRouteCatalog) {
        return Err("empty route catalog must be rejected".into());
    }

    let mut config = StackConfig::default();
    config.routes[0].path = "auth".to_string();
    if !matches!(config.validate(), Err(ConfigError::BadRoutePath { .. })) {
        return Err("relative route paths must be rejected".into());
    }

    let mut config = StackConfig::default();
    config.routes[0].method = "PATCH".to_string();
    if !matches!(config.validate(), Err(ConfigError::UnknownMethod { .. })) {
        return Err("unknown methods must be rejected".into());
    }
    Ok(())
}

#[test]
fn default_config_synthesizes_the_project_wit_stack() -> TestResult {
    let plan = StackConfig::default().to_plan()?;
    let template = StackSynthesizer::new(plan).synthesize(Stage::Dev)?;
    let names = template.physical_names();
    if !names.contains("project-wit-tasks-dev") || !names.contains("project-wit-dev") {
        return Err("default config must produce the Project WIT dev names".into());
    }
    Ok(())
}
