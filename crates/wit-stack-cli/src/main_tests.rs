// crates/wit-stack-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for the synthesis and config command helpers.
// Purpose: Ensure command helpers load configs, render templates, and fail
//          closed on bad inputs.
// Dependencies: wit-stack-cli main helpers, tempfile
// ============================================================================

//! ## Overview
//! Validates the command helpers behind the CLI dispatcher: synthesizer
//! loading, template rendering, and the synth/hash command flows.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use wit_stack_core::core::Stage;

use super::StageArg;
use super::SynthAllCommand;
use super::SynthCommand;
use super::command_synth;
use super::command_synth_all;
use super::load_synthesizer;
use super::render_template;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn load_synthesizer_uses_defaults_for_missing_config() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let absent = dir.path().join("absent.toml");
    let synthesizer = load_synthesizer(Some(&absent)).expect("load default synthesizer");
    assert_eq!(synthesizer.plan().tables.len(), 6);
}

#[test]
fn load_synthesizer_rejects_malformed_config() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let path = dir.path().join("wit-stack.toml");
    fs::write(&path, "tables = 7").expect("write malformed config");
    let err = load_synthesizer(Some(&path)).expect_err("expected a config failure");
    assert!(err.to_string().contains("failed to load config"));
}

#[test]
fn render_template_is_canonical_json() {
    let synthesizer = load_synthesizer(Some(std::path::Path::new("/nonexistent/wit-stack.toml")))
        .expect("load default synthesizer");
    let template = synthesizer.synthesize(Stage::Dev).expect("synthesize dev");
    let bytes = render_template(&template).expect("render template");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("valid JSON");
    assert_eq!(value.get("stage"), Some(&serde_json::json!("dev")));
}

#[test]
fn command_synth_writes_the_requested_stage() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let output = dir.path().join("dev.json");
    let command = SynthCommand {
        stage: StageArg::Dev,
        config: Some(dir.path().join("absent.toml")),
        output: Some(output.clone()),
    };
    command_synth(&command).expect("synth succeeds");

    let contents = fs::read_to_string(&output).expect("read template");
    assert!(contents.contains("dynamo-auth-role-dev"));
    assert!(!contents.contains("-prod"));
}

#[test]
fn command_synth_all_writes_one_file_per_stage() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let output_dir = dir.path().join("out");
    let command = SynthAllCommand {
        config: Some(dir.path().join("absent.toml")),
        output_dir: output_dir.clone(),
    };
    command_synth_all(&command).expect("synth-all succeeds");

    for stage in Stage::ALL {
        let path = output_dir.join(format!("{stage}.json"));
        assert!(path.is_file(), "missing template for stage {stage}");
    }
}
