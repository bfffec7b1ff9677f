// crates/wit-stack-core/tests/determinism.rs
// ============================================================================
// Module: Determinism Property Tests
// Description: Property tests for synthesis determinism and stage isolation.
// Purpose: Detect nondeterminism and cross-stage name collisions across
//          arbitrary catalogs.
// ============================================================================

//! Property-based tests for synthesis invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeSet;
use std::str::FromStr;

use proptest::prelude::*;
use wit_stack_core::core::LogicalName;
use wit_stack_core::core::Stage;
use wit_stack_core::core::StageError;
use wit_stack_core::synth::StackPlan;
use wit_stack_core::synth::StackSynthesizer;

/// Strategy for catalogs of unique lowercase logical names.
fn catalog_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,8}", 1 .. 8)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
}

/// Builds a plan over an arbitrary table catalog.
fn plan_for(catalog: &[String]) -> StackPlan {
    let mut plan = StackPlan::project_wit("000000000000".into(), "us-east-1".into());
    plan.tables = catalog.iter().map(|name| LogicalName::new(name.as_str())).collect();
    plan
}

proptest! {
    #[test]
    fn synthesis_is_deterministic(catalog in catalog_strategy()) {
        let synthesizer = StackSynthesizer::new(plan_for(&catalog));
        for stage in Stage::ALL {
            let first = synthesizer.synthesize(stage).expect("synthesize");
            let second = synthesizer.synthesize(stage).expect("synthesize");
            prop_assert_eq!(
                first.canonical_bytes().expect("canonical bytes"),
                second.canonical_bytes().expect("canonical bytes")
            );
            prop_assert_eq!(first.digest().expect("digest"), second.digest().expect("digest"));
        }
    }

    #[test]
    fn stage_name_sets_never_collide(catalog in catalog_strategy()) {
        let synthesizer = StackSynthesizer::new(plan_for(&catalog));
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for stage in Stage::ALL {
            let names = synthesizer.synthesize(stage).expect("synthesize").physical_names();
            for name in names {
                prop_assert!(seen.insert(name), "physical name reused across stages");
            }
        }
    }

    #[test]
    fn every_pattern_embeds_exactly_one_stage(catalog in catalog_strategy()) {
        let plan = plan_for(&catalog);
        for stage in Stage::ALL {
            let builder = wit_stack_core::synth::AccessPolicyBuilder::new(&plan, stage);
            let base = builder.table_pattern_base();
            let suffix = format!("-{stage}");
            prop_assert!(base.ends_with(&suffix));
            for other in Stage::ALL {
                if other != stage {
                    prop_assert!(!base.contains(other.as_str()));
                }
            }
        }
    }

    #[test]
    fn unknown_stage_tokens_fail_fast(token in "[a-z]{0,10}") {
        match Stage::from_str(&token) {
            Ok(stage) => prop_assert_eq!(stage.as_str(), token),
            Err(StageError::Empty) => prop_assert!(token.is_empty()),
            Err(StageError::Unknown { token: rejected }) => {
                prop_assert_eq!(rejected, token);
            }
        }
    }
}
