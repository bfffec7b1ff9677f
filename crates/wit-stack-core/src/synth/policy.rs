// crates/wit-stack-core/src/synth/policy.rs
// ============================================================================
// Module: Access Policy Builder
// Description: Least-privilege statements scoped to stage-qualified patterns.
// Purpose: Build the CRUD, stream/index, self-assume, and invoke grants.
// Dependencies: crate::core::{graph, identifiers, policy, stage}, crate::synth::plan
// ============================================================================

//! ## Overview
//! The policy builder produces the identity's permission statements. All
//! statements are additive allow grants; wildcarding is at the logical-name
//! segment only, so a statement built for one stage can never match a
//! resource belonging to another. The self-assume statement carries a
//! forward reference to the role's own not-yet-materialized identifier, and
//! the invoke grant carries a forward reference to the route.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::graph::NodeHandle;
use crate::core::graph::ResourceRef;
use crate::core::identifiers::StatementSid;
use crate::core::policy::Effect;
use crate::core::policy::PolicyAction;
use crate::core::policy::PolicyError;
use crate::core::policy::PolicyStatement;
use crate::core::stage::Stage;
use crate::synth::plan::StackPlan;

// ============================================================================
// CONSTANTS: Permission verb sets
// ============================================================================

/// CRUD action verbs over catalog tables.
pub const CRUD_ACTIONS: [&str; 10] = [
    "dynamodb:BatchGetItem",
    "dynamodb:BatchWriteItem",
    "dynamodb:ConditionCheckItem",
    "dynamodb:PutItem",
    "dynamodb:DescribeTable",
    "dynamodb:DeleteItem",
    "dynamodb:GetItem",
    "dynamodb:Scan",
    "dynamodb:Query",
    "dynamodb:UpdateItem",
];

/// Stream and index read verbs.
pub const STREAM_INDEX_ACTIONS: [&str; 6] = [
    "dynamodb:GetShardIterator",
    "dynamodb:Scan",
    "dynamodb:Query",
    "dynamodb:DescribeStream",
    "dynamodb:GetRecords",
    "dynamodb:ListStreams",
];

/// Role self-assumption verb.
pub const ASSUME_ROLE_ACTION: &str = "sts:AssumeRole";

/// Route invocation verb.
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for the identity's stage-scoped permission statements.
///
/// # Invariants
/// - Patterns embed exactly one stage token; stage is never wildcarded.
#[derive(Debug, Clone)]
pub struct AccessPolicyBuilder<'a> {
    /// Synthesis inputs.
    plan: &'a StackPlan,
    /// Stage the statements are scoped to.
    stage: Stage,
}

impl<'a> AccessPolicyBuilder<'a> {
    /// Creates a builder for one stage.
    #[must_use]
    pub const fn new(plan: &'a StackPlan, stage: Stage) -> Self {
        Self {
            plan,
            stage,
        }
    }

    /// Returns the stage-qualified table pattern base.
    ///
    /// The logical-name segment is the only wildcard; project and stage are
    /// literal.
    #[must_use]
    pub fn table_pattern_base(&self) -> String {
        format!(
            "arn:aws:dynamodb:{region}:{account}:table/{project}-*-{stage}",
            region = self.plan.region,
            account = self.plan.account,
            project = self.plan.project,
            stage = self.stage
        )
    }

    /// Builds the CRUD statement over catalog tables.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when the statement is malformed.
    pub fn crud_statement(&self) -> Result<PolicyStatement, PolicyError> {
        PolicyStatement::new(
            "allowDynamoCrudOperations".into(),
            Effect::Allow,
            CRUD_ACTIONS.iter().map(|action| PolicyAction::new(*action)).collect(),
            vec![ResourceRef::literal(self.table_pattern_base())],
        )
    }

    /// Builds the stream/index read statement.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when the statement is malformed.
    pub fn stream_index_statement(&self) -> Result<PolicyStatement, PolicyError> {
        let base = self.table_pattern_base();
        PolicyStatement::new(
            "allowDynamoStreamAndIndexInformation".into(),
            Effect::Allow,
            STREAM_INDEX_ACTIONS
                .iter()
                .map(|action| PolicyAction::new(*action))
                .collect(),
            vec![
                ResourceRef::literal(format!("{base}/index/*")),
                ResourceRef::literal(format!("{base}/stream/*")),
            ],
        )
    }

    /// Builds the self-assume statement referencing the role itself.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when the statement is malformed.
    pub fn self_assume_statement(&self, role: NodeHandle) -> Result<PolicyStatement, PolicyError> {
        PolicyStatement::new(
            "dynamoAuthRoleAssumeSelf".into(),
            Effect::Allow,
            vec![PolicyAction::new(ASSUME_ROLE_ACTION)],
            vec![ResourceRef::arn(role)],
        )
    }

    /// Builds the route-specific invoke grant.
    ///
    /// This statement cannot be constructed before the route is declared;
    /// its resource is the route's generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when the statement is malformed.
    pub fn invoke_statement(
        &self,
        sid: impl Into<String>,
        route: NodeHandle,
    ) -> Result<PolicyStatement, PolicyError> {
        PolicyStatement::new(
            StatementSid::new(sid),
            Effect::Allow,
            vec![PolicyAction::new(INVOKE_ACTION)],
            vec![ResourceRef::arn(route)],
        )
    }

    /// Builds the base statements attached before the route exists.
    ///
    /// The stream/index statement is included only when the plan's
    /// `grant_stream_read` option is set.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when any statement is malformed.
    pub fn base_statements(&self, role: NodeHandle) -> Result<Vec<PolicyStatement>, PolicyError> {
        let mut statements = vec![self.crud_statement()?];
        if self.plan.policy.grant_stream_read {
            statements.push(self.stream_index_statement()?);
        }
        statements.push(self.self_assume_statement(role)?);
        Ok(statements)
    }
}
