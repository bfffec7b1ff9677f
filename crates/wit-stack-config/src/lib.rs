// crates/wit-stack-config/src/lib.rs
// ============================================================================
// Module: wit-stack Configuration
// Description: Canonical wit-stack.toml model, validation, and artifacts.
// Purpose: Supply the catalogs and parameters synthesis fans out over.
// Dependencies: serde, serde_json, thiserror, toml, wit-stack-core
// ============================================================================

//! ## Overview
//! The configuration file carries everything that used to be hardcoded in
//! the stack definition: the project prefix, the account and region
//! parameters, the table logical-name catalog, the route catalog, and the
//! function/policy/site options. A missing file falls back to the Project
//! WIT defaults; a malformed file or an invalid model fails closed.
//!
//! ## Index
//! - Model: [`StackConfig`] and its sections
//! - Loading: [`StackConfig::load`], [`DEFAULT_CONFIG_PATH`], [`CONFIG_PATH_ENV`]
//! - Conversion: [`StackConfig::to_plan`]
//! - Artifacts: [`config_toml_example`], [`config_schema`], [`config_docs_markdown`]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use wit_stack_core::core::HttpMethod;
use wit_stack_core::core::LogicalName;
use wit_stack_core::synth::FunctionPlan;
use wit_stack_core::synth::PolicyOptions;
use wit_stack_core::synth::RoutePlan;
use wit_stack_core::synth::SitePlan;
use wit_stack_core::synth::StackPlan;

// ============================================================================
// CONSTANTS: Config file resolution
// ============================================================================

/// Default configuration file path relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "wit-stack.toml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "WIT_STACK_CONFIG";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or validating configuration.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("config read error at {path}: {message}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Parsing the config file failed.
    #[error("config parse error at {path}: {message}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// The project name was empty.
    #[error("project name is empty")]
    EmptyProjectName,
    /// The account parameter was empty.
    #[error("account is empty")]
    EmptyAccount,
    /// The region parameter was empty.
    #[error("region is empty")]
    EmptyRegion,
    /// The table catalog was empty.
    #[error("table catalog is empty")]
    EmptyTableCatalog,
    /// The table catalog repeated a logical name.
    #[error("duplicate table logical name: {name}")]
    DuplicateTable {
        /// Repeated logical name.
        name: String,
    },
    /// The route catalog was empty.
    #[error("route catalog is empty")]
    EmptyRouteCatalog,
    /// A route path did not start with `/`.
    #[error("route path must start with '/': {path}")]
    BadRoutePath {
        /// Rejected path.
        path: String,
    },
    /// A route used an unknown HTTP method.
    #[error("unknown http method: {method}")]
    UnknownMethod {
        /// Rejected method token.
        method: String,
    },
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// Project-level parameters.
///
/// # Invariants
/// - All fields are non-empty after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProjectConfig {
    /// Project prefix for physical names.
    pub name: String,
    /// Provider account identifier.
    pub account: String,
    /// Provider region identifier.
    pub region: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "project-wit".to_string(),
            account: "000000000000".to_string(),
            region: "us-east-1".to_string(),
        }
    }
}

/// Route catalog entry.
///
/// # Invariants
/// - `path` starts with `/`; `method` is a known HTTP verb after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Route path segment.
    pub path: String,
    /// HTTP verb token (`GET`, `POST`, `PUT`, `DELETE`).
    pub method: String,
}

/// Deployable-unit parameters.
///
/// # Invariants
/// - Fields are opaque to validation; the handler is an external artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FunctionConfig {
    /// Function base name, stage-qualified at synthesis.
    pub base_name: String,
    /// Packaged-code asset location.
    pub code_asset: String,
    /// Entry-point symbol within the packaged code.
    pub handler: String,
    /// Runtime identifier for the function host.
    pub runtime: String,
    /// Role base name, stage-qualified at synthesis.
    pub role_base_name: String,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        let plan = FunctionPlan::project_wit_default();
        Self {
            base_name: plan.base_name,
            code_asset: plan.code_asset,
            handler: plan.handler,
            runtime: plan.runtime,
            role_base_name: plan.role_base_name,
        }
    }
}

/// Policy options.
///
/// # Invariants
/// - Mirrors [`PolicyOptions`] one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PolicyConfig {
    /// Emit the stream/index read statement even though no table enables a
    /// change stream today.
    pub grant_stream_read: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            grant_stream_read: true,
        }
    }
}

/// Static-site options.
///
/// # Invariants
/// - Mirrors [`SitePlan`] one-to-one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SiteConfig {
    /// Index document object key.
    pub index_document: String,
    /// Error document object key.
    pub error_document: String,
    /// Retain bucket contents when the prod stage is torn down.
    pub retain_on_prod: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let plan = SitePlan::default();
        Self {
            index_document: plan.index_document,
            error_document: plan.error_document,
            retain_on_prod: plan.retain_on_prod,
        }
    }
}

/// Canonical wit-stack configuration model.
///
/// # Invariants
/// - `Default` matches the Project WIT catalog exactly.
/// - Validation is enforced by [`StackConfig::load`]; hand-built values must
///   call [`StackConfig::validate`] before conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct StackConfig {
    /// Project-level parameters.
    pub project: ProjectConfig,
    /// Table logical-name catalog.
    pub tables: Vec<String>,
    /// Route catalog; the first entry is the primary auth route.
    pub routes: Vec<RouteConfig>,
    /// Deployable-unit parameters.
    pub function: FunctionConfig,
    /// Policy options.
    pub policy: PolicyConfig,
    /// Static-site options.
    pub site: SiteConfig,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            tables: wit_stack_core::synth::DEFAULT_TABLES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            routes: vec![RouteConfig {
                path: "/auth".to_string(),
                method: "GET".to_string(),
            }],
            function: FunctionConfig::default(),
            policy: PolicyConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

// ============================================================================
// SECTION: Loading and Validation
// ============================================================================

impl StackConfig {
    /// Resolves the config path from an explicit override, the environment,
    /// or the default location.
    #[must_use]
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    /// Loads and validates configuration.
    ///
    /// A missing file falls back to the Project WIT defaults; any other read
    /// failure, a parse failure, or an invalid model is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = Self::resolve_path(explicit);
        let config = match fs::read_to_string(&path) {
            Ok(contents) => {
                toml::from_str::<Self>(&contents).map_err(|err| ConfigError::Parse {
                    path: path.display().to_string(),
                    message: err.to_string(),
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    message: err.to_string(),
                });
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for empty parameters, empty or duplicated
    /// catalogs, bad route paths, or unknown HTTP methods.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.name.is_empty() {
            return Err(ConfigError::EmptyProjectName);
        }
        if self.project.account.is_empty() {
            return Err(ConfigError::EmptyAccount);
        }
        if self.project.region.is_empty() {
            return Err(ConfigError::EmptyRegion);
        }
        if self.tables.is_empty() {
            return Err(ConfigError::EmptyTableCatalog);
        }
        let mut seen = BTreeSet::new();
        for name in &self.tables {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateTable {
                    name: name.clone(),
                });
            }
        }
        if self.routes.is_empty() {
            return Err(ConfigError::EmptyRouteCatalog);
        }
        for route in &self.routes {
            if !route.path.starts_with('/') {
                return Err(ConfigError::BadRoutePath {
                    path: route.path.clone(),
                });
            }
            parse_method(&route.method)?;
        }
        Ok(())
    }

    /// Converts the validated model into a synthesis plan.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownMethod`] when a route method token is
    /// unknown (validation catches this first on loaded configs).
    pub fn to_plan(&self) -> Result<StackPlan, ConfigError> {
        let routes = self
            .routes
            .iter()
            .map(|route| {
                Ok(RoutePlan {
                    path: route.path.clone(),
                    method: parse_method(&route.method)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(StackPlan {
            project: self.project.name.as_str().into(),
            account: self.project.account.as_str().into(),
            region: self.project.region.as_str().into(),
            tables: self.tables.iter().map(|name| LogicalName::new(name.as_str())).collect(),
            routes,
            function: FunctionPlan {
                base_name: self.function.base_name.clone(),
                code_asset: self.function.code_asset.clone(),
                handler: self.function.handler.clone(),
                runtime: self.function.runtime.clone(),
                role_base_name: self.function.role_base_name.clone(),
            },
            policy: PolicyOptions {
                grant_stream_read: self.policy.grant_stream_read,
            },
            site: SitePlan {
                index_document: self.site.index_document.clone(),
                error_document: self.site.error_document.clone(),
                retain_on_prod: self.site.retain_on_prod,
            },
        })
    }
}

/// Parses an HTTP method token.
fn parse_method(token: &str) -> Result<HttpMethod, ConfigError> {
    match token {
        "GET" => Ok(HttpMethod::Get),
        "POST" => Ok(HttpMethod::Post),
        "PUT" => Ok(HttpMethod::Put),
        "DELETE" => Ok(HttpMethod::Delete),
        other => Err(ConfigError::UnknownMethod {
            method: other.to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Generated Artifacts
// ============================================================================

/// Returns a commented example `wit-stack.toml`.
#[must_use]
pub fn config_toml_example() -> String {
    let mut example = String::new();
    example.push_str("# wit-stack.toml: stack synthesis configuration\n\n");
    example.push_str("# Table logical-name catalog; one table per entry per stage.\n");
    example.push_str("tables = [\"tasks\", \"tags\", \"sprints\", \"comments\", \"users\", \"lanes\"]\n\n");
    example.push_str("[project]\n");
    example.push_str("name = \"project-wit\"\n");
    example.push_str("account = \"326480716745\"\n");
    example.push_str("region = \"us-east-1\"\n\n");
    example.push_str("[[routes]]\n");
    example.push_str("path = \"/auth\"\n");
    example.push_str("method = \"GET\"\n\n");
    example.push_str("[function]\n");
    example.push_str("base_name = \"credential-retriever\"\n");
    example.push_str("code_asset = \"lambda\"\n");
    example.push_str("handler = \"credential-retriever.main\"\n");
    example.push_str("runtime = \"python3.6\"\n");
    example.push_str("role_base_name = \"dynamo-auth-role\"\n\n");
    example.push_str("[policy]\n");
    example.push_str("# Stream/index read grant; dormant until a table enables a stream.\n");
    example.push_str("grant_stream_read = true\n\n");
    example.push_str("[site]\n");
    example.push_str("index_document = \"index.html\"\n");
    example.push_str("error_document = \"error.html\"\n");
    example.push_str("retain_on_prod = true\n");
    example
}

/// Returns the JSON schema for `wit-stack.toml`.
#[must_use]
pub fn config_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "wit-stack.toml",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "project": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "name": { "type": "string" },
                    "account": { "type": "string" },
                    "region": { "type": "string" }
                }
            },
            "tables": {
                "type": "array",
                "items": { "type": "string" }
            },
            "routes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["path", "method"],
                    "properties": {
                        "path": { "type": "string" },
                        "method": { "type": "string", "enum": ["GET", "POST", "PUT", "DELETE"] }
                    }
                }
            },
            "function": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "base_name": { "type": "string" },
                    "code_asset": { "type": "string" },
                    "handler": { "type": "string" },
                    "runtime": { "type": "string" },
                    "role_base_name": { "type": "string" }
                }
            },
            "policy": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "grant_stream_read": { "type": "boolean" }
                }
            },
            "site": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "index_document": { "type": "string" },
                    "error_document": { "type": "string" },
                    "retain_on_prod": { "type": "boolean" }
                }
            }
        }
    })
}

/// Renders Markdown documentation for the configuration file.
///
/// # Errors
///
/// Returns [`ConfigError`] when the example cannot be round-tripped (a
/// drift guard between the example and the model).
pub fn config_docs_markdown() -> Result<String, ConfigError> {
    let example = config_toml_example();
    let parsed = toml::from_str::<StackConfig>(&example).map_err(|err| ConfigError::Parse {
        path: "<example>".to_string(),
        message: err.to_string(),
    })?;
    parsed.validate()?;

    let mut docs = String::new();
    docs.push_str("# wit-stack.toml Configuration\n\n");
    docs.push_str(
        "All sections are optional; omitted sections fall back to the Project WIT defaults.\n\n",
    );
    docs.push_str("## [project]\n\n");
    docs.push_str("Project prefix plus the account and region parameters threaded through\n");
    docs.push_str("every generated identifier.\n\n");
    docs.push_str("## tables\n\n");
    docs.push_str("Table logical-name catalog. Synthesis fans out one uniformly-shaped table\n");
    docs.push_str("per entry per stage, named `<project>-<logical>-<stage>`.\n\n");
    docs.push_str("## [[routes]]\n\n");
    docs.push_str("Route catalog. The first entry is the primary auth route exported through\n");
    docs.push_str("the `webSiteAuthUrl` output.\n\n");
    docs.push_str("## [function]\n\n");
    docs.push_str("Deployable-unit parameters. The handler is an opaque external artifact.\n\n");
    docs.push_str("## [policy]\n\n");
    docs.push_str("Optional grants. `grant_stream_read` keeps the stream/index read statement\n");
    docs.push_str("that no declared table consumes yet.\n\n");
    docs.push_str("## [site]\n\n");
    docs.push_str("Static-site documents and the prod retention override.\n\n");
    docs.push_str("## Example\n\n```toml\n");
    docs.push_str(&example);
    docs.push_str("```\n");
    Ok(docs)
}
