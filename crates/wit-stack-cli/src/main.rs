// crates/wit-stack-cli/src/main.rs
// ============================================================================
// Module: wit-stack CLI Entry Point
// Description: Command dispatcher for stack synthesis and config workflows.
// Purpose: Synthesize stage templates, hash them, and manage configuration.
// Dependencies: clap, serde_json, thiserror, wit-stack-config, wit-stack-core
// ============================================================================

//! ## Overview
//! The wit-stack CLI turns a `wit-stack.toml` catalog into resolved stage
//! templates. Synthesis is offline and deterministic; the same config and
//! stage always produce byte-identical canonical JSON, so the `hash` command
//! doubles as a drift check against previously emitted templates.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;
use wit_stack_config::StackConfig;
use wit_stack_config::config_docs_markdown;
use wit_stack_config::config_schema;
use wit_stack_config::config_toml_example;
use wit_stack_core::core::Stage;
use wit_stack_core::core::Template;
use wit_stack_core::synth::StackSynthesizer;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "wit-stack", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Synthesize the template for one stage.
    Synth(SynthCommand),
    /// Synthesize all three stage templates into a directory.
    SynthAll(SynthAllCommand),
    /// Print the canonical template digest for one stage.
    Hash(HashCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Stage selection for synthesis commands.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum StageArg {
    /// Development stage.
    Dev,
    /// Pre-production stage.
    Beta,
    /// Production stage.
    Prod,
}

impl From<StageArg> for Stage {
    fn from(value: StageArg) -> Self {
        match value {
            StageArg::Dev => Self::Dev,
            StageArg::Beta => Self::Beta,
            StageArg::Prod => Self::Prod,
        }
    }
}

/// Arguments for `synth`.
#[derive(Args, Debug)]
struct SynthCommand {
    /// Stage to synthesize.
    #[arg(long, value_enum, value_name = "STAGE")]
    stage: StageArg,
    /// Optional config file path (defaults to wit-stack.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output path for canonical template JSON (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Arguments for `synth-all`.
#[derive(Args, Debug)]
struct SynthAllCommand {
    /// Optional config file path (defaults to wit-stack.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output directory; one `<stage>.json` file per stage.
    #[arg(long, value_name = "DIR")]
    output_dir: PathBuf,
}

/// Arguments for `hash`.
#[derive(Args, Debug)]
struct HashCommand {
    /// Stage to hash.
    #[arg(long, value_enum, value_name = "STAGE")]
    stage: StageArg,
    /// Optional config file path (defaults to wit-stack.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a wit-stack configuration file.
    Validate(ConfigValidateCommand),
    /// Print a commented example configuration.
    Example,
    /// Print the configuration JSON schema.
    Schema,
    /// Print the configuration reference documentation.
    Docs,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to wit-stack.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("wit-stack {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Synth(command) => command_synth(&command),
        Commands::SynthAll(command) => command_synth_all(&command),
        Commands::Hash(command) => command_hash(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Prints top-level help to stdout.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Synthesis Commands
// ============================================================================

/// Loads configuration and builds the stack synthesizer.
fn load_synthesizer(config: Option<&Path>) -> CliResult<StackSynthesizer> {
    let config = StackConfig::load(config)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let plan =
        config.to_plan().map_err(|err| CliError::new(format!("failed to build plan: {err}")))?;
    Ok(StackSynthesizer::new(plan))
}

/// Renders a template to canonical JSON bytes.
fn render_template(template: &Template) -> CliResult<Vec<u8>> {
    template
        .canonical_bytes()
        .map_err(|err| CliError::new(format!("failed to render template: {err}")))
}

/// Executes the `synth` command.
fn command_synth(command: &SynthCommand) -> CliResult<ExitCode> {
    let synthesizer = load_synthesizer(command.config.as_deref())?;
    let stage = Stage::from(command.stage);
    let template = synthesizer
        .synthesize(stage)
        .map_err(|err| CliError::new(format!("synthesis failed for stage {stage}: {err}")))?;
    let bytes = render_template(&template)?;

    match command.output.as_deref() {
        Some(path) => {
            fs::write(path, &bytes).map_err(|err| {
                CliError::new(format!("failed to write {}: {err}", path.display()))
            })?;
        }
        None => {
            write_stdout_bytes_with_newline(&bytes)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `synth-all` command.
fn command_synth_all(command: &SynthAllCommand) -> CliResult<ExitCode> {
    let synthesizer = load_synthesizer(command.config.as_deref())?;
    fs::create_dir_all(&command.output_dir).map_err(|err| {
        CliError::new(format!("failed to create {}: {err}", command.output_dir.display()))
    })?;

    for stage in Stage::ALL {
        let template = synthesizer
            .synthesize(stage)
            .map_err(|err| CliError::new(format!("synthesis failed for stage {stage}: {err}")))?;
        let bytes = render_template(&template)?;
        let path = command.output_dir.join(format!("{stage}.json"));
        fs::write(&path, &bytes)
            .map_err(|err| CliError::new(format!("failed to write {}: {err}", path.display())))?;
        write_stderr_line(&format!("wrote {}", path.display()))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `hash` command.
fn command_hash(command: &HashCommand) -> CliResult<ExitCode> {
    let synthesizer = load_synthesizer(command.config.as_deref())?;
    let stage = Stage::from(command.stage);
    let template = synthesizer
        .synthesize(stage)
        .map_err(|err| CliError::new(format!("synthesis failed for stage {stage}: {err}")))?;
    let digest = template
        .digest()
        .map_err(|err| CliError::new(format!("failed to hash template: {err}")))?;
    write_stdout_line(digest.as_str()).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommand::Schema => {
            let schema = serde_json::to_string_pretty(&config_schema())
                .map_err(|err| CliError::new(format!("failed to render schema: {err}")))?;
            write_stdout_line(&schema).map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommand::Docs => {
            let docs = config_docs_markdown()
                .map_err(|err| CliError::new(format!("failed to render docs: {err}")))?;
            write_stdout_line(docs.trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes the `config validate` command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let path = StackConfig::resolve_path(command.config.as_deref());
    StackConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("invalid config {}: {err}", path.display())))?;
    write_stdout_line(&format!("config ok: {}", path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout with a trailing newline.
fn write_stdout_bytes_with_newline(bytes: &[u8]) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(bytes)
        .and_then(|()| stdout.write_all(b"\n"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
