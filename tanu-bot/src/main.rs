//! Tanu CLI - skill-based personal assistant.
//!
//! Loads skill manifests from the plugin directory and dispatches typed
//! utterances to them.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tanu_bot::error::{BotError, Result};
use tanu_bot::prelude::*;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Tanu - dispatch typed commands to pluggable skills
#[derive(Parser)]
#[command(name = "tanu")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "TANU_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Skill plugin directory (overrides config)
    #[arg(short, long, env = "TANU_SKILLS_DIR", global = true)]
    skills_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Run,

    /// Dispatch a single utterance and exit
    Dispatch(DispatchArgs),

    /// List loaded skills and skipped units
    Skills,

    /// Write the default configuration and bundled skill manifests
    Init(InitArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the dispatch command
#[derive(Args)]
struct DispatchArgs {
    /// Utterance to dispatch; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
}

/// Arguments for the init command
#[derive(Args)]
struct InitArgs {
    /// Force overwrite existing configuration and manifests
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the config command
#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

/// Options shared by every command.
struct Context {
    config_path: PathBuf,
    skills_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = match rt.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    };

    // Stdin reads run on a blocking thread that may still be parked after
    // Ctrl+C.
    rt.shutdown_timeout(Duration::from_millis(100));
    code
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tanu={level},tanu_bot={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<ExitCode> {
    let ctx = Context {
        config_path: cli.config.unwrap_or_else(config_path),
        skills_dir: cli.skills_dir,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run(&ctx).await,
        Commands::Dispatch(args) => cmd_dispatch(&ctx, args).await,
        Commands::Skills => cmd_skills(&ctx).await,
        Commands::Init(args) => cmd_init(&ctx, args).await,
        Commands::Config(args) => cmd_config(&ctx, args).await,
    }
}

/// Load the configuration, applying command-line overrides.
async fn load(ctx: &Context) -> Result<BotConfig> {
    let mut config = load_config_from(&ctx.config_path)
        .await
        .with_context(|| format!("failed to load {}", ctx.config_path.display()))?;
    if let Some(dir) = &ctx.skills_dir {
        config.skills.dir = Some(dir.clone());
    }
    Ok(config)
}

/// Build the agent from the plugin directory and the bundled factories.
fn build_agent(config: &BotConfig) -> Agent {
    let mut builder = Agent::builder()
        .plugin_dir(config.skills.resolved_dir())
        .factories(builtin_factories(Arc::new(SystemLauncher)));
    if config.echo.enabled {
        builder = builder.observer(Arc::new(ConsoleEcho));
    }
    builder.build()
}

/// Start an interactive session.
async fn cmd_run(ctx: &Context) -> Result<ExitCode> {
    let config = load(ctx).await?;
    let agent = build_agent(&config);

    println!("{}", "=".repeat(60));
    println!("[Tanu - Ready]");
    println!(
        "Type '{}' to stop Tanu",
        config.input.exit_words.join("', '")
    );
    println!("Press Ctrl+C to force exit");
    println!("{}", "=".repeat(60));
    println!();

    run_interactive(&agent, &TextInputConfig::from(&config.input)).await?;
    Ok(ExitCode::SUCCESS)
}

/// Dispatch one utterance. Exits non-zero unless a skill handled it.
async fn cmd_dispatch(ctx: &Context, args: DispatchArgs) -> Result<ExitCode> {
    let config = load(ctx).await?;
    let agent = build_agent(&config);

    let result = agent.dispatch(&args.text.join(" "));
    Ok(if result.is_handled() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// List loaded skills and skipped units.
async fn cmd_skills(ctx: &Context) -> Result<ExitCode> {
    let config = load(ctx).await?;
    let dir = config.skills.resolved_dir();
    let agent = Agent::builder()
        .plugin_dir(&dir)
        .factories(builtin_factories(Arc::new(SystemLauncher)))
        .build();
    let report = agent.report();

    println!("Plugin directory: {}", dir.display());
    println!();

    if report.loaded.is_empty() {
        println!("No skills loaded. Run `tanu init` to install the bundled skills.");
    } else {
        println!("{:<24} {:<16} PHRASES", "UNIT", "SKILL");
        for unit in &report.loaded {
            println!("{:<24} {:<16} {}", unit.unit, unit.skill, unit.phrases);
        }
    }

    if !report.diagnostics.is_empty() {
        println!();
        println!("Diagnostics:");
        for diagnostic in &report.diagnostics {
            println!("  {diagnostic}");
        }
    }

    println!();
    println!("Phrases routed: {}", agent.table().len());
    Ok(ExitCode::SUCCESS)
}

/// Write the default configuration and the bundled manifests.
async fn cmd_init(ctx: &Context, args: InitArgs) -> Result<ExitCode> {
    let path = &ctx.config_path;

    let config = if path.exists() && !args.force {
        println!("Configuration already exists at: {}", path.display());
        println!("Use --force to overwrite.");
        load(ctx).await?
    } else {
        let mut config = init_config(path, args.force)
            .await
            .map_err(|e| BotError::config(format!("failed to initialize config: {e}")))?;
        if let Some(dir) = &ctx.skills_dir {
            config.skills.dir = Some(dir.clone());
        }
        println!("Configuration created: {}", path.display());
        config
    };

    let dir = config.skills.resolved_dir();
    let written = install_bundled(&dir, args.force)
        .await
        .with_context(|| format!("failed to install skills into {}", dir.display()))?;
    for file in &written {
        println!("Installed: {}", file.display());
    }
    if written.is_empty() {
        println!("Bundled skills already present in: {}", dir.display());
    }

    println!();
    println!("Next steps:");
    println!("  1. tanu skills");
    println!("  2. tanu");

    Ok(ExitCode::SUCCESS)
}

/// Inspect the configuration.
async fn cmd_config(ctx: &Context, args: ConfigArgs) -> Result<ExitCode> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", ctx.config_path.display());
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommands::Show => {
            let config = load(ctx).await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommands::Validate => {
            let config = load(ctx).await?;
            let issues = config.validate();
            if issues.is_empty() {
                println!("Configuration is valid.");
                return Ok(ExitCode::SUCCESS);
            }
            for issue in &issues {
                println!("{issue}");
            }
            if config.has_errors() {
                return Err(BotError::config("configuration has errors"));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
