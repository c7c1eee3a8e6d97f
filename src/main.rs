//! `JatimGuide` CLI entrypoint.
//!
//! This is the main entrypoint for the jatimguide command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use jatimguide::catalog::{Catalog, CatalogKind};
use jatimguide::cli::{Cli, Commands, OutputFormatter, ReplCommand, REPL_HELP};
use jatimguide::config::{
    apply_overrides, find_config_file, ConfigParser, ConfigValidator, GuideConfig,
};
use jatimguide::engine::GuideEngine;
use jatimguide::error::{GenerationError, GuideError, Result};
use jatimguide::planner::TripRequest;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose, cli.log_json);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let formatter = OutputFormatter::new(cli.output);
    match runtime.block_on(run(cli, &formatter)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", formatter.error(&e.user_message()));
            if !matches!(e, GuideError::Generation(_)) {
                eprintln!("   {e}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system. Logs go to stderr so stdout stays clean
/// for command output.
fn init_logging(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Main async entry point.
async fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Validate { warnings } => cmd_validate(cli.config.as_ref(), warnings, formatter),
        Commands::Catalog { kind } => cmd_catalog(cli.config.as_ref(), kind, formatter),
        Commands::Generate {
            from,
            days,
            transport,
            offline,
            hotels,
            foods,
        } => {
            let request = TripRequest::new(from, transport, days);
            cmd_generate(
                cli.config.as_ref(),
                &request,
                offline,
                &hotels,
                &foods,
                formatter,
            )
            .await
        }
        Commands::Session { offline } => cmd_session(cli.config.as_ref(), offline, formatter).await,
    }
}

/// Writes command output to stdout.
fn emit(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text.trim_end())?;
    stdout.flush()?;
    Ok(())
}

/// Write a starter configuration.
fn cmd_init(path: &Path, force: bool) -> Result<()> {
    info!("Initializing JatimGuide configuration in: {}", path.display());

    let config_path = path.join("jatimguide.yaml");
    let env_path = path.join(".env.example");
    let gitignore_path = path.join(".gitignore");

    if !force && config_path.exists() {
        eprintln!("Configuration file already exists: {}", config_path.display());
        eprintln!("Use --force to overwrite.");
        return Ok(());
    }

    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }

    std::fs::write(&config_path, include_str!("../templates/jatimguide.yaml"))?;
    eprintln!("Created: {}", config_path.display());

    std::fs::write(&env_path, include_str!("../templates/.env.example"))?;
    eprintln!("Created: {}", env_path.display());

    if gitignore_path.exists() {
        let existing = std::fs::read_to_string(&gitignore_path)?;
        if !existing.lines().any(|line| line.trim() == ".env") {
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&gitignore_path)?;
            writeln!(file, "\n# JatimGuide\n.env")?;
            eprintln!("Updated: {}", gitignore_path.display());
        }
    } else {
        std::fs::write(&gitignore_path, ".env\n")?;
        eprintln!("Created: {}", gitignore_path.display());
    }

    eprintln!("\nConfiguration initialized.");
    eprintln!("Next steps:");
    eprintln!("  1. Copy .env.example to .env and set ANTHROPIC_API_KEY (optional)");
    eprintln!("  2. Run 'jatimguide validate' to check your configuration");
    eprintln!("  3. Run 'jatimguide generate --from Surabaya --days 3' to plan a route");

    Ok(())
}

/// Validate configuration.
fn cmd_validate(
    config_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let config = read_config(config_path)?;
    let result = ConfigValidator::new().check(&config);

    emit(&formatter.format_validation(&result, show_warnings))?;

    if result.is_valid() {
        if config.service.enabled && ConfigParser::get_api_key(&config.service).is_err() {
            eprintln!(
                "{}",
                formatter.warning(&format!(
                    "{} is not set; only fallback itineraries will be produced",
                    config.service.api_key_env
                ))
            );
        }
        Ok(())
    } else {
        ConfigValidator::new().validate(&config).map(|_| ())
    }
}

/// List the catalog.
fn cmd_catalog(
    config_path: Option<&PathBuf>,
    kind: Option<CatalogKind>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let config = load_config(config_path)?;
    let catalog = match &config.catalog.path {
        Some(path) => Catalog::load_file(path)?,
        None => Catalog::east_java(),
    };
    emit(&formatter.format_catalog(&catalog, kind))
}

/// Generate one itinerary.
async fn cmd_generate(
    config_path: Option<&PathBuf>,
    request: &TripRequest,
    offline: bool,
    hotels: &[u32],
    foods: &[u32],
    formatter: &OutputFormatter,
) -> Result<()> {
    let engine = build_engine(config_path, offline)?;

    engine.generate(request).await?;

    for id in hotels {
        engine.add_hotel_by_id(*id)?;
    }
    for id in foods {
        engine.add_food_by_id(*id)?;
    }

    emit(&formatter.format_snapshot(&engine.snapshot()))
}

/// Run an interactive session.
async fn cmd_session(
    config_path: Option<&PathBuf>,
    offline: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let engine = build_engine(config_path, offline)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("JatimGuide session. Type 'help' for commands.");

    loop {
        eprint!("> ");
        std::io::stderr().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match ReplCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", formatter.error(&message));
                continue;
            }
        };

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Empty => {}
            command => {
                if let Err(e) = handle_repl_command(&engine, command, formatter).await {
                    eprintln!("{}", formatter.error(&e.user_message()));
                }
            }
        }
    }

    Ok(())
}

/// Executes one session command.
async fn handle_repl_command(
    engine: &GuideEngine,
    command: ReplCommand,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        ReplCommand::Generate(request) => {
            let pending = engine.spawn_generation(&request)?;
            eprintln!("Generating route {} (Ctrl-C to cancel)...", pending.ticket.sequence);

            tokio::select! {
                result = pending.wait() => {
                    let plan = result?;
                    emit(&formatter.format_plan(&plan))?;
                }
                _ = tokio::signal::ctrl_c() => {
                    if let Some(sequence) = engine.abandon_generation() {
                        let message = format!("Generation {sequence} cancelled");
                        eprintln!("{}", formatter.warning(&message));
                    }
                }
            }
        }
        ReplCommand::Add { kind, id } => {
            if engine.snapshot().plan.is_none() {
                eprintln!("{}", formatter.warning("Generate a route before adding items."));
                return Ok(());
            }
            let changed = match kind {
                CatalogKind::Hotel => engine.add_hotel_by_id(id)?,
                CatalogKind::Food => engine.add_food_by_id(id)?,
                CatalogKind::Destination => false,
            };
            let message = if changed {
                format!("Added {kind} {id}")
            } else {
                format!("{kind} {id} is already added")
            };
            eprintln!("{}", formatter.success(&message));
        }
        ReplCommand::Remove { kind, id } => {
            let changed = match kind {
                CatalogKind::Hotel => engine.remove_hotel(id),
                CatalogKind::Food => engine.remove_food(id),
                CatalogKind::Destination => false,
            };
            if changed {
                eprintln!("{}", formatter.success(&format!("Removed {kind} {id}")));
            } else {
                eprintln!("{}", formatter.warning(&format!("{kind} {id} was not added")));
            }
        }
        ReplCommand::Show => emit(&formatter.format_snapshot(&engine.snapshot()))?,
        ReplCommand::Selections => {
            let snapshot = engine.snapshot();
            emit(&formatter.format_selections(&snapshot.hotels, &snapshot.foods))?;
        }
        ReplCommand::Catalog(kind) => emit(&formatter.format_catalog(engine.catalog(), kind))?,
        ReplCommand::History => emit(&formatter.format_history(&engine.snapshot().history))?,
        ReplCommand::Cancel => match engine.abandon_generation() {
            Some(sequence) => {
                eprintln!("{}", formatter.warning(&format!("Generation {sequence} cancelled")));
            }
            None => eprintln!("No generation is running."),
        },
        ReplCommand::Help => eprintln!("{REPL_HELP}"),
        ReplCommand::Quit | ReplCommand::Empty => {}
    }

    Ok(())
}

/// Loads configuration and applies environment overrides. Without a config
/// file the defaults are used.
fn read_config(config_path: Option<&PathBuf>) -> Result<GuideConfig> {
    let config_file = match config_path {
        Some(path) => Some(path.clone()),
        None => find_config_file(".").ok(),
    };

    let config = match config_file {
        Some(file) => {
            debug!("Loading configuration from: {}", file.display());
            let parser = ConfigParser::new()
                .with_base_path(file.parent().unwrap_or_else(|| Path::new(".")));
            parser.load_dotenv()?;
            parser.load_with_env(&file)?
        }
        None => {
            debug!("No configuration file found; using defaults");
            ConfigParser::new().load_dotenv()?;
            let mut config = GuideConfig::default();
            apply_overrides(&mut config, |key| std::env::var(key).ok());
            config
        }
    };

    Ok(config)
}

/// Loads and validates configuration.
fn load_config(config_path: Option<&PathBuf>) -> Result<GuideConfig> {
    let config = read_config(config_path)?;

    let result = ConfigValidator::new().validate(&config)?;
    for warning in &result.warnings {
        warn!("{warning}");
    }

    Ok(config)
}

/// Builds the engine, optionally with the generation service switched off.
fn build_engine(config_path: Option<&PathBuf>, offline: bool) -> Result<GuideEngine> {
    let mut config = load_config(config_path)?;

    if offline {
        if !config.fallback.enabled {
            return Err(GuideError::Generation(GenerationError::failed(
                "offline mode needs the fallback planner, which is disabled",
            )));
        }
        config.service.enabled = false;
    }

    GuideEngine::from_config(&config)
}
