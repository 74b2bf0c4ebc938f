//! cbom-tools: CBOM reference graph and post-quantum compliance tool

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use cbom_tools::{
    cli,
    config::{self, AppConfig, ConfigPreset, ExplicitOverrides},
    pipeline::{exit_codes, OutputFormat},
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cbom-tools")]
#[command(version)]
#[command(about = "CBOM reference graph and post-quantum compliance tool", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  The CBOM failed validation
    2  An asset is not quantum safe (with --fail-on-noncompliant)
    3  Error occurred

EXAMPLES:
    # Check a CBOM for structural defects
    cbom-tools validate cbom.json

    # Evaluate quantum safety locally and fail CI on unsafe assets
    cbom-tools compliance cbom.json --offline --fail-on-noncompliant

    # Show what an asset depends on and what provides it
    cbom-tools graph cbom.json --ref crypto/algorithm/rsa-2048@1.2.840.113549.1.1.1")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Configuration preset: default, offline, ci-cd
    #[arg(long, global = true, value_parser = parse_preset)]
    preset: Option<ConfigPreset>,

    /// Output format (auto: summary on a terminal, JSON otherwise)
    #[arg(short, long, global = true)]
    output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long, global = true)]
    output_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a CBOM for missing mandatory fields
    Validate {
        /// Path to the CBOM (`-` for stdin)
        bom: PathBuf,
    },

    /// Evaluate the quantum safety of every cryptographic asset
    Compliance {
        /// Path to the CBOM (`-` for stdin)
        bom: PathBuf,

        /// Policy check endpoint of a remote compliance service
        #[arg(long, env = "CBOM_COMPLIANCE_URL")]
        service_url: Option<String>,

        /// Policy requested from the remote service
        #[arg(long)]
        policy: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Use the local engine only
        #[arg(long)]
        offline: bool,

        /// Exit with code 2 if any asset is not quantum safe
        #[arg(long)]
        fail_on_noncompliant: bool,
    },

    /// Show the reference graph, or the neighbors of one asset
    Graph {
        /// Path to the CBOM (`-` for stdin)
        bom: PathBuf,

        /// bom-ref whose neighbors to show
        #[arg(long = "ref", value_name = "BOM_REF")]
        bom_ref: Option<String>,
    },

    /// List detections with their compliance level and source location
    Detections {
        /// Path to the CBOM (`-` for stdin)
        bom: PathBuf,

        /// Use the local engine only
        #[arg(long)]
        offline: bool,
    },

    /// Replay a recorded scan stream (one JSON message per line)
    Replay {
        /// Path to the recorded stream
        stream: PathBuf,

        /// Exit with code 2 if the final CBOM is not quantum safe
        #[arg(long)]
        fail_on_noncompliant: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(long, value_name = "PATH")]
        to: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print the discovered config file
    Path,
    /// Generate an example .cbom-tools.yaml in the current directory
    Init,
}

fn parse_preset(name: &str) -> Result<ConfigPreset, String> {
    ConfigPreset::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
        format!("unknown preset '{name}', expected one of: {}", names.join(", "))
    })
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .with_ansi(!cli.no_color && std::env::var_os("NO_COLOR").is_none()),
        )
        .init();

    match run(cli) {
        Ok(exit_codes::SUCCESS) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Layer file config, preset and CLI flags, in that order.
///
/// Flags carrying a value are applied last so they win even when they
/// repeat a default.
fn effective_config(
    cli: &Cli,
    overrides: AppConfig,
    explicit: ExplicitOverrides,
) -> Result<AppConfig> {
    let (mut config, loaded_from) = config::load_or_default(cli.config.as_deref());
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded configuration from {}", path.display());
    }
    if let Some(preset) = cli.preset {
        config.merge(&AppConfig::from_preset(preset));
    }

    let overrides = AppConfig {
        output: config::OutputConfig {
            file: cli.output_file.clone(),
            no_color: cli.no_color,
            ..config::OutputConfig::default()
        },
        behavior: config::BehaviorConfig {
            quiet: cli.quiet,
            ..overrides.behavior
        },
        ..overrides
    };
    config.merge(&overrides);
    ExplicitOverrides {
        format: cli.output,
        ..explicit
    }
    .apply_to(&mut config);

    Ok(config.validated()?)
}

fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Validate { bom } => {
            let config =
                effective_config(&cli, AppConfig::default(), ExplicitOverrides::default())?;
            cli::run_validate(bom, &config)
        }

        Commands::Compliance {
            bom,
            service_url,
            policy,
            timeout,
            offline,
            fail_on_noncompliant,
        } => {
            let overrides = AppConfig::builder()
                .service_url(service_url.clone())
                .viewer_only(*offline)
                .fail_on_noncompliant(*fail_on_noncompliant)
                .build();
            let explicit = ExplicitOverrides {
                policy_identifier: policy.clone(),
                timeout_secs: *timeout,
                format: None,
            };
            let config = effective_config(&cli, overrides, explicit)?;
            cli::run_compliance(bom, &config)
        }

        Commands::Graph { bom, bom_ref } => {
            let config =
                effective_config(&cli, AppConfig::default(), ExplicitOverrides::default())?;
            cli::run_graph(bom, bom_ref.as_deref(), &config)
        }

        Commands::Detections { bom, offline } => {
            let overrides = AppConfig::builder().viewer_only(*offline).build();
            let config = effective_config(&cli, overrides, ExplicitOverrides::default())?;
            cli::run_detections(bom, &config)
        }

        Commands::Replay {
            stream,
            fail_on_noncompliant,
        } => {
            let overrides = AppConfig::builder()
                .fail_on_noncompliant(*fail_on_noncompliant)
                .build();
            let config = effective_config(&cli, overrides, ExplicitOverrides::default())?;
            cli::run_replay(stream, &config)
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "cbom-tools", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { to } => {
            let schema = config::generate_json_schema().context("failed to serialize schema")?;
            match to {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
                match &loaded_from {
                    Some(path) => eprintln!("# Loaded from: {}", path.display()),
                    None => eprintln!("# No config file found; showing defaults"),
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Path => {
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".cbom-tools.yaml");
                if target.exists() {
                    bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(exit_codes::SUCCESS)
            }
        },
    }
}
