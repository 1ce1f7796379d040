//! typeslot CLI - Python type hints from a prediction service.
//!
//! Renders function stubs, fetches type predictions for Python files and
//! serves the same operations over HTTP.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use typeslot_core::ParameterDescriptor;
use typeslot_ops::Config;

mod commands;

use commands::{config as config_cmd, hints, infer, serve, stub};

/// typeslot - Type hints for Python from a prediction service.
#[derive(Parser, Debug)]
#[command(
    name = "typeslot",
    author,
    version,
    about = "typeslot: Python stubs and predicted type hints",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a function stub.
    ///
    /// Example: `typeslot stub add -p a:int -p b -r int`
    Stub {
        /// Function name.
        name: String,

        /// Parameter as `name` or `name:type` (repeatable, in order).
        #[arg(short = 'p', long = "param")]
        params: Vec<ParameterDescriptor>,

        /// Return type annotation.
        #[arg(short = 'r', long = "returns")]
        return_type: Option<String>,
    },

    /// Predict types for a Python file.
    Infer {
        /// Python source file.
        file: PathBuf,

        /// Print the predictions as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Predict types for a file and print one stub per function.
    Stubs {
        /// Python source file.
        file: PathBuf,
    },

    /// Predict types for a file and print hints at a cursor position.
    Hints {
        /// Python source file.
        file: PathBuf,

        /// 0-based cursor line.
        #[arg(long)]
        line: usize,

        /// 0-based cursor column just after the trigger, in UTF-16 code units.
        #[arg(long)]
        column: usize,

        /// Character just typed: `:` or `>`.
        #[arg(long, default_value_t = ':')]
        trigger: char,
    },

    /// Print the sample prediction fixture as JSON.
    Fixture,

    /// Serve the REST API.
    Serve {
        /// Address to bind (defaults to the configured `bind`).
        #[arg(long)]
        bind: Option<String>,
    },

    /// Manage configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Stub {
            name,
            params,
            return_type,
        } => {
            stub::execute(name, params, return_type)?;
        }

        Commands::Infer { file, json } => {
            infer::execute(config, &file, json).await?;
        }

        Commands::Stubs { file } => {
            stub::stubs(config, &file).await?;
        }

        Commands::Hints {
            file,
            line,
            column,
            trigger,
        } => {
            hints::execute(config, &file, line, column, trigger).await?;
        }

        Commands::Fixture => {
            let fixtures = typeslot_core::sample_fixtures();
            println!("{}", typeslot_core::fixtures_to_json(&fixtures)?);
        }

        Commands::Serve { bind } => {
            serve::execute(config, bind).await?;
        }

        Commands::Config(config_cmd_inner) => {
            let mut config = config;
            match config_cmd_inner {
                ConfigCommands::Show => {
                    config_cmd::show(&config)?;
                }
                ConfigCommands::Set { key, value } => {
                    config_cmd::set(&mut config, &key, &value)?;
                }
                ConfigCommands::Get { key } => {
                    config_cmd::get(&config, &key)?;
                }
                ConfigCommands::Reset => {
                    config_cmd::reset(&config)?;
                }
                ConfigCommands::Path => {
                    if let Some(path) = Config::config_file_path() {
                        println!("{}", path.display());
                    } else {
                        println!("(no config file path available)");
                    }
                }
            }
        }
    }

    Ok(())
}
