//! Puppet CLI - inspect, validate and replay puppet scenes

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{replay, tree, validate, OutputFormat};

#[derive(Parser)]
#[command(name = "puppet")]
#[command(about = "Articulated puppet scene tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the node hierarchy of a scene
    Tree {
        /// Path to scene file
        scene: String,

        /// Output format (text, json or toml)
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check a scene for errors and suspicious definitions
    Validate {
        /// Path to scene file
        scene: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run a scripted input session against a scene (headless)
    Replay {
        /// Path to scene file
        scene: String,

        /// Path to event script
        script: String,

        /// Viewer configuration file
        #[arg(long)]
        config: Option<String>,

        /// Output format (text, json or toml)
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Tree { scene, format } => tree::run(&scene, format),
        Commands::Validate {
            scene,
            strict,
            format,
        } => validate::run(validate::ValidateArgs {
            scene,
            strict,
            format,
        }),
        Commands::Replay {
            scene,
            script,
            config,
            format,
        } => replay::run(replay::ReplayArgs {
            scene,
            script,
            config,
            format,
        }),
    }
}
