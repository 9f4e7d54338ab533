//! Standfirst CLI - seat board for stand-to-answer quizzes
//!
//! This binary drives the `standfirst` library: it reads the seat controller,
//! shows who stood first, plays the cues and manages config.ini.

mod audio;
mod commands;
mod error;
mod keyboard;
mod link;
mod tui_app;
mod ui;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::run::RunArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "standfirst")]
#[command(version, about = "Shows which quiz contestant stood up first", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a quiz session on the seat controller
    Run(RunArgs),

    /// View or change config.ini
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn dispatch(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Config(command) => commands::config::run(command),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
