//! Headless command-line host for the habit engine.
//!
//! # Responsibility
//! - Map subcommands onto `HabitStore` operations.
//! - Print results as JSON for scripting.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "habit", version, about = "Track daily habits and streaks")]
struct Cli {
    /// Path to config.toml (defaults to the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a habit
    Add(commands::habit::AddArgs),
    /// List habits with streaks and recent days
    List(commands::habit::ListArgs),
    /// Toggle completion for a day (today by default)
    Toggle(commands::habit::ToggleArgs),
    /// Edit habit fields
    Edit(commands::habit::EditArgs),
    /// Delete a habit
    Delete {
        /// Habit id
        id: String,
    },
    /// Summary across all habits
    Stats,
    /// Suggested categories and colors
    Presets,
    /// Print core version
    Version,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Add(args) => commands::habit::add(config, args),
        Commands::List(args) => commands::habit::list(config, args),
        Commands::Toggle(args) => commands::habit::toggle(config, args),
        Commands::Edit(args) => commands::habit::edit(config, args),
        Commands::Delete { id } => commands::habit::delete(config, &id),
        Commands::Stats => commands::stats::run(config),
        Commands::Presets => commands::stats::presets(),
        Commands::Version => {
            println!("habit_core version={}", habit_core::core_version());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
