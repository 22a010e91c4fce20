//! Rejig CLI
//!
//! Command-line interface for the Rejig source rewriting toolkit

mod commands;
mod output;

use clap::{Parser, Subcommand};
use rejig_core::init_tracing;
use std::path::PathBuf;
use std::process;
use tracing::error;

#[derive(Parser)]
#[command(name = "rejig")]
#[command(about = "Rejig: cursor-driven refactorings for script sources")]
#[command(version = rejig_core::VERSION)]
#[command(
    long_about = "Rejig applies precedence- and capture-safe rewrites to script files.\n\
\n\
Examples:\n  \
rejig actions app.js --at 42             # List actions available at offset 42\n  \
rejig apply app.js --at 42 inline-variable inline-all --diff\n  \
rejig apply app.js --at 42 convert-string to-template --write\n  \
rejig fix app.js --at 42 --write         # Correct a misspelled identifier"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List refactor actions available at a cursor position
    Actions {
        /// Source file to inspect
        file: PathBuf,

        /// Cursor byte offset into the file
        #[arg(long)]
        at: u32,
    },

    /// Apply one refactor action at a cursor position
    Apply {
        /// Source file to rewrite
        file: PathBuf,

        /// Cursor byte offset into the file
        #[arg(long)]
        at: u32,

        /// Refactor name, e.g. inline-variable
        refactor: String,

        /// Action id, e.g. inline-all
        action: String,

        /// Write the result back to the file instead of printing it
        #[arg(short, long)]
        write: bool,

        /// Print a unified diff instead of the full new text
        #[arg(long)]
        diff: bool,
    },

    /// Correct a misspelled identifier at a cursor position
    Fix {
        /// Source file to rewrite
        file: PathBuf,

        /// Cursor byte offset into the file
        #[arg(long)]
        at: u32,

        /// Write the result back to the file instead of printing it
        #[arg(short, long)]
        write: bool,

        /// Print a unified diff instead of the full new text
        #[arg(long)]
        diff: bool,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Actions { file, at } => commands::actions_command(&file, at),
        Commands::Apply {
            file,
            at,
            refactor,
            action,
            write,
            diff,
        } => commands::apply_command(&file, at, &refactor, &action, write, diff),
        Commands::Fix {
            file,
            at,
            write,
            diff,
        } => commands::fix_command(&file, at, write, diff),
    };

    if let Err(err) = result {
        error!("{err:#}");
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}
