mod commands;
mod config;

use anyhow::{Context, Result};
use casework_common::DocumentId;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, edit, list, publish, remove, reorder, AddArgs, EditArgs, ListArgs, MoveArgs,
    PublishArgs, RemoveArgs, Session,
};
use tracing_subscriber::EnvFilter;

/// Casework CLI - edit the sections of a case study from the terminal
#[derive(Parser, Debug)]
#[command(name = "casework")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Case study document to work on
    #[arg(short, long, global = true, default_value = "default")]
    document: String,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the document's sections in order
    List(ListArgs),

    /// Append a new section
    Add(AddArgs),

    /// Delete a section
    Remove(RemoveArgs),

    /// Swap a section with its neighbour
    Move(MoveArgs),

    /// Publish or unpublish a section
    Publish(PublishArgs),

    /// Change a section's title, content, payload or image
    Edit(EditArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot get current directory")?;
    let session = Session::open(&cwd, DocumentId::new(cli.document)).await?;

    let result = match cli.command {
        Command::List(args) => list(args, &session).await,
        Command::Add(args) => add(args, &session).await,
        Command::Remove(args) => remove(args, &session).await,
        Command::Move(args) => reorder(args, &session).await,
        Command::Publish(args) => publish(args, &session).await,
        Command::Edit(args) => edit(args, &session).await,
    };

    // Pending writes still go out when the command itself failed
    let finished = session.finish().await;
    result.and(finished)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
