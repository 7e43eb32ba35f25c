mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, eval, init, render, CheckArgs, EvalArgs, InitArgs, RenderArgs};
use tracing_subscriber::EnvFilter;

/// Reformulator CLI - render JSON templates against JSON data
#[derive(Parser, Debug)]
#[command(name = "reformulator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log resolution details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Reformulator project
    Init(InitArgs),

    /// Render templates to HTML
    Render(RenderArgs),

    /// Resolve a single expression
    Eval(EvalArgs),

    /// Validate every expression in the templates
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Render(args) => render(args, &cwd),
                Command::Eval(args) => eval(args, &cwd),
                Command::Check(args) => check(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
