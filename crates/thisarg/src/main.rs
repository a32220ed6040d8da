//! thisarg - explicit receiver parameters for JavaScript
//!
//! CLI driver for lowering and checking sources.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

/// Explicit receiver parameters for JavaScript
#[derive(Parser, Debug)]
#[command(name = "thisarg")]
#[command(author, version, about = "Lower explicit `this` receiver parameters to standard JavaScript")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lower source file(s) to standard JavaScript
    Lower(commands::lower::LowerArgs),

    /// Report diagnostics without writing output
    Check(commands::check::CheckArgs),

    /// Explain a diagnostic or runtime error code
    Explain(commands::explain::ExplainArgs),

    /// Write a default thisarg.toml
    Init(commands::init::InitArgs),
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Determine if colors should be used
    let use_color = !cli.no_color && !cli.quiet && atty::is(atty::Stream::Stderr);

    let Some(command) = cli.command else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Lower(args) => commands::lower::run(args, cli.format, use_color, cli.quiet),
        Commands::Check(args) => commands::check::run(args, cli.format, use_color, cli.verbose),
        Commands::Explain(args) => commands::explain::run(args, cli.format, use_color),
        Commands::Init(args) => commands::init::run(args, cli.format, use_color),
    }
}
