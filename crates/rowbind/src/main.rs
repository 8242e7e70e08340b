//! rowbind: list and edit rows of the POS/Odoo exchange tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rowbind_logging::LogConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

mod cli;

use cli::context::CliContext;
use cli::error::HelpfulError;

#[derive(Parser, Debug)]
#[command(name = "rowbind", version, about = "Typed row editor for the exchange database")]
struct Cli {
    /// Path to config.toml (default: ~/.rowbind/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override connection.database from the config file
    #[arg(long, global = true, env = "ROWBIND_DATABASE", value_name = "NAME")]
    database: Option<String>,

    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the resolved connection settings
    Config(cli::config::ConfigArgs),

    /// Test the database connection
    Check,

    /// Describe the known tables and their columns
    Tables(cli::tables::TablesArgs),

    /// List rows of a table
    List(cli::list::ListArgs),

    /// Insert a row
    Insert(cli::insert::InsertArgs),

    /// Update a row by primary key
    Update(cli::update::UpdateArgs),

    /// Delete a row by primary key
    Delete(cli::delete::DeleteArgs),
}

fn run_command(cli: Cli) -> Result<()> {
    let Cli {
        config,
        database,
        command,
        ..
    } = cli;
    // `tables` works without a config file
    let context = || CliContext::load(config, database);

    match command {
        Commands::Tables(args) => cli::tables::run(args),
        Commands::Config(args) => cli::config::run(args, &context()?),
        Commands::Check => cli::check::run(&context()?),
        Commands::List(args) => cli::list::run(args, &context()?),
        Commands::Insert(args) => cli::insert::run(args, &context()?),
        Commands::Update(args) => cli::update::run(args, &context()?),
        Commands::Delete(args) => cli::delete::run(args, &context()?),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match rowbind_logging::init_logging(LogConfig {
        app_name: "rowbind",
        verbose: cli.verbose,
    }) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: logging disabled: {:#}", err);
            None
        }
    };

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<HelpfulError>() {
                Some(report) => eprint!("{}", report),
                None => {
                    error!(error = %format!("{:#}", err), "Command failed");
                    eprintln!("{:?}", err);
                }
            }
            ExitCode::from(1)
        }
    }
}
