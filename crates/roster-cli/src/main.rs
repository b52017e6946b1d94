mod cmd;
mod output;
mod root;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use roster_core::types::Classification;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roster",
    about = "Work calendars and automatic vacation assignment for unionized staff",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .roster/)
    #[arg(long, global = true, env = "ROSTER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log progress at INFO level
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .roster/config.yaml and an empty database
    Init,

    /// Load reference data from a YAML dataset
    Import {
        /// Path to the dataset file
        file: PathBuf,
    },

    /// Generate calendar rows for employees
    Generate {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Employee id (repeatable; omit for every active union member)
        #[arg(long = "employee")]
        employees: Vec<u64>,
    },

    /// Assign automatic vacation days within a window
    Assign {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Group id (omit for every group)
        #[arg(long)]
        group: Option<u64>,
    },

    /// Refresh seniority, generate calendars and assign vacations per area
    Run {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },

    /// Show an employee's calendar as day codes
    Calendar {
        #[arg(long)]
        employee: u64,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Only show days of this classification (e.g. auto_vacation)
        #[arg(long)]
        only: Option<Classification>,
    },

    /// Show a group's absence status for one date
    Manning {
        #[arg(long)]
        group: u64,
        #[arg(long)]
        date: NaiveDate,
    },

    /// Show or validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Import { file } => cmd::import::run(&root, &file, cli.json),
        Commands::Generate {
            start,
            end,
            employees,
        } => cmd::generate::run(&root, start, end, &employees, cli.json),
        Commands::Assign { start, end, group } => {
            cmd::assign::run(&root, start, end, group, cli.json)
        }
        Commands::Run { start, end } => cmd::run::run(&root, start, end, cli.json),
        Commands::Calendar {
            employee,
            start,
            end,
            only,
        } => cmd::calendar::run(&root, employee, start, end, only, cli.json),
        Commands::Manning { group, date } => cmd::manning::run(&root, group, date, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
