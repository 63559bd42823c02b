use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod accounting;
mod locate;
mod model;
mod record;
mod render;
mod stats;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "sge-memstat")]
#[command(about = "Memory usage of finished Grid Engine jobs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize requested vs. used memory of one user's jobs.
    Memory {
        /// Job owner.
        #[arg(short, long)]
        user: String,

        /// Regex searched for in the job name (empty: all jobs).
        #[arg(short = 'n', long, default_value = "")]
        pattern: String,

        /// Only count jobs with this exit status (-1: any).
        #[arg(short, long, default_value_t = record::ANY_EXIT_STATUS, allow_negative_numbers = true)]
        exit_status: i64,

        /// Accounting file to read instead of the cell's.
        #[arg(short, long, conflicts_with = "month")]
        file: Option<PathBuf>,

        /// Read the archived accounting file of this month (YYYY-MM).
        #[arg(short, long)]
        month: Option<String>,

        #[arg(long, env = "SGE_ROOT", default_value = "/opt/sge")]
        sge_root: PathBuf,

        #[arg(long, env = "SGE_CELL", default_value = "default")]
        sge_cell: String,

        /// Skip malformed records instead of aborting.
        #[arg(long)]
        lenient: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Memory {
            user,
            pattern,
            exit_status,
            file,
            month,
            sge_root,
            sge_cell,
            lenient,
            json,
        } => {
            // 1) Build the query first so a bad pattern fails before any I/O.
            let query = record::Query::new(user, &pattern, exit_status)?;
            let stats = stats::StatSet::standard()?;

            // 2) Locate the accounting file.
            let path = match file {
                Some(path) => path,
                None => {
                    let month = month.as_deref().map(locate::YearMonth::parse).transpose()?;
                    locate::CellLayout::new(sge_root, sge_cell).accounting_file(month)?
                }
            };
            info!(path = %path.display(), user = %query.user, "scanning accounting file");

            // 3) Scan + aggregate.
            let mode = if lenient {
                accounting::ParseMode::Lenient
            } else {
                accounting::ParseMode::Strict
            };
            let table = accounting::scan_accounting_file(&path, &query, &stats, mode)?;
            let report = model::summarize_memory(&table)?;

            // 4) Render.
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::render_text_report(&query.user, &report));
            }
        }
    }

    Ok(())
}
