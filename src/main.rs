use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use pydocs_parser::config::LOG_DATETIME_FORMAT;
use pydocs_parser::{control_output, CachedSession, Mode, OutputMode, Settings};

#[derive(Parser, Debug)]
#[command(name = "pydocs-parser", version, about = "Python documentation parser")]
struct Args {
    /// Parser mode
    #[arg(value_enum)]
    mode: Mode,

    /// Clear the HTTP cache before running
    #[arg(short, long)]
    clear_cache: bool,

    /// Additional output modes
    #[arg(short, long, value_enum)]
    output: Option<OutputMode>,

    /// TOML file overriding the default settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::new().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - [{}] - {}",
                chrono::Local::now().format(LOG_DATETIME_FORMAT),
                record.level(),
                record.args()
            )
        })
        .init();
}

async fn run(args: Args) -> Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    let session = CachedSession::open(&settings, settings.cache_path())
        .context("Failed to open HTTP cache")?;
    if args.clear_cache {
        session.clear_cache().context("Failed to clear HTTP cache")?;
    }

    let results = pydocs_parser::run(args.mode, &session, &settings)
        .await
        .with_context(|| format!("Parser mode {} failed", args.mode.name()))?;

    if let Some(table) = results {
        control_output(&table, args.output, args.mode, &settings)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    log::info!("Parser started");

    let args = Args::parse();
    log::info!("Command line arguments: {:?}", args);

    match run(args).await {
        Ok(()) => {
            log::info!("Parser finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
