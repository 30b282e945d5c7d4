use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facewatch_session::WatchConfig;
use facewatch_store::{AuditLog, LogRecord, CSV_HEADER, DEFAULT_TAIL_LINES};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "facewatch", about = "Facewatch recognition audit CLI")]
struct Cli {
    /// Config file (default: facewatch.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Audit log path (overrides the config)
    #[arg(short, long, global = true)]
    log: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the most recent audit log lines
    Tail {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value_t = DEFAULT_TAIL_LINES)]
        lines: usize,
        /// Emit data rows as JSON objects instead of raw CSV
        #[arg(long)]
        json: bool,
    },
    /// Export the full audit log
    Export {
        /// Destination file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = WatchConfig::load(cli.config.as_deref())?;
    let log_path = cli.log.unwrap_or(config.log_path);

    // Initialize-if-missing before any read, the same bootstrap a watch
    // host performs when it opens the log.
    let log = AuditLog::open(&log_path)
        .with_context(|| format!("opening audit log {}", log_path.display()))?;

    match cli.command {
        Commands::Tail { lines, json } => {
            for line in log.tail(lines)? {
                if json {
                    if line == CSV_HEADER {
                        continue;
                    }
                    let record = LogRecord::parse_line(&line)?;
                    println!("{}", serde_json::to_string(&record)?);
                } else {
                    println!("{line}");
                }
            }
        }
        Commands::Export { output } => {
            let bytes = log.export()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), bytes = bytes.len(), "audit log exported");
                }
                None => std::io::stdout().write_all(&bytes)?,
            }
        }
    }

    Ok(())
}
