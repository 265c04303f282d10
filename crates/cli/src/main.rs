use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use outlay_import::{import_batch, ColumnAliases, UploadedFile};

#[derive(Parser, Debug)]
#[command(
    name = "outlay",
    version,
    about = "Normalize bank and card CSV exports into canonical transactions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse CSV exports and print the normalized transactions as JSON
    Parse {
        /// Files to normalize, processed in the order given
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// TOML file with extra column aliases, appended after the built-ins
        #[arg(long)]
        aliases: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Parse {
            files,
            aliases,
            pretty,
        } => run_parse(&files, aliases.as_deref(), pretty),
    }
}

fn run_parse(paths: &[PathBuf], aliases: Option<&Path>, pretty: bool) -> Result<ExitCode> {
    let aliases = match aliases {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ColumnAliases::from_toml(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => ColumnAliases::default(),
    };

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let data =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        files.push(UploadedFile {
            name,
            content_type: content_type_for(path),
            data,
        });
    }

    let batch = import_batch(&files, &aliases);
    tracing::info!(
        transactions = batch.transactions.len(),
        errors = batch.errors.len(),
        "batch complete"
    );

    let count = batch.transactions.len();
    let failed = count == 0 && !batch.errors.is_empty();
    let body = serde_json::json!({
        "transactions": batch.transactions,
        "count": count,
        "errors": batch.errors,
    });
    let rendered = if pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    println!("{rendered}");

    // Nothing usable at all mirrors the original's failure response.
    if failed {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Declared content type from the file extension; unknown extensions are
/// left untyped so the batch driver's own classifier decides.
fn content_type_for(path: &Path) -> Option<String> {
    let ext = path.extension().and_then(|e| e.to_str())?.to_lowercase();
    match ext.as_str() {
        "csv" => Some("text/csv".to_string()),
        "txt" => Some("text/plain".to_string()),
        _ => None,
    }
}
