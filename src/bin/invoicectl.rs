//! invoicectl
//!
//! Command-line interface for inspecting and editing an invoice file store.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use invoicestore::config::SyncStrategy;
use invoicestore::model::Invoice;
use invoicestore::{Config, FileStore, InvoiceService, InvoiceStorage, Result, StoreError};
use tracing_subscriber::{fmt, EnvFilter};

/// invoicectl
#[derive(Parser, Debug)]
#[command(name = "invoicectl")]
#[command(about = "CLI for the line-oriented invoice store")]
#[command(version)]
struct Args {
    /// Backing file (one JSON invoice per line)
    #[arg(short, long, env = "INVOICESTORE_DB_PATH", default_value = "./invoices.jsonl")]
    db_path: PathBuf,

    /// fsync after every write
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every invoice, one JSON object per line
    List,

    /// Get an invoice by id
    Get {
        /// The invoice id
        id: u64,
    },

    /// Get an invoice by number
    Find {
        /// The invoice number
        number: String,
    },

    /// Add a new invoice from JSON
    Add {
        /// Invoice JSON (omit to use --file)
        json: Option<String>,

        /// Read the invoice JSON from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Replace a stored invoice with the given JSON (must carry its id)
    Update {
        /// Invoice JSON
        json: String,
    },

    /// Delete an invoice by id
    Del {
        /// The invoice id
        id: u64,
    },

    /// Delete every invoice
    Clear,

    /// Print the number of invoices
    Count,

    /// Print invoices issued within an inclusive date range
    Range {
        /// Earliest issued date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest issued date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Print record count and lines skipped as malformed
    Stats,
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,invoicestore=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("invoicectl v{}", invoicestore::VERSION);

    let sync_strategy = if args.sync {
        SyncStrategy::EveryWrite
    } else {
        SyncStrategy::OsBuffered
    };

    let config = Config::builder()
        .db_path(&args.db_path)
        .sync_strategy(sync_strategy)
        .build();

    let store = match FileStore::open(config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args.command, store) {
        tracing::error!("{}", e);
        std::process::exit(if e.is_not_found() { 2 } else { 1 });
    }
}

fn run(command: Commands, store: Arc<FileStore>) -> Result<()> {
    let service = InvoiceService::new(store.clone());

    match command {
        Commands::List => print_all(&service.get_all_invoices()?)?,
        Commands::Get { id } => match service.get_invoice_by_id(id)? {
            Some(invoice) => print_invoice(&invoice)?,
            None => tracing::warn!(id, "No invoice with this id"),
        },
        Commands::Find { number } => match service.get_invoice_by_number(&number)? {
            Some(invoice) => print_invoice(&invoice)?,
            None => tracing::warn!(%number, "No invoice with this number"),
        },
        Commands::Add { json, file } => {
            let json = match (json, file) {
                (Some(json), None) => json,
                (None, Some(path)) => fs::read_to_string(path)?,
                _ => {
                    return Err(StoreError::invalid_argument(
                        "Pass the invoice either inline or with --file.",
                    ))
                }
            };
            let invoice: Invoice = serde_json::from_str(&json)?;
            print_invoice(&service.add_invoice(invoice)?)?;
        }
        Commands::Update { json } => {
            let invoice: Invoice = serde_json::from_str(&json)?;
            print_invoice(&service.update_invoice(invoice)?)?;
        }
        Commands::Del { id } => service.delete_invoice_by_id(id)?,
        Commands::Clear => service.delete_all_invoices()?,
        Commands::Count => println!("{}", service.invoices_count()?),
        Commands::Range { from, to } => print_all(&store.get_by_issue_date(from, to)?)?,
        Commands::Stats => {
            let report = store.scan_report()?;
            println!(
                "{}",
                serde_json::json!({
                    "path": store.path().display().to_string(),
                    "records": report.records.len(),
                    "skippedLines": report.skipped,
                    "lastAssignedId": store.last_assigned_id(),
                })
            );
        }
    }

    Ok(())
}

fn print_invoice(invoice: &Invoice) -> Result<()> {
    println!("{}", serde_json::to_string(invoice)?);
    Ok(())
}

fn print_all(invoices: &[Invoice]) -> Result<()> {
    for invoice in invoices {
        print_invoice(invoice)?;
    }
    Ok(())
}
