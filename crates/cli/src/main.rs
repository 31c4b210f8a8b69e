//! docshelf CLI: ingest, search and browse a document store.
//!
//! `docshelf [--data-dir DIR | --cache] [--json] COMMAND` runs a single
//! command against the store and exits. Exit code is 1 on any error.

mod commands;
mod format;
mod parse;

use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use docshelf_engine::{DocumentStore, IngestRequest, Ingestor, Upload};
use tracing::error;
use tracing_subscriber::EnvFilter;

use commands::{build_cli, DEFAULT_DATA_DIR};
use format::{format_document, format_error, format_hits, format_page, format_stats, OutputMode};
use parse::{matches_to_action, CliAction};

fn main() {
    init_logging();

    let matches = build_cli().get_matches();
    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    };

    let store = match open_store(&matches) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("(error) {:#}", e);
            process::exit(1);
        }
    };

    process::exit(run_action(action, &store, mode));
}

/// `RUST_LOG` if set, otherwise `info`; logs go to stderr.
fn init_logging() {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("info")
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_store(matches: &clap::ArgMatches) -> anyhow::Result<Arc<DocumentStore>> {
    if matches.get_flag("cache") {
        return Ok(DocumentStore::in_memory());
    }
    let path = matches
        .get_one::<String>("data-dir")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_DATA_DIR);
    DocumentStore::open(path).with_context(|| format!("failed to open store at '{}'", path))
}

fn read_upload(path: &Path) -> anyhow::Result<Upload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Upload::new(name, bytes))
}

fn run_action(action: CliAction, store: &Arc<DocumentStore>, mode: OutputMode) -> i32 {
    let result = match action {
        CliAction::Ingest {
            title,
            tags,
            content,
            file,
        } => {
            let file = match file.as_deref().map(read_upload).transpose() {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("(error) {:#}", e);
                    return 1;
                }
            };
            Ingestor::new(Arc::clone(store))
                .ingest(IngestRequest {
                    title,
                    tags,
                    content,
                    file,
                })
                .map(|doc| format_document(&doc, mode))
        }
        CliAction::Search { query } => store
            .search_hits(&query)
            .map(|hits| format_hits(&hits, mode)),
        CliAction::Get { id } => store
            .get_by_str(&id)
            .map(|doc| format_document(&doc, mode)),
        CliAction::List { offset, limit } => {
            let limit = limit.unwrap_or(store.config().catalog.page_size);
            store
                .list_page(offset, limit)
                .map(|page| format_page(&page, offset, mode))
        }
        CliAction::Stats => store.stats().map(|stats| format_stats(&stats, mode)),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            if !e.is_client_error() {
                error!(error = %e, "Command failed");
            }
            eprintln!("{}", format_error(&e, mode));
            1
        }
    }
}
