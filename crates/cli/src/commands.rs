//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Default data directory when `--data-dir` is not given
pub const DEFAULT_DATA_DIR: &str = ".docshelf";

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("docshelf")
        .about("Store, extract and search documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Data directory (default: .docshelf)")
                .global(true),
        )
        .arg(
            Arg::new("cache")
                .long("cache")
                .help("Ephemeral in-memory store, no disk")
                .action(ArgAction::SetTrue)
                .conflicts_with("data-dir")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_ingest())
        .subcommand(build_search())
        .subcommand(build_get())
        .subcommand(build_list())
        .subcommand(build_stats())
}

fn build_ingest() -> Command {
    Command::new("ingest")
        .about("Add a document, optionally from a file")
        .arg(Arg::new("title").long("title").help("Document title"))
        .arg(
            Arg::new("tags")
                .long("tags")
                .help("Comma-separated tags, e.g. finance,q3"),
        )
        .arg(
            Arg::new("content")
                .long("content")
                .help("Document text (takes precedence over extracted text)"),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .help("File to upload (.txt, .md, .pdf, .docx, ...)"),
        )
}

fn build_search() -> Command {
    Command::new("search")
        .about("Ranked full-text search")
        .arg(
            Arg::new("query")
                .help("Search terms")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn build_get() -> Command {
    Command::new("get")
        .about("Show one document")
        .arg(Arg::new("id").required(true).help("Document identifier"))
}

fn build_list() -> Command {
    Command::new("list")
        .about("List documents in insertion order, one page at a time")
        .arg(
            Arg::new("offset")
                .long("offset")
                .help("Documents to skip (default: 0)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .help("Page size (default: catalog.page_size)")
                .value_parser(clap::value_parser!(usize)),
        )
}

fn build_stats() -> Command {
    Command::new("stats").about("Document count, index size and commit watermark")
}
