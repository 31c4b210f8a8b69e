//! ArgMatches → CliAction conversion.

use clap::ArgMatches;
use std::path::PathBuf;

/// The result of parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Add a document
    Ingest {
        title: Option<String>,
        tags: Option<String>,
        content: Option<String>,
        file: Option<PathBuf>,
    },
    /// Ranked search; the words are joined with spaces
    Search { query: String },
    /// One document by id
    Get { id: String },
    /// A catalog page; `limit` falls back to the configured page size
    List {
        offset: usize,
        limit: Option<usize>,
    },
    /// Store counters
    Stats,
}

/// Translate parsed arguments into an action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| "no command given".to_string())?;

    let string = |id: &str| sub.get_one::<String>(id).cloned();

    match name {
        "ingest" => Ok(CliAction::Ingest {
            title: string("title"),
            tags: string("tags"),
            content: string("content"),
            file: string("file").map(PathBuf::from),
        }),
        "search" => {
            let query = sub
                .get_many::<String>("query")
                .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
                .unwrap_or_default();
            Ok(CliAction::Search { query })
        }
        "get" => string("id")
            .map(|id| CliAction::Get { id })
            .ok_or_else(|| "get requires an id".to_string()),
        "list" => Ok(CliAction::List {
            offset: sub.get_one::<usize>("offset").copied().unwrap_or(0),
            limit: sub.get_one::<usize>("limit").copied(),
        }),
        "stats" => Ok(CliAction::Stats),
        other => Err(format!("unknown command '{}'", other)),
    }
}
