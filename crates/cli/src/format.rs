//! Result → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): one document per block, listings with a preview
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use docshelf_core::{Document, Error};
use docshelf_engine::{Page, StoreStats};
use docshelf_search::SearchHit;
use serde::Serialize;
use std::sync::Arc;

/// Characters of content shown in listings
pub const PREVIEW_CHARS: usize = 100;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

#[derive(Serialize)]
struct HitView<'a> {
    #[serde(flatten)]
    document: &'a Document,
    score: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageView<'a> {
    items: Vec<&'a Document>,
    has_more: bool,
    offset: usize,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

/// Format a single document in full.
pub fn format_document(doc: &Document, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(doc),
        OutputMode::Human => {
            let mut out = String::new();
            out.push_str(&format!("id:      {}\n", doc.id()));
            out.push_str(&format!("title:   {}\n", doc.title()));
            out.push_str(&format!("format:  {}\n", doc.format()));
            out.push_str(&format!("tags:    {}\n", join_tags(doc)));
            out.push_str(&format!("created: {}\n", doc.created_at().to_rfc3339()));
            if let Some(source) = doc.source_ref() {
                out.push_str(&format!("source:  {}\n", source));
            }
            if !doc.content().is_empty() {
                out.push('\n');
                out.push_str(doc.content());
            }
            out.trim_end().to_string()
        }
    }
}

/// Format ranked search results.
pub fn format_hits(hits: &[SearchHit], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let views: Vec<HitView<'_>> = hits
                .iter()
                .map(|h| HitView {
                    document: &h.document,
                    score: h.score,
                })
                .collect();
            to_json(&views)
        }
        OutputMode::Human => {
            if hits.is_empty() {
                return "(no results)".to_string();
            }
            hits.iter()
                .enumerate()
                .map(|(i, h)| {
                    format!(
                        "{}) {} (score {:.3})",
                        i + 1,
                        summary_line(&h.document),
                        h.score
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

/// Format one catalog page.
pub fn format_page(page: &Page<Arc<Document>>, offset: usize, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(&PageView {
            items: page.items.iter().map(|d| d.as_ref()).collect(),
            has_more: page.has_more,
            offset,
        }),
        OutputMode::Human => {
            if page.items.is_empty() {
                return "(empty page)".to_string();
            }
            let mut lines: Vec<String> = page
                .items
                .iter()
                .enumerate()
                .map(|(i, d)| format!("{}) {}", offset + i + 1, summary_line(d)))
                .collect();
            if page.has_more {
                lines.push(format!(
                    "(more: --offset {})",
                    offset + page.items.len()
                ));
            }
            lines.join("\n")
        }
    }
}

/// Format store counters.
pub fn format_stats(stats: &StoreStats, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(&serde_json::json!({
            "documents": stats.documents,
            "terms": stats.terms,
            "watermark": stats.watermark,
            "logBytes": stats.log_bytes,
            "durability": stats.durability.as_str(),
        })),
        OutputMode::Human => format!(
            "documents:  {}\nterms:      {}\nwatermark:  {}\nlog bytes:  {}\ndurability: {}",
            stats.documents, stats.terms, stats.watermark, stats.log_bytes, stats.durability
        ),
    }
}

/// Format an error.
///
/// Client errors are shown as they are; anything else is reported as a
/// generic failure (details go to the log).
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    let message = match err {
        Error::NotFound { .. } => "no such document".to_string(),
        e if e.is_client_error() => e.to_string(),
        _ => "request failed".to_string(),
    };
    match mode {
        OutputMode::Json => to_json(&serde_json::json!({ "error": message })),
        OutputMode::Human => format!("(error) {}", message),
    }
}

fn summary_line(doc: &Document) -> String {
    let preview = doc
        .preview(PREVIEW_CHARS)
        .replace(|c: char| c == '\n' || c == '\r', " ");
    let mut line = format!("{}  {}", doc.id(), doc.title());
    if !doc.tags().is_empty() {
        line.push_str(&format!("  [{}]", join_tags(doc)));
    }
    if !preview.trim().is_empty() {
        line.push_str(&format!("  {}", preview.trim()));
    }
    line
}

fn join_tags(doc: &Document) -> String {
    doc.tags().iter().collect::<Vec<_>>().join(", ")
}
