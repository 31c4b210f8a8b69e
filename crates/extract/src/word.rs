//! DOCX extractor
//!
//! The package is parsed with `docx-rs` and the document tree is walked in
//! order: body paragraphs, table cells, and hyperlinked runs each
//! contribute their text. Every paragraph becomes one line; tabs and line
//! breaks inside a run are preserved.

use crate::error::ExtractError;
use crate::extractor::FormatExtractor;
use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use std::io::Cursor;

/// Cap on the declared uncompressed size of the whole package (zip bombs)
pub const MAX_PACKAGE_BYTES: u64 = 64 * 1024 * 1024;

/// Extractor for DOCX packages
#[derive(Debug, Clone, Copy, Default)]
pub struct WordExtractor;

impl FormatExtractor for WordExtractor {
    fn try_extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        check_package_size(bytes)?;
        let docx = read_docx(bytes).map_err(|e| ExtractError::Package(format!("{:?}", e)))?;

        let mut lines = ParagraphLines::default();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(para) => lines.paragraph(para),
                DocumentChild::Table(table) => lines.table(table),
                _ => {}
            }
        }
        Ok(lines.into_text())
    }

    fn name(&self) -> &str {
        "word"
    }
}

/// Refuse packages whose entries claim to inflate past `MAX_PACKAGE_BYTES`
fn check_package_size(bytes: &[u8]) -> Result<(), ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut total = 0u64;
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        total = total.saturating_add(entry.size());
        if total > MAX_PACKAGE_BYTES {
            return Err(ExtractError::PartTooLarge {
                part: entry.name().to_string(),
                max: MAX_PACKAGE_BYTES,
            });
        }
    }
    Ok(())
}

/// Paragraph texts in document order
#[derive(Debug, Default)]
struct ParagraphLines {
    lines: Vec<String>,
}

impl ParagraphLines {
    fn paragraph(&mut self, para: &Paragraph) {
        let mut text = String::new();
        push_paragraph_children(&para.children, &mut text);
        self.lines.push(text);
    }

    fn table(&mut self, table: &Table) {
        for row in &table.rows {
            let TableChild::TableRow(row) = row;
            for cell in &row.cells {
                let TableRowChild::TableCell(cell) = cell;
                for content in &cell.children {
                    match content {
                        TableCellContent::Paragraph(para) => self.paragraph(para),
                        TableCellContent::Table(nested) => self.table(nested),
                        _ => {}
                    }
                }
            }
        }
    }

    fn into_text(self) -> String {
        self.lines.join("\n")
    }
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
