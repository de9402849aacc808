//! Namespace file grammar
//!
//!     A namespace file is free-form text followed by one markdown table:
//!
//!         # Artists
//!
//!         Anything here is kept as is.
//!
//!         | Raw | Name | Description | Links | Master |
//!         | --- | ---- | ----------- | ----- | ------ |
//!         | john doe | John | A **prolific** artist | [Pixiv](https://…) | |
//!         | jd | | | | artist:john doe |
//!
//!     The text before the header row is the file's prefix and is written back verbatim.
//!     Data rows have four or five cells; the fifth, when present and non-empty, names the
//!     master of an alias as `namespace:raw`. Cells are inline markdown (see
//!     [inline](crate::inline)) with `|` escaped as `\|`.
//!
//!     Parsing is all or nothing: the first malformed line fails the whole file.

pub mod lexer;

use crate::ast::Document;
use crate::error::ParseError;
use crate::inline::parse_inline;
use crate::namespace::{split_qualified, Namespace, RawTag};
use lexer::{escape_cell, split_row};

/// Column titles written on save.
pub const HEADER: [&str; 5] = ["Raw", "Name", "Description", "Links", "Master"];

/// One parsed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based source line.
    pub line: usize,
    pub raw: RawTag,
    pub name: Document,
    pub intro: Document,
    pub links: Document,
    pub master: Option<(Namespace, RawTag)>,
}

/// Parsed namespace file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceFile {
    pub prefix: String,
    pub rows: Vec<Row>,
}

enum State {
    Prefix,
    Delimiter,
    Rows,
    Trailer,
}

impl NamespaceFile {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let mut file = NamespaceFile::default();
        let mut state = State::Prefix;

        for (index, line) in source.lines().enumerate() {
            let number = index + 1;
            match state {
                State::Prefix => {
                    if split_row(line).is_some() {
                        state = State::Delimiter;
                    } else {
                        file.prefix.push_str(line);
                        file.prefix.push('\n');
                    }
                }
                State::Delimiter => {
                    let cells = split_row(line).unwrap_or_default();
                    if cells.is_empty() || !cells.iter().all(|c| is_delimiter_cell(c)) {
                        return Err(ParseError::new(
                            number,
                            "expected table delimiter row after header",
                        ));
                    }
                    state = State::Rows;
                }
                State::Rows => {
                    if line.trim().is_empty() {
                        state = State::Trailer;
                        continue;
                    }
                    let cells = split_row(line)
                        .ok_or_else(|| ParseError::new(number, "expected a table row"))?;
                    file.rows.push(parse_row(number, &cells)?);
                }
                State::Trailer => {
                    if !line.trim().is_empty() {
                        return Err(ParseError::new(number, "unexpected text after table"));
                    }
                }
            }
        }

        if matches!(state, State::Delimiter) {
            return Err(ParseError::new(
                source.lines().count(),
                "table header without delimiter row",
            ));
        }
        Ok(file)
    }
}

fn is_delimiter_cell(cell: &str) -> bool {
    let inner = cell.trim().trim_start_matches(':').trim_end_matches(':');
    !inner.is_empty() && inner.chars().all(|c| c == '-')
}

fn parse_row(line: usize, cells: &[String]) -> Result<Row, ParseError> {
    if cells.len() < 4 || cells.len() > 5 {
        return Err(ParseError::new(
            line,
            format!("expected 4 or 5 cells, found {}", cells.len()),
        ));
    }

    let raw = RawTag::parse(&cells[0]).map_err(|e| ParseError::new(line, e.to_string()))?;
    let master = match cells.get(4).map(|c| c.trim()).filter(|c| !c.is_empty()) {
        Some(text) => Some(parse_master(line, text)?),
        None => None,
    };

    Ok(Row {
        line,
        raw,
        name: parse_inline(&cells[1]),
        intro: parse_inline(&cells[2]),
        links: parse_inline(&cells[3]),
        master,
    })
}

fn parse_master(line: usize, text: &str) -> Result<(Namespace, RawTag), ParseError> {
    match split_qualified(text) {
        (Some(ns), raw) if ns.is_persisted() => {
            let raw = RawTag::parse(raw).map_err(|e| ParseError::new(line, e.to_string()))?;
            Ok((ns, raw))
        }
        _ => Err(ParseError::new(
            line,
            format!("master {:?} must be written as namespace:raw", text),
        )),
    }
}

/// Write a namespace file from its prefix and already serialized cells.
///
/// Each row is `[raw, name, intro, links, master]`; cells are escaped here.
pub fn write_table<I>(prefix: &str, rows: I) -> String
where
    I: IntoIterator<Item = [String; 5]>,
{
    let mut out = String::from(prefix);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("| {} |\n", HEADER.join(" | ")));
    let delimiter: Vec<String> = HEADER.iter().map(|h| "-".repeat(h.len())).collect();
    out.push_str(&format!("| {} |\n", delimiter.join(" | ")));

    for cells in rows {
        let escaped: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
        out.push_str(&format!("| {} |\n", escaped.join(" | ")));
    }
    out
}
