//! Row lexer
//!
//! Splits one table line into cells. The only structure inside a row is the cell
//! separator, so the token set is tiny: a pipe, an escaped pipe, a lone backslash and
//! everything else.

use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum RowToken {
    #[token("\\|")]
    EscapedPipe,

    #[token("|")]
    Pipe,

    #[token("\\")]
    Backslash,

    #[regex(r"[^|\\]+")]
    Text,
}

/// Split a row into trimmed cell texts with `\|` unescaped.
///
/// Returns `None` when the line doesn't start with a pipe.
pub fn split_row(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if !trimmed.starts_with('|') {
        return None;
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut lexer = RowToken::lexer(trimmed);
    let mut opened = false;

    while let Some(token) = lexer.next() {
        match token {
            Ok(RowToken::Pipe) => {
                if opened {
                    cells.push(current.trim().to_string());
                    current.clear();
                }
                opened = true;
            }
            Ok(RowToken::EscapedPipe) => current.push('|'),
            Ok(RowToken::Backslash) | Ok(RowToken::Text) => current.push_str(lexer.slice()),
            Err(()) => current.push_str(lexer.slice()),
        }
    }

    // A row may omit its closing pipe
    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }
    Some(cells)
}

/// Escape a cell for writing.
pub fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}
