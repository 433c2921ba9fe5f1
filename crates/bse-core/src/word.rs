//! Word-wise cursor motion.
//!
//! Characters fall into three classes: word characters, symbol runs, and
//! whitespace. A "word" is a maximal run of a single non-space class, so
//! `foo_bar(baz)` is the word `foo_bar`, the symbol `(`, the word `baz`,
//! and the symbol `)`.
//!
//! Motions are pure functions from a document and a position to a new
//! position. They never mutate anything, which keeps them trivially
//! testable and lets the dispatcher treat them like any other cursor math.

use crate::document::Document;
use crate::row::Row;
use crate::syntax;

// ---------------------------------------------------------------------------
// CharKind
// ---------------------------------------------------------------------------

/// Classification of one character for word motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharKind {
    /// Whitespace.
    Space,
    /// Separator punctuation.
    Symbol,
    /// Anything else: letters, digits, underscore.
    Word,
}

/// Classifies one character. Whitespace wins over the separator set.
#[must_use]
pub fn kind_of(c: char) -> CharKind {
    if c.is_whitespace() {
        CharKind::Space
    } else if syntax::is_separator(c) {
        CharKind::Symbol
    } else {
        CharKind::Word
    }
}

/// Classifies the character at `col`, treating out-of-range (the virtual
/// position past the row end) as a symbol.
fn kind_at(row: &Row, col: usize) -> CharKind {
    row.char_at(col).map_or(CharKind::Symbol, kind_of)
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// Moves forward to the start of the next word, crossing row boundaries.
/// Stops at the end of the last row.
#[must_use]
pub fn forward(doc: &Document, line: usize, col: usize) -> (usize, usize) {
    let (mut line, mut col) = (line, col);
    let mut prev: Option<CharKind> = None;

    while let Some(row) = doc.row(line) {
        if col >= row.len() {
            if line + 1 >= doc.len() {
                return (line, row.len());
            }
            line += 1;
            col = 0;
            continue;
        }
        let kind = kind_at(row, col);
        // Landing on a non-space char of a different class than the last
        // one seen, or at a fresh row start, is a word boundary.
        if kind != CharKind::Space {
            if let Some(p) = prev {
                if p != kind || col == 0 {
                    break;
                }
            }
        }
        prev = Some(kind);
        col += 1;
    }

    (line, col)
}

/// Moves backward to the start of the previous word, crossing row
/// boundaries. Stops at the start of the document.
///
/// The motion is asymmetric on purpose: starting on the first character of
/// a word jumps to the previous word's start (one class boundary back),
/// while starting mid-word jumps to this word's start (two boundaries back
/// from the lookbehind's point of view).
#[must_use]
pub fn backward(doc: &Document, line: usize, col: usize) -> (usize, usize) {
    if doc.is_empty() {
        return (line, col);
    }
    let (mut line, mut col) = (line.min(doc.len() - 1), col);
    let mut boundaries = 0;
    let mut started_on_first: Option<bool> = None;

    loop {
        let Some(row) = doc.row(line) else {
            return (line, col);
        };
        let kind = kind_at(row, col);
        if kind != CharKind::Space {
            let lookbehind = if col >= 1 {
                kind_at(row, col - 1)
            } else {
                CharKind::Space
            };
            if started_on_first.is_none() {
                started_on_first = Some(lookbehind != kind);
            }
            if lookbehind != kind {
                boundaries += 1;
            }
            let needed = if started_on_first == Some(true) { 2 } else { 1 };
            if boundaries == needed {
                break;
            }
        }
        if col == 0 {
            if line == 0 {
                return (0, 0);
            }
            line -= 1;
            col = doc.row(line).map_or(0, |r| r.len().saturating_sub(1));
        } else {
            col -= 1;
        }
    }

    (line, col)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines)
    }

    // -- kind_of ------------------------------------------------------------

    #[test]
    fn char_kinds() {
        assert_eq!(kind_of(' '), CharKind::Space);
        assert_eq!(kind_of('\t'), CharKind::Space);
        assert_eq!(kind_of('('), CharKind::Symbol);
        assert_eq!(kind_of(';'), CharKind::Symbol);
        assert_eq!(kind_of('a'), CharKind::Word);
        assert_eq!(kind_of('_'), CharKind::Word);
        assert_eq!(kind_of('7'), CharKind::Word);
    }

    // -- forward ------------------------------------------------------------

    #[test]
    fn forward_to_next_word() {
        let d = doc(&["foo bar"]);
        assert_eq!(forward(&d, 0, 0), (0, 4));
    }

    #[test]
    fn forward_stops_at_symbol_run() {
        let d = doc(&["foo(bar)"]);
        assert_eq!(forward(&d, 0, 0), (0, 3));
        assert_eq!(forward(&d, 0, 3), (0, 4));
        assert_eq!(forward(&d, 0, 4), (0, 7));
    }

    #[test]
    fn forward_crosses_row_boundary() {
        let d = doc(&["foo", "bar"]);
        assert_eq!(forward(&d, 0, 0), (1, 0));
    }

    #[test]
    fn forward_skips_blank_rows() {
        let d = doc(&["foo", "", "bar"]);
        assert_eq!(forward(&d, 0, 0), (2, 0));
    }

    #[test]
    fn forward_stops_at_document_end() {
        let d = doc(&["foo bar"]);
        assert_eq!(forward(&d, 0, 4), (0, 7));
        assert_eq!(forward(&d, 0, 7), (0, 7));
    }

    #[test]
    fn forward_on_empty_document() {
        let d = Document::new();
        assert_eq!(forward(&d, 0, 0), (0, 0));
    }

    // -- backward -----------------------------------------------------------

    #[test]
    fn backward_from_word_start_reaches_previous_word() {
        // From the 'b' of "bar", land on the 'f' of "foo".
        let d = doc(&["foo bar"]);
        assert_eq!(backward(&d, 0, 4), (0, 0));
    }

    #[test]
    fn backward_from_mid_word_reaches_own_start() {
        // From the 'a' of "bar", land on the 'b' of "bar".
        let d = doc(&["foo bar"]);
        assert_eq!(backward(&d, 0, 5), (0, 4));
    }

    #[test]
    fn backward_crosses_row_boundary() {
        let d = doc(&["foo", "bar"]);
        assert_eq!(backward(&d, 1, 0), (0, 0));
    }

    #[test]
    fn backward_stops_at_document_start() {
        let d = doc(&["foo"]);
        assert_eq!(backward(&d, 0, 0), (0, 0));
    }

    #[test]
    fn backward_over_symbols() {
        // From 'b' of "baz" in "foo(baz", stepping back lands on '('.
        let d = doc(&["foo(baz"]);
        assert_eq!(backward(&d, 0, 4), (0, 3));
    }

    #[test]
    fn backward_on_empty_document() {
        let d = Document::new();
        assert_eq!(backward(&d, 0, 0), (0, 0));
    }
}
