//! Single-pass syntax scanner.
//!
//! [`scan_line`] classifies every character of one row's render text into a
//! [`Highlight`] class. The scanner is a small state machine with three
//! pieces of state: am I inside a string (and which quote opened it), am I
//! inside a block comment, and did a separator precede the current
//! character. Only the block-comment state crosses row boundaries; it enters
//! as the `starts_in_comment` argument and leaves as the returned flag, and
//! the document layer threads it from row to row.
//!
//! # Design choices
//!
//! - The scanner is a pure function over the render text. It never touches
//!   rows or documents, which keeps cross-row propagation the document's
//!   problem and makes every state transition testable on a bare `&str`.
//! - Rescanning following rows is driven by a forward worklist in the
//!   document layer, not by recursion from here.

use crate::syntax::{self, HighlightFlags, SyntaxDefinition};

// ---------------------------------------------------------------------------
// Highlight
// ---------------------------------------------------------------------------

/// The display class of one rendered character.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// Plain text.
    #[default]
    Normal,
    /// A to-end-of-line comment.
    Comment,
    /// A block comment, possibly spanning rows.
    BlockComment,
    /// A control-flow or declaration keyword.
    KeywordPrimary,
    /// A type-like keyword.
    KeywordSecondary,
    /// A string or character literal.
    String,
    /// A numeric literal.
    Number,
    /// A search match overlay.
    Match,
}

// ---------------------------------------------------------------------------
// scan_line
// ---------------------------------------------------------------------------

/// True if `text[at..]` starts with `pattern` (indices are char positions).
fn matches_at(text: &[char], at: usize, pattern: &str) -> bool {
    !pattern.is_empty()
        && pattern
            .chars()
            .enumerate()
            .all(|(i, pc)| text.get(at + i) == Some(&pc))
}

/// Classifies every character of one render line.
///
/// `starts_in_comment` seeds the block-comment state from the previous row.
/// Returns the per-character classes and whether the row ends still inside a
/// block comment.
#[must_use]
pub fn scan_line(
    render: &str,
    syntax: &SyntaxDefinition,
    starts_in_comment: bool,
) -> (Vec<Highlight>, bool) {
    let chars: Vec<char> = render.chars().collect();
    let len = chars.len();
    let mut hl = vec![Highlight::Normal; len];

    let numbers = syntax.flags.contains(HighlightFlags::NUMBERS);
    let strings = syntax.flags.contains(HighlightFlags::STRINGS);
    let block_delimited =
        !syntax.block_comment_start.is_empty() && !syntax.block_comment_end.is_empty();

    let mut prev_sep = true;
    let mut in_string: Option<char> = None;
    let mut in_comment = starts_in_comment;

    let mut i = 0;
    while i < len {
        let c = chars[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        // Line comment: swallows the rest of the row, so no state survives.
        if in_string.is_none()
            && !in_comment
            && matches_at(&chars, i, syntax.line_comment)
        {
            for slot in &mut hl[i..] {
                *slot = Highlight::Comment;
            }
            break;
        }

        // Block comments.
        if block_delimited && in_string.is_none() {
            if in_comment {
                if matches_at(&chars, i, syntax.block_comment_end) {
                    let end = (i + syntax.block_comment_end.chars().count()).min(len);
                    for slot in &mut hl[i..end] {
                        *slot = Highlight::BlockComment;
                    }
                    i = end;
                    in_comment = false;
                    prev_sep = true;
                } else {
                    hl[i] = Highlight::BlockComment;
                    i += 1;
                }
                continue;
            } else if matches_at(&chars, i, syntax.block_comment_start) {
                let end = (i + syntax.block_comment_start.chars().count()).min(len);
                for slot in &mut hl[i..end] {
                    *slot = Highlight::BlockComment;
                }
                i = end;
                in_comment = true;
                continue;
            }
        }

        // String and character literals.
        if strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                // A backslash escapes the next character, including the
                // closing quote.
                if c == '\\' && i + 1 < len {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == '"' || c == '\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        // Numeric literals: a digit after a separator or another digit, and
        // a decimal point only directly after a number.
        if numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == '.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        // Keywords: only at a token start, and only when the token ends at a
        // separator or the end of the row. First table entry wins.
        if prev_sep {
            let mut matched = false;
            for entry in syntax.keywords {
                let (word, class) = syntax::keyword_class(entry);
                let word_len = word.chars().count();
                if matches_at(&chars, i, word)
                    && chars
                        .get(i + word_len)
                        .is_none_or(|&next| syntax::is_separator(next))
                {
                    let end = (i + word_len).min(len);
                    for slot in &mut hl[i..end] {
                        *slot = class;
                    }
                    i = end;
                    matched = true;
                    break;
                }
            }
            if matched {
                prev_sep = false;
                continue;
            }
        }

        prev_sep = syntax::is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
