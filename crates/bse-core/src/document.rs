//! The document: an ordered row store with file identity.
//!
//! A [`Document`] owns the rows, the dirty counter, the optional filename,
//! and the detected filetype. Every mutating operation re-derives the
//! affected rows' render and highlight state before returning, so callers
//! never observe a row whose derived views disagree with its raw text.
//!
//! # Design choices
//!
//! - Cross-row highlight propagation runs as a forward worklist from the
//!   edited row: rescan, and keep going while a row's ends-in-comment flag
//!   changes. Bounded by the row count, no recursion.
//! - Out-of-range positions are clamped or ignored, never panic. The
//!   dispatcher clamps the cursor separately; the document does not trust
//!   it to.
//! - The dirty counter counts mutations since the last load or save. The
//!   status line only cares whether it is zero, but the count is free to
//!   keep.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::highlight::{self, Highlight};
use crate::row::Row;
use crate::syntax::{self, SyntaxDefinition};

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An in-memory text document.
#[derive(Debug, Default)]
pub struct Document {
    rows: Vec<Row>,
    dirty: u64,
    filename: Option<PathBuf>,
    syntax: Option<&'static SyntaxDefinition>,
}

impl Document {
    /// An empty, unnamed document.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: Vec::new(),
            dirty: 0,
            filename: None,
            syntax: None,
        }
    }

    /// Builds a document from an ordered sequence of lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = Self::new();
        for line in lines {
            doc.rows.push(Row::new(line.as_ref()));
        }
        doc.rehighlight_from(0);
        doc
    }

    /// Builds a document from full file text. Line terminators (`\n` or
    /// `\r\n`) are stripped; they are an encoding detail, not content.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines().map(|line| line.trim_end_matches('\r')))
    }

    /// Loads a document from disk and detects its filetype.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut doc = Self::from_text(&text);
        doc.set_filename(path);
        doc.dirty = 0;
        Ok(doc)
    }

    // -- Accessors ----------------------------------------------------------

    /// The row at `index`, if in range.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// All rows in order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the document has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mutations since the last load or save.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> u64 {
        self.dirty
    }

    /// True if there are unsaved changes.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// The file this document is bound to, if any.
    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// The detected filetype, if any.
    #[inline]
    #[must_use]
    pub const fn syntax(&self) -> Option<&'static SyntaxDefinition> {
        self.syntax
    }

    /// Serializes the document back to file text: every row's raw
    /// characters followed by a newline.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(row.chars());
            out.push('\n');
        }
        out
    }

    // -- File identity ------------------------------------------------------

    /// Binds the document to a path, re-detects the filetype, and rescans
    /// all highlighting under the new filetype.
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.syntax = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(syntax::detect);
        self.filename = Some(path);
        self.rehighlight_from(0);
    }

    /// Forces a filetype (or none), rescanning all highlighting.
    pub fn set_syntax(&mut self, syntax: Option<&'static SyntaxDefinition>) {
        self.syntax = syntax;
        self.rehighlight_from(0);
    }

    /// Writes the document to its bound path. Returns the byte count
    /// written and clears the dirty counter.
    pub fn save(&mut self) -> Result<usize, Error> {
        let Some(path) = self.filename.clone() else {
            return Err(Error::NoFilename);
        };
        let text = self.serialize();
        fs::write(path, &text)?;
        self.dirty = 0;
        Ok(text.len())
    }

    /// Binds the document to `path`, then saves.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<usize, Error> {
        self.set_filename(path.into());
        self.save()
    }

    // -- Row-level edits ----------------------------------------------------

    /// Inserts a new row at `at` (clamped to `[0, len]`) with `content`.
    pub fn insert_row(&mut self, at: usize, content: &str) {
        let at = at.min(self.rows.len());
        self.rows.insert(at, Row::new(content));
        self.dirty += 1;
        self.rehighlight_from(at);
    }

    /// Deletes the row at `at`. No-op when out of range.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty += 1;
        self.rehighlight_from(at);
    }

    /// Appends `s` to the end of row `at`. No-op when out of range.
    pub fn append_str(&mut self, at: usize, s: &str) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        row.append_str(s);
        self.dirty += 1;
        self.rehighlight_from(at);
    }

    // -- Char-level edits ---------------------------------------------------

    /// Inserts `c` into row `line` at char index `col` (clamped to the row
    /// length). No-op when `line` is out of range.
    pub fn insert_char(&mut self, line: usize, col: usize, c: char) {
        let Some(row) = self.rows.get_mut(line) else {
            return;
        };
        row.insert_char(col, c);
        self.dirty += 1;
        self.rehighlight_from(line);
    }

    /// Deletes the character at char index `col` of row `line`. No-op when
    /// either coordinate is out of range.
    pub fn delete_char(&mut self, line: usize, col: usize) {
        let Some(row) = self.rows.get_mut(line) else {
            return;
        };
        if !row.delete_char(col) {
            return;
        }
        self.dirty += 1;
        self.rehighlight_from(line);
    }

    // -- Structural edits ---------------------------------------------------

    /// Splits row `line` at char index `col`.
    ///
    /// At column 0 an empty row is inserted above, leaving the current row's
    /// text intact one index further down. Otherwise the suffix from `col`
    /// moves to a new row below. `line == len` appends an empty row.
    pub fn split_row(&mut self, line: usize, col: usize) {
        if col == 0 || line >= self.rows.len() {
            self.insert_row(line, "");
            return;
        }
        let suffix = self.rows[line].split_off(col);
        self.insert_row(line + 1, &suffix);
        self.rehighlight_from(line);
    }

    /// Joins row `line` with the row below, separated by a single space.
    /// No-op when there is no row below.
    pub fn join_with_next(&mut self, line: usize) {
        if line + 1 >= self.rows.len() {
            return;
        }
        let next = self.rows[line + 1].chars().to_string();
        self.append_str(line, " ");
        self.append_str(line, &next);
        self.delete_row(line + 1);
    }

    // -- Highlighting -------------------------------------------------------

    /// Rescans highlighting forward from `start` until a row's
    /// ends-in-comment flag stops changing.
    pub(crate) fn rehighlight_from(&mut self, start: usize) {
        let mut index = start;
        while index < self.rows.len() {
            let changed = self.rescan_row(index);
            // The row just past the edit point may have been scanned against
            // a predecessor that no longer exists, so rescan it even when
            // this row's flag held steady.
            if !changed && index > start {
                break;
            }
            index += 1;
        }
    }

    /// Rescans one row. Returns whether its ends-in-comment flag changed.
    fn rescan_row(&mut self, index: usize) -> bool {
        let seed = index > 0 && self.rows[index - 1].open_comment();
        let (hl, ends_open) = match self.syntax {
            Some(syntax) => highlight::scan_line(self.rows[index].render(), syntax, seed),
            None => (vec![Highlight::Normal; self.rows[index].render_len()], false),
        };
        let row = &mut self.rows[index];
        let changed = row.open_comment() != ends_open;
        row.set_highlight(hl, ends_open);
        changed
    }

    /// Overlays the match class on a span of row `line`'s highlighting,
    /// returning the previous classes so the caller can restore them.
    pub(crate) fn overlay_match(
        &mut self,
        line: usize,
        from: usize,
        len: usize,
    ) -> Option<Vec<Highlight>> {
        let row = self.rows.get_mut(line)?;
        let saved = row.highlight().to_vec();
        row.overlay_highlight(from, len, Highlight::Match);
        Some(saved)
    }

    /// Restores a highlight vector saved by [`Self::overlay_match`].
    pub(crate) fn restore_highlight(&mut self, line: usize, hl: Vec<Highlight>) {
        if let Some(row) = self.rows.get_mut(line) {
            row.restore_highlight(hl);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
