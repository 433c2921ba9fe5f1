//! A single line of text and its derived display state.
//!
//! Each [`Row`] keeps the raw characters the user typed plus two derived
//! views: the render text (tabs expanded to spaces) and one [`Highlight`]
//! class per render character. The raw text is the source of truth; the
//! derived views are recomputed after every mutation, never patched in
//! place.
//!
//! # Design choices
//!
//! - All public positions are char indices, not byte offsets. The raw and
//!   render buffers are `String`s, so a private char-to-byte conversion
//!   guards every splice.
//! - A row does not know its own index. Its position in the document's
//!   `Vec<Row>` is the index, so renumbering on insert and delete cannot go
//!   stale.
//! - Highlighting needs cross-row state (block comments), so the document
//!   layer owns the scan. The row only stores the result and the
//!   ends-in-open-comment flag.

use crate::highlight::Highlight;

/// Width of one tab stop in render columns.
pub const TAB_STOP: usize = 4;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// The raw text, exactly as typed.
    chars: String,
    /// The display text: tabs expanded to spaces at [`TAB_STOP`] boundaries.
    render: String,
    /// One highlight class per render character.
    hl: Vec<Highlight>,
    /// True if this row ends inside an unclosed block comment.
    open_comment: bool,
}

/// Byte offset of char index `at` in `s`, or `s.len()` when past the end.
fn char_to_byte(s: &str, at: usize) -> usize {
    s.char_indices().nth(at).map_or(s.len(), |(idx, _)| idx)
}

impl Row {
    /// Builds a row from raw text and derives its render view. Highlighting
    /// starts out all-normal until the document scans it.
    #[must_use]
    pub fn new(content: &str) -> Self {
        let mut row = Self {
            chars: content.to_string(),
            render: String::new(),
            hl: Vec::new(),
            open_comment: false,
        };
        row.update_render();
        row
    }

    // -- Accessors ----------------------------------------------------------

    /// The raw text.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &str {
        &self.chars
    }

    /// The display text with tabs expanded.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &str {
        &self.render
    }

    /// Highlight classes, one per render character.
    #[inline]
    #[must_use]
    pub fn highlight(&self) -> &[Highlight] {
        &self.hl
    }

    /// True if this row leaves a block comment open for the next row.
    #[inline]
    #[must_use]
    pub const fn open_comment(&self) -> bool {
        self.open_comment
    }

    /// Number of raw characters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.chars().count()
    }

    /// Number of render characters.
    #[inline]
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.render.chars().count()
    }

    /// True if the row holds no characters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The raw character at char index `at`, if in range.
    #[must_use]
    pub fn char_at(&self, at: usize) -> Option<char> {
        self.chars.chars().nth(at)
    }

    // -- Mutation (document layer re-scans highlighting afterwards) ---------

    /// Inserts `c` at char index `at`, clamped to `[0, len]`.
    pub(crate) fn insert_char(&mut self, at: usize, c: char) {
        let at = at.min(self.len());
        self.chars.insert(char_to_byte(&self.chars, at), c);
        self.update_render();
    }

    /// Removes the character at char index `at`. No-op when out of range.
    /// Returns whether a character was removed.
    pub(crate) fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.len() {
            return false;
        }
        self.chars.remove(char_to_byte(&self.chars, at));
        self.update_render();
        true
    }

    /// Appends `s` to the end of the row.
    pub(crate) fn append_str(&mut self, s: &str) {
        self.chars.push_str(s);
        self.update_render();
    }

    /// Truncates the row at char index `at` and returns the removed suffix.
    pub(crate) fn split_off(&mut self, at: usize) -> String {
        let suffix = self.chars.split_off(char_to_byte(&self.chars, at));
        self.update_render();
        suffix
    }

    /// Replaces the highlight state after a scan.
    pub(crate) fn set_highlight(&mut self, hl: Vec<Highlight>, open_comment: bool) {
        debug_assert_eq!(hl.len(), self.render_len());
        self.hl = hl;
        self.open_comment = open_comment;
    }

    /// Overwrites a span of highlight classes (search match overlay).
    pub(crate) fn overlay_highlight(&mut self, from: usize, len: usize, class: Highlight) {
        let end = (from + len).min(self.hl.len());
        for slot in self.hl.iter_mut().take(end).skip(from) {
            *slot = class;
        }
    }

    /// Restores a previously saved highlight vector (search overlay undo).
    pub(crate) fn restore_highlight(&mut self, hl: Vec<Highlight>) {
        self.hl = hl;
    }

    /// Re-derives the render text from the raw text and resets highlighting
    /// to all-normal at the new length.
    fn update_render(&mut self) {
        self.render.clear();
        let mut width = 0;
        for c in self.chars.chars() {
            if c == '\t' {
                self.render.push(' ');
                width += 1;
                while width % TAB_STOP != 0 {
                    self.render.push(' ');
                    width += 1;
                }
            } else {
                self.render.push(c);
                width += 1;
            }
        }
        self.hl = vec![Highlight::Normal; self.render_len()];
        self.open_comment = false;
    }

    // -- Coordinate mapping -------------------------------------------------

    /// Maps a raw char index to its render column.
    ///
    /// Walks the raw text up to `cx`; a tab jumps to the next multiple of
    /// [`TAB_STOP`], everything else advances one column.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for c in self.chars.chars().take(cx) {
            if c == '\t' {
                rx += TAB_STOP - (rx % TAB_STOP);
            } else {
                rx += 1;
            }
        }
        rx
    }

    /// Maps a render column back to a raw char index.
    ///
    /// Walks forward accumulating render width; returns the index of the
    /// first raw character whose span covers or passes `rx`. A column past
    /// the end maps to the row length.
    #[must_use]
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, c) in self.chars.chars().enumerate() {
            if c == '\t' {
                cur_rx += TAB_STOP - (cur_rx % TAB_STOP);
            } else {
                cur_rx += 1;
            }
            if cur_rx > rx {
                return cx;
            }
        }
        self.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- Render derivation --------------------------------------------------

    #[test]
    fn plain_text_renders_verbatim() {
        let row = Row::new("hello");
        assert_eq!(row.render(), "hello");
        assert_eq!(row.len(), 5);
        assert_eq!(row.render_len(), 5);
    }

    #[test]
    fn leading_tab_expands_to_full_stop() {
        let row = Row::new("\tx");
        assert_eq!(row.render(), "    x");
    }

    #[test]
    fn tab_advances_to_next_stop() {
        // Tab after one char pads to the 4-column boundary.
        let row = Row::new("a\tb");
        assert_eq!(row.render(), "a   b");
        // Tab exactly at a boundary produces a full stop.
        let row = Row::new("abcd\te");
        assert_eq!(row.render(), "abcd    e");
    }

    #[test]
    fn highlight_matches_render_length() {
        let row = Row::new("a\tb");
        assert_eq!(row.highlight().len(), row.render_len());
    }

    // -- Mutation -----------------------------------------------------------

    #[test]
    fn insert_char_at_position() {
        let mut row = Row::new("ac");
        row.insert_char(1, 'b');
        assert_eq!(row.chars(), "abc");
        assert_eq!(row.render(), "abc");
    }

    #[test]
    fn insert_char_clamps_past_end() {
        let mut row = Row::new("ab");
        row.insert_char(99, 'c');
        assert_eq!(row.chars(), "abc");
    }

    #[test]
    fn delete_char_in_range() {
        let mut row = Row::new("abc");
        assert!(row.delete_char(1));
        assert_eq!(row.chars(), "ac");
    }

    #[test]
    fn delete_char_out_of_range_is_noop() {
        let mut row = Row::new("abc");
        assert!(!row.delete_char(3));
        assert_eq!(row.chars(), "abc");
    }

    #[test]
    fn split_off_returns_suffix() {
        let mut row = Row::new("hello world");
        let suffix = row.split_off(5);
        assert_eq!(row.chars(), "hello");
        assert_eq!(suffix, " world");
    }

    #[test]
    fn append_str_rederives_render() {
        let mut row = Row::new("a");
        row.append_str("\tb");
        assert_eq!(row.chars(), "a\tb");
        assert_eq!(row.render(), "a   b");
    }

    #[test]
    fn insert_then_delete_restores_row() {
        for at in 0..=3 {
            let mut row = Row::new("a\tc");
            row.insert_char(at, 'x');
            assert!(row.delete_char(at));
            assert_eq!(row.chars(), "a\tc");
            assert_eq!(row.render(), "a   c");
        }
    }

    #[test]
    fn multibyte_chars_splice_on_char_indices() {
        let mut row = Row::new("héllo");
        row.insert_char(2, 'x');
        assert_eq!(row.chars(), "héxllo");
        assert!(row.delete_char(1));
        assert_eq!(row.chars(), "hxllo");
    }

    // -- Coordinate mapping -------------------------------------------------

    #[test]
    fn cx_to_rx_without_tabs_is_identity() {
        let row = Row::new("hello");
        for cx in 0..=5 {
            assert_eq!(row.cx_to_rx(cx), cx);
        }
    }

    #[test]
    fn cx_to_rx_across_tab() {
        let row = Row::new("a\tb");
        assert_eq!(row.cx_to_rx(0), 0);
        assert_eq!(row.cx_to_rx(1), 1);
        assert_eq!(row.cx_to_rx(2), 4);
        assert_eq!(row.cx_to_rx(3), 5);
    }

    #[test]
    fn rx_to_cx_inverts_cx_to_rx() {
        let row = Row::new("a\tb\tc");
        for cx in 0..=row.len() {
            assert_eq!(row.rx_to_cx(row.cx_to_rx(cx)), cx);
        }
    }

    #[test]
    fn rx_to_cx_mid_tab_maps_to_tab() {
        // Columns 1..4 all fall inside the tab at char index 1.
        let row = Row::new("a\tb");
        assert_eq!(row.rx_to_cx(1), 1);
        assert_eq!(row.rx_to_cx(2), 1);
        assert_eq!(row.rx_to_cx(3), 1);
        assert_eq!(row.rx_to_cx(4), 2);
    }

    #[test]
    fn rx_to_cx_past_end_clamps_to_len() {
        let row = Row::new("ab");
        assert_eq!(row.rx_to_cx(99), 2);
    }
}
