//! Incremental document search.
//!
//! One [`SearchState`] lives for the duration of a search prompt. Every
//! edit of the query or direction key re-runs [`SearchState::step`], which
//! restores the previous match's highlighting, scans at most one full lap
//! of the document in the requested direction, and paints the new match
//! with the [`Highlight::Match`] overlay.
//!
//! The state also snapshots the cursor and viewport at prompt open, so a
//! cancelled search can put everything back where it was.

use crate::document::Document;
use crate::highlight::Highlight;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way the next match is looked for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// A match position: row index, raw char column, render column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub line: usize,
    pub col: usize,
    pub render_col: usize,
}

/// Saved highlighting of the row a match overlay was painted on.
#[derive(Debug)]
struct SavedOverlay {
    line: usize,
    hl: Vec<Highlight>,
}

/// In-flight state of one search prompt.
#[derive(Debug)]
pub struct SearchState {
    /// Row of the last hit; scanning resumes from here.
    last_match: Option<usize>,
    /// Overlay to undo before the next scan (or on close).
    saved: Option<SavedOverlay>,
    /// Cursor position at prompt open, for cancel.
    saved_cursor: (usize, usize),
    /// Viewport offsets at prompt open, for cancel.
    saved_offsets: (usize, usize),
}

impl SearchState {
    /// Opens a search at the given cursor and viewport.
    #[must_use]
    pub const fn new(cursor: (usize, usize), offsets: (usize, usize)) -> Self {
        Self {
            last_match: None,
            saved: None,
            saved_cursor: cursor,
            saved_offsets: offsets,
        }
    }

    /// The cursor position captured at prompt open.
    #[inline]
    #[must_use]
    pub const fn saved_cursor(&self) -> (usize, usize) {
        self.saved_cursor
    }

    /// The viewport offsets captured at prompt open.
    #[inline]
    #[must_use]
    pub const fn saved_offsets(&self) -> (usize, usize) {
        self.saved_offsets
    }

    /// Forgets the last match, so the next step scans from the top. Called
    /// whenever the query text changes.
    pub fn reset(&mut self) {
        self.last_match = None;
    }

    /// Removes the current match overlay, if any.
    pub fn clear_overlay(&mut self, doc: &mut Document) {
        if let Some(saved) = self.saved.take() {
            doc.restore_highlight(saved.line, saved.hl);
        }
    }

    /// Finds the next match for `query` in `direction` and paints it.
    ///
    /// Starts one row past the last hit (or at row 0, direction forced
    /// forward, when there is none), wraps past either end, and gives up
    /// after one full lap. The match span is compared against the render
    /// text, so a query with spaces can match across a tab's expansion.
    pub fn step(
        &mut self,
        doc: &mut Document,
        query: &str,
        direction: Direction,
    ) -> Option<Match> {
        self.clear_overlay(doc);
        if query.is_empty() || doc.is_empty() {
            return None;
        }

        let direction = if self.last_match.is_none() {
            Direction::Forward
        } else {
            direction
        };
        let len = doc.len();
        // One slot past the real rows; stepping from the sentinel lands on
        // row 0 going forward or the last row going backward.
        let mut current = self.last_match.unwrap_or(len);

        for _ in 0..len {
            current = match direction {
                Direction::Forward => {
                    if current + 1 >= len {
                        0
                    } else {
                        current + 1
                    }
                }
                Direction::Backward => {
                    if current == 0 { len - 1 } else { current - 1 }
                }
            };
            let row = doc.row(current)?;
            if let Some(byte_idx) = row.render().find(query) {
                let render_col = row.render()[..byte_idx].chars().count();
                let query_len = query.chars().count();
                let col = row.rx_to_cx(render_col);

                self.last_match = Some(current);
                self.saved = doc
                    .overlay_match(current, render_col, query_len)
                    .map(|hl| SavedOverlay { line: current, hl });
                return Some(Match {
                    line: current,
                    col,
                    render_col,
                });
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SYNTAXES;
    use pretty_assertions::assert_eq;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines)
    }

    fn state() -> SearchState {
        SearchState::new((0, 0), (0, 0))
    }

    // -- Basic matching -----------------------------------------------------

    #[test]
    fn first_step_scans_from_top() {
        let mut d = doc(&["alpha", "beta", "gamma"]);
        let mut s = state();
        let hit = s.step(&mut d, "beta", Direction::Forward).unwrap();
        assert_eq!((hit.line, hit.col), (1, 0));
    }

    #[test]
    fn match_column_within_row() {
        let mut d = doc(&["say hello there"]);
        let mut s = state();
        let hit = s.step(&mut d, "hello", Direction::Forward).unwrap();
        assert_eq!((hit.line, hit.col), (0, 4));
    }

    #[test]
    fn no_match_returns_none() {
        let mut d = doc(&["alpha", "beta"]);
        let mut s = state();
        assert!(s.step(&mut d, "missing", Direction::Forward).is_none());
    }

    #[test]
    fn empty_query_is_noop() {
        let mut d = doc(&["alpha"]);
        let mut s = state();
        assert!(s.step(&mut d, "", Direction::Forward).is_none());
    }

    #[test]
    fn empty_document_is_noop() {
        let mut d = Document::new();
        let mut s = state();
        assert!(s.step(&mut d, "x", Direction::Forward).is_none());
    }

    // -- Wrapping -----------------------------------------------------------

    #[test]
    fn forward_wraps_past_last_row() {
        let mut d = doc(&["needle", "hay"]);
        let mut s = state();
        // First hit on row 0, then the next forward step must lap the
        // document and come back to row 0.
        assert_eq!(s.step(&mut d, "needle", Direction::Forward).unwrap().line, 0);
        assert_eq!(s.step(&mut d, "needle", Direction::Forward).unwrap().line, 0);
    }

    #[test]
    fn backward_wraps_past_first_row() {
        let mut d = doc(&["one needle", "two", "three needle"]);
        let mut s = state();
        assert_eq!(s.step(&mut d, "needle", Direction::Forward).unwrap().line, 0);
        // Backward from row 0 wraps to the match on row 2.
        assert_eq!(s.step(&mut d, "needle", Direction::Backward).unwrap().line, 2);
    }

    #[test]
    fn first_step_is_always_forward() {
        let mut d = doc(&["x", "needle"]);
        let mut s = state();
        // No prior match: direction is forced forward from the top.
        let hit = s.step(&mut d, "needle", Direction::Backward).unwrap();
        assert_eq!(hit.line, 1);
    }

    // -- Overlay ------------------------------------------------------------

    #[test]
    fn match_is_painted_with_overlay() {
        let mut d = doc(&["say hello"]);
        let mut s = state();
        let hit = s.step(&mut d, "hello", Direction::Forward).unwrap();
        let hl = d.row(hit.line).unwrap().highlight();
        assert_eq!(&hl[4..9], &[Highlight::Match; 5]);
        assert_eq!(hl[0], Highlight::Normal);
    }

    #[test]
    fn overlay_restored_on_next_step() {
        let mut d = doc(&["int needle;", "also needle"]);
        d.set_syntax(Some(&SYNTAXES[0]));
        let mut s = state();

        let first = s.step(&mut d, "needle", Direction::Forward).unwrap();
        assert_eq!(first.line, 0);
        let second = s.step(&mut d, "needle", Direction::Forward).unwrap();
        assert_eq!(second.line, 1);

        // Row 0 must be back to its syntax colors, keyword intact.
        let hl = d.row(0).unwrap().highlight();
        assert_eq!(&hl[..3], &[Highlight::KeywordSecondary; 3]);
        assert!(!hl.contains(&Highlight::Match));
    }

    #[test]
    fn clear_overlay_on_close() {
        let mut d = doc(&["needle"]);
        let mut s = state();
        s.step(&mut d, "needle", Direction::Forward).unwrap();
        s.clear_overlay(&mut d);
        assert!(
            !d.row(0).unwrap().highlight().contains(&Highlight::Match)
        );
    }

    // -- Tabs ---------------------------------------------------------------

    #[test]
    fn match_after_tab_maps_back_to_char_index() {
        // The render text is "    x needle"; the raw text is "\tx needle".
        let mut d = doc(&["\tx needle"]);
        let mut s = state();
        let hit = s.step(&mut d, "needle", Direction::Forward).unwrap();
        assert_eq!(hit.render_col, 6);
        assert_eq!(hit.col, 3);
    }

    // -- Cancel snapshot ----------------------------------------------------

    #[test]
    fn snapshot_preserved_for_cancel() {
        let s = SearchState::new((3, 7), (2, 5));
        assert_eq!(s.saved_cursor(), (3, 7));
        assert_eq!(s.saved_offsets(), (2, 5));
    }
}
