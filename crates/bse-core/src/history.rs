//! Undo history as a linear list of snapshots.
//!
//! Checkpoints are whole-document serializations, taken only when the user
//! asks for one. The history is a flat `Vec` plus an index: undo and redo
//! move the index and rebuild the document from the snapshot there, they
//! never mutate stored snapshots. Pushing after an undo truncates the redo
//! tail, exactly like a linear undo stack should.
//!
//! Whole-document snapshots are obviously not the cheapest representation,
//! but they make undo total and trivially correct, and documents this
//! editor handles are small.

use crate::document::Document;

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// A linear sequence of document checkpoints.
#[derive(Debug, Default)]
pub struct History {
    /// Serialized checkpoints, oldest first.
    snapshots: Vec<String>,
    /// Index of the checkpoint the document currently sits at (or came
    /// from). Always `< snapshots.len()` unless empty.
    index: usize,
}

impl History {
    /// An empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            snapshots: Vec::new(),
            index: 0,
        }
    }

    /// Number of stored checkpoints.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True if no checkpoint has been taken.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Records the document as the newest checkpoint, discarding any redo
    /// tail beyond the current index.
    pub fn push(&mut self, doc: &Document) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(doc.serialize());
        self.index = self.snapshots.len() - 1;
    }

    /// Steps back one checkpoint and returns the document rebuilt from it.
    ///
    /// If the live document has drifted from the checkpoint at the current
    /// index, the first undo returns to that checkpoint without moving the
    /// index. With no history (or already at the oldest checkpoint, with
    /// nothing drifted) the document comes back unchanged.
    #[must_use]
    pub fn undo(&mut self, doc: Document) -> Document {
        if self.snapshots.is_empty() {
            return doc;
        }
        if self.snapshots[self.index] != doc.serialize() {
            return Self::restore(&self.snapshots[self.index], &doc);
        }
        if self.index == 0 {
            return doc;
        }
        self.index -= 1;
        Self::restore(&self.snapshots[self.index], &doc)
    }

    /// Steps forward one checkpoint, if an undo left one ahead of the
    /// index. Otherwise the document comes back unchanged.
    #[must_use]
    pub fn redo(&mut self, doc: Document) -> Document {
        if self.index + 1 >= self.snapshots.len() {
            return doc;
        }
        self.index += 1;
        Self::restore(&self.snapshots[self.index], &doc)
    }

    /// Rebuilds a document from a snapshot, carrying over the live
    /// document's file identity (and with it the detected filetype).
    fn restore(snapshot: &str, like: &Document) -> Document {
        let mut doc = Document::from_text(snapshot);
        if let Some(path) = like.filename() {
            doc.set_filename(path.to_path_buf());
        }
        doc
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
