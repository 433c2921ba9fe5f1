//! The modal dispatcher: keys in, state changes out.
//!
//! [`Editor::handle`] consumes one [`Event`] at a time and never blocks.
//! Multi-key sequences (chords, the insert-mode `jk` escape, prompts) are
//! explicit machine states advanced by subsequent events, so the frontend
//! can poll input, drive timers, and repaint between any two keys.
//!
//! The frontend contract:
//!
//! - Decode input to [`Event::Key`] and feed it to [`handle`](Editor::handle).
//! - When [`awaiting_timeout`](Editor::awaiting_timeout) is true and no key
//!   arrives within [`CHORD_TIMEOUT`], feed [`Event::TimedOut`].
//! - Stop the loop when `handle` returns [`Effect::Quit`].
//! - Render from the accessors; `handle` keeps the viewport offsets valid
//!   after every event.

use std::time::{Duration, Instant};

use crate::document::Document;
use crate::history::History;
use crate::key::{Event, Key};
use crate::mode::Mode;
use crate::search::{Direction, SearchState};
use crate::word;

/// How long a pending timed chord waits before the prefix key is taken
/// literally.
pub const CHORD_TIMEOUT: Duration = Duration::from_millis(300);

/// How long a status message stays visible.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Cursor position in raw document coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Row index. May sit one past the last row (the virtual empty line).
    pub line: usize,
    /// Char index within the row.
    pub col: usize,
}

// ---------------------------------------------------------------------------
// Dispatcher states
// ---------------------------------------------------------------------------

/// The first key of a two-key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChordPrefix {
    /// `Space` — leader commands.
    Leader,
    /// `g` — goto commands.
    Goto,
    /// `d` — delete commands.
    Delete,
    /// `Ctrl-X` — quit/save commands.
    Quit,
}

impl ChordPrefix {
    const fn hint(self) -> &'static str {
        match self {
            Self::Leader => "<leader>...",
            Self::Goto => "g...",
            Self::Delete => "d...",
            Self::Quit => "C-x...",
        }
    }
}

/// An in-progress multi-key sequence.
#[derive(Debug, Default, PartialEq, Eq)]
enum Pending {
    #[default]
    None,
    /// First chord key seen, waiting for the second. Untimed.
    Chord(ChordPrefix),
    /// Insert-mode `j` seen, waiting for `k`/`j` or the timeout.
    TimedJ,
}

/// What a prompt does with its input.
#[derive(Debug)]
enum PromptKind {
    /// `/` — incremental search.
    Search(SearchState),
    /// `:` — colon commands.
    Command,
    /// Filename entry for a save without one. `then_quit` carries a `:wq`
    /// through the prompt.
    SaveAs { then_quit: bool },
}

/// An active bottom-line prompt.
#[derive(Debug)]
struct Prompt {
    kind: PromptKind,
    input: String,
}

/// What the frontend should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Effect {
    /// Keep going.
    Continue,
    /// Tear down and exit.
    Quit,
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// The whole editing session: document, cursor, viewport, and dispatcher
/// state.
#[derive(Debug)]
pub struct Editor {
    doc: Document,
    cursor: Cursor,
    /// Cursor's render column, derived by [`scroll`](Self::scroll).
    render_col: usize,
    row_off: usize,
    col_off: usize,
    text_rows: usize,
    text_cols: usize,
    mode: Mode,
    pending: Pending,
    prompt: Option<Prompt>,
    history: History,
    message: Option<(String, Instant)>,
}

impl Editor {
    /// A session over `doc` with a text area of `text_rows` by `text_cols`.
    #[must_use]
    pub fn new(doc: Document, text_rows: usize, text_cols: usize) -> Self {
        Self {
            doc,
            cursor: Cursor::default(),
            render_col: 0,
            row_off: 0,
            col_off: 0,
            text_rows,
            text_cols,
            mode: Mode::Normal,
            pending: Pending::None,
            prompt: None,
            history: History::new(),
            message: None,
        }
    }

    // -- Accessors for the renderer -----------------------------------------

    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Cursor position in render columns, valid after the last event.
    #[inline]
    #[must_use]
    pub const fn render_col(&self) -> usize {
        self.render_col
    }

    /// First visible row.
    #[inline]
    #[must_use]
    pub const fn row_offset(&self) -> usize {
        self.row_off
    }

    /// First visible render column.
    #[inline]
    #[must_use]
    pub const fn col_offset(&self) -> usize {
        self.col_off
    }

    /// True while a timed chord waits for its second key; the frontend
    /// should deliver [`Event::TimedOut`] after [`CHORD_TIMEOUT`].
    #[inline]
    #[must_use]
    pub fn awaiting_timeout(&self) -> bool {
        self.pending == Pending::TimedJ
    }

    /// Resizes the text area.
    pub fn set_screen_size(&mut self, text_rows: usize, text_cols: usize) {
        self.text_rows = text_rows;
        self.text_cols = text_cols;
        self.scroll();
    }

    /// The status line: cursor position, mode tag, filetype, filename, and
    /// a dirty marker.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!(
            "{:04}:{:02}  {}  {}  {}{}",
            self.cursor.line + 1,
            self.cursor.col + 1,
            self.mode.status_tag(),
            self.doc.syntax().map_or("Fundamental", |s| s.name),
            self.doc
                .filename()
                .and_then(|p| p.to_str())
                .unwrap_or("[No file]"),
            if self.doc.is_dirty() { " + " } else { "" },
        )
    }

    /// Text for the message bar: an active prompt, or a message younger
    /// than [`MESSAGE_TIMEOUT`].
    #[must_use]
    pub fn message(&self) -> Option<String> {
        if let Some(prompt) = &self.prompt {
            let text = match &prompt.kind {
                PromptKind::Search(_) => {
                    format!("Search: {} (ESC/Arrows/Enter)", prompt.input)
                }
                PromptKind::Command => format!(":{}", prompt.input),
                PromptKind::SaveAs { .. } => {
                    format!("Save as: {} (ESC to cancel)", prompt.input)
                }
            };
            return Some(text);
        }
        self.message.as_ref().and_then(|(text, since)| {
            (since.elapsed() < MESSAGE_TIMEOUT && !text.is_empty())
                .then(|| text.clone())
        })
    }

    fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), Instant::now()));
    }

    fn clear_message(&mut self) {
        self.message = None;
    }

    // -- Event entry point --------------------------------------------------

    /// Advances the editor by one event and leaves the viewport valid.
    pub fn handle(&mut self, event: Event) -> Effect {
        let effect = self.dispatch(event);
        self.scroll();
        effect
    }

    fn dispatch(&mut self, event: Event) -> Effect {
        if self.prompt.is_some() {
            if let Event::Key(key) = event {
                return self.handle_prompt_key(key);
            }
            return Effect::Continue;
        }

        match std::mem::take(&mut self.pending) {
            Pending::Chord(prefix) => return self.handle_chord(prefix, event),
            Pending::TimedJ => return self.handle_timed_j(event),
            Pending::None => {}
        }

        let Event::Key(key) = event else {
            return Effect::Continue;
        };
        match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Insert => self.handle_insert(key),
        }
    }

    // -- Normal mode --------------------------------------------------------

    fn handle_normal(&mut self, key: Key) -> Effect {
        match key {
            Key::Char(' ') => self.start_chord(ChordPrefix::Leader),
            Key::Char('g') => self.start_chord(ChordPrefix::Goto),
            Key::Char('d') => self.start_chord(ChordPrefix::Delete),
            Key::Ctrl('x') => self.start_chord(ChordPrefix::Quit),

            Key::Char('i') => self.mode = Mode::Insert,
            Key::Char('a') => {
                self.cursor.col = (self.cursor.col + 1).min(self.current_row_len());
                self.mode = Mode::Insert;
            }
            Key::Char('A') => {
                self.cursor.col = self.current_row_len();
                self.mode = Mode::Insert;
            }
            Key::Char('I') => {
                self.cursor.col = 0;
                self.mode = Mode::Insert;
            }
            Key::Char('o') => {
                self.cursor.col = self.current_row_len();
                self.insert_newline();
                self.mode = Mode::Insert;
            }

            Key::Char(':' | ';') => {
                self.prompt = Some(Prompt {
                    kind: PromptKind::Command,
                    input: String::new(),
                });
            }
            Key::Char('/') => self.start_search(),

            Key::Char('h') => self.move_cursor(Key::Left),
            Key::Char('l') => self.move_cursor(Key::Right),
            Key::Char('k') => self.move_cursor(Key::Up),
            Key::Char('j') => self.move_cursor(Key::Down),

            Key::Char('w') => {
                let (line, col) = word::forward(&self.doc, self.cursor.line, self.cursor.col);
                self.cursor = Cursor { line, col };
            }
            Key::Char('b') => {
                let (line, col) = word::backward(&self.doc, self.cursor.line, self.cursor.col);
                self.cursor = Cursor { line, col };
            }

            Key::Char('J') => self.doc.join_with_next(self.cursor.line),
            Key::Char('x') => {
                self.move_cursor(Key::Right);
                self.delete_backward();
            }
            Key::Char('$') => self.cursor.col = self.current_row_len(),
            Key::Char('^') => self.cursor.col = 0,
            Key::Char('G') => {
                if !self.doc.is_empty() {
                    self.cursor.line = self.doc.len() - 1;
                    self.cursor.col = self.current_row_len();
                }
            }

            Key::Ctrl('f') => self.page_down(),
            Key::Ctrl('b') => self.page_up(),

            Key::Char('u') => {
                let doc = std::mem::take(&mut self.doc);
                self.doc = self.history.undo(doc);
                self.clamp_cursor();
            }
            Key::Ctrl('r') => {
                let doc = std::mem::take(&mut self.doc);
                self.doc = self.history.redo(doc);
                self.clamp_cursor();
            }
            Key::Char('H') => self.history.push(&self.doc),

            other => self.undefined(other),
        }
        Effect::Continue
    }

    fn start_chord(&mut self, prefix: ChordPrefix) {
        self.set_message(prefix.hint());
        self.pending = Pending::Chord(prefix);
    }

    fn handle_chord(&mut self, prefix: ChordPrefix, event: Event) -> Effect {
        let Event::Key(key) = event else {
            // Chords are untimed; keep waiting.
            self.pending = Pending::Chord(prefix);
            return Effect::Continue;
        };
        match (prefix, key) {
            (ChordPrefix::Leader, Key::Char('w')) => self.save(),
            (ChordPrefix::Goto, Key::Char('g')) => {
                self.cursor = Cursor { line: 0, col: 0 };
                self.clear_message();
            }
            (ChordPrefix::Delete, Key::Char('d')) => {
                self.doc.delete_row(self.cursor.line);
                self.clamp_cursor();
                self.clear_message();
            }
            (ChordPrefix::Quit, Key::Ctrl('c')) => return Effect::Quit,
            (ChordPrefix::Quit, Key::Ctrl('s')) => self.save(),
            (_, other) => self.undefined(other),
        }
        Effect::Continue
    }

    // -- Insert mode --------------------------------------------------------

    fn handle_insert(&mut self, key: Key) -> Effect {
        match key {
            Key::Escape => self.mode = Mode::Normal,
            Key::Char('j') => self.pending = Pending::TimedJ,
            Key::Enter => self.insert_newline(),
            Key::Ctrl('x') => self.start_chord(ChordPrefix::Quit),
            Key::Ctrl('s') => self.start_search(),
            Key::Ctrl('a') => self.cursor.col = 0,
            Key::Ctrl('e') => self.cursor.col = self.current_row_len(),
            Key::Backspace | Key::Ctrl('h') => self.delete_backward(),
            Key::Ctrl('b') | Key::Left => self.move_cursor(Key::Left),
            Key::Ctrl('f') | Key::Right => self.move_cursor(Key::Right),
            Key::Ctrl('p') | Key::Up => self.move_cursor(Key::Up),
            Key::Ctrl('n') | Key::Down => self.move_cursor(Key::Down),
            Key::Char(c) if key.is_text() => self.insert_char(c),
            other => self.undefined(other),
        }
        Effect::Continue
    }

    fn handle_timed_j(&mut self, event: Event) -> Effect {
        match event {
            // No second key in time: the prefix was a literal j.
            Event::TimedOut => self.insert_char('j'),
            Event::Key(Key::Char('k')) => self.mode = Mode::Normal,
            Event::Key(Key::Char('j')) => {
                self.save();
                self.mode = Mode::Normal;
            }
            // Any other key cancels the chord and is swallowed.
            Event::Key(other) => self.undefined(other),
        }
        Effect::Continue
    }

    // -- Prompts ------------------------------------------------------------

    fn start_search(&mut self) {
        let state = SearchState::new(
            (self.cursor.line, self.cursor.col),
            (self.row_off, self.col_off),
        );
        self.prompt = Some(Prompt {
            kind: PromptKind::Search(state),
            input: String::new(),
        });
    }

    fn handle_prompt_key(&mut self, key: Key) -> Effect {
        let Some(mut prompt) = self.prompt.take() else {
            return Effect::Continue;
        };
        match key {
            Key::Escape => return self.cancel_prompt(prompt),
            Key::Enter => {
                if prompt.input.is_empty() {
                    // Nothing to confirm yet; stay in the prompt.
                    self.prompt = Some(prompt);
                    return Effect::Continue;
                }
                return self.confirm_prompt(prompt);
            }
            Key::Backspace | Key::Ctrl('h') | Key::Delete => {
                prompt.input.pop();
                if let PromptKind::Search(state) = &mut prompt.kind {
                    state.reset();
                    self.search_step(state, &prompt.input, Direction::Forward);
                }
            }
            Key::Right | Key::Down => {
                if let PromptKind::Search(state) = &mut prompt.kind {
                    self.search_step(state, &prompt.input, Direction::Forward);
                }
            }
            Key::Left | Key::Up => {
                if let PromptKind::Search(state) = &mut prompt.kind {
                    self.search_step(state, &prompt.input, Direction::Backward);
                }
            }
            Key::Char(c) if key.is_text() => {
                prompt.input.push(c);
                if let PromptKind::Search(state) = &mut prompt.kind {
                    state.reset();
                    self.search_step(state, &prompt.input, Direction::Forward);
                }
            }
            _ => {}
        }
        self.prompt = Some(prompt);
        Effect::Continue
    }

    /// One incremental search step; a hit moves the cursor and forces the
    /// scroll to bring the match row to the top of the window.
    fn search_step(&mut self, state: &mut SearchState, query: &str, direction: Direction) {
        if let Some(hit) = state.step(&mut self.doc, query, direction) {
            self.cursor = Cursor {
                line: hit.line,
                col: hit.col,
            };
            self.row_off = self.doc.len();
        }
    }

    fn cancel_prompt(&mut self, prompt: Prompt) -> Effect {
        match prompt.kind {
            PromptKind::Search(mut state) => {
                state.clear_overlay(&mut self.doc);
                let (line, col) = state.saved_cursor();
                let (row_off, col_off) = state.saved_offsets();
                self.cursor = Cursor { line, col };
                self.row_off = row_off;
                self.col_off = col_off;
                self.clear_message();
            }
            PromptKind::Command => self.clear_message(),
            PromptKind::SaveAs { .. } => self.set_message("Save aborted"),
        }
        Effect::Continue
    }

    fn confirm_prompt(&mut self, prompt: Prompt) -> Effect {
        match prompt.kind {
            PromptKind::Search(mut state) => {
                // The cursor stays on the match; only the overlay is undone.
                state.clear_overlay(&mut self.doc);
                self.clear_message();
            }
            PromptKind::Command => {
                self.clear_message();
                match prompt.input.as_str() {
                    "q!" => return Effect::Quit,
                    "wq" => return self.save_then(true),
                    _ => {}
                }
            }
            PromptKind::SaveAs { then_quit } => {
                self.clear_message();
                match self.doc.save_as(prompt.input) {
                    Ok(written) => {
                        self.set_message(format!("{written} bytes written to disk"));
                        if then_quit {
                            return Effect::Quit;
                        }
                    }
                    Err(err) => self.set_message(format!("Can't save! {err}")),
                }
            }
        }
        Effect::Continue
    }

    // -- Editing primitives -------------------------------------------------

    fn insert_char(&mut self, c: char) {
        if self.cursor.line == self.doc.len() {
            self.doc.insert_row(self.doc.len(), "");
        }
        self.doc.insert_char(self.cursor.line, self.cursor.col, c);
        self.cursor.col += 1;
    }

    fn insert_newline(&mut self) {
        self.doc.split_row(self.cursor.line, self.cursor.col);
        self.cursor.line += 1;
        self.cursor.col = 0;
    }

    /// Deletes the character before the cursor, joining with the row above
    /// at column 0 (without the space a `J` join inserts).
    fn delete_backward(&mut self) {
        if self.cursor.line >= self.doc.len() {
            return;
        }
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return;
        }
        if self.cursor.col > 0 {
            self.doc.delete_char(self.cursor.line, self.cursor.col - 1);
            self.cursor.col -= 1;
        } else {
            let line = self.cursor.line;
            let prev_len = self.doc.row(line - 1).map_or(0, crate::row::Row::len);
            let tail = self
                .doc
                .row(line)
                .map_or_else(String::new, |r| r.chars().to_string());
            self.doc.append_str(line - 1, &tail);
            self.doc.delete_row(line);
            self.cursor.line -= 1;
            self.cursor.col = prev_len;
        }
    }

    fn save(&mut self) {
        let _ = self.save_then(false);
    }

    /// Saves, prompting for a filename first when there is none. With
    /// `then_quit`, a completed save (now or after the prompt) quits.
    fn save_then(&mut self, then_quit: bool) -> Effect {
        if self.doc.filename().is_none() {
            self.prompt = Some(Prompt {
                kind: PromptKind::SaveAs { then_quit },
                input: String::new(),
            });
            return Effect::Continue;
        }
        match self.doc.save() {
            Ok(written) => {
                self.set_message(format!("{written} bytes written to disk"));
                if then_quit {
                    return Effect::Quit;
                }
            }
            Err(err) => self.set_message(format!("Can't save! {err}")),
        }
        Effect::Continue
    }

    fn undefined(&mut self, key: Key) {
        self.set_message(format!("{key} is undefined"));
    }

    // -- Cursor and viewport ------------------------------------------------

    /// Raw length of the row under the cursor, or 0 on the virtual line.
    fn current_row_len(&self) -> usize {
        self.doc
            .row(self.cursor.line)
            .map_or(0, crate::row::Row::len)
    }

    fn move_cursor(&mut self, direction: Key) {
        match direction {
            Key::Left => {
                if self.cursor.col > 0 {
                    self.cursor.col -= 1;
                } else if self.cursor.line > 0 {
                    self.cursor.line -= 1;
                    self.cursor.col = self.current_row_len();
                }
            }
            Key::Right => {
                let len = self.current_row_len();
                if self.cursor.line < self.doc.len() {
                    if self.cursor.col < len {
                        self.cursor.col += 1;
                    } else {
                        // Past the row end: onto the next row (possibly the
                        // virtual line after the last).
                        self.cursor.line += 1;
                        self.cursor.col = 0;
                    }
                }
            }
            Key::Up => {
                if self.cursor.line > 0 {
                    self.cursor.line -= 1;
                }
            }
            Key::Down => {
                if self.cursor.line + 1 < self.doc.len() {
                    self.cursor.line += 1;
                }
            }
            _ => {}
        }
        // Snap to the new row's width; rows differ in length.
        self.cursor.col = self.cursor.col.min(self.current_row_len());
    }

    fn page_down(&mut self) {
        self.cursor.line = (self.row_off + self.text_rows.saturating_sub(1)).min(self.doc.len());
        for _ in 0..self.text_rows {
            self.move_cursor(Key::Down);
        }
    }

    fn page_up(&mut self) {
        self.cursor.line = self.row_off;
        for _ in 0..self.text_rows {
            self.move_cursor(Key::Up);
        }
    }

    /// Clamps the cursor into the document after a structural change made
    /// under it (row deletion, undo).
    fn clamp_cursor(&mut self) {
        self.cursor.line = self.cursor.line.min(self.doc.len());
        self.cursor.col = self.cursor.col.min(self.current_row_len());
    }

    /// Re-derives the render column and drags the viewport offsets so the
    /// cursor stays visible.
    fn scroll(&mut self) {
        self.render_col = self
            .doc
            .row(self.cursor.line)
            .map_or(0, |row| row.cx_to_rx(self.cursor.col));

        if self.cursor.line < self.row_off {
            self.row_off = self.cursor.line;
        }
        if self.cursor.line >= self.row_off + self.text_rows {
            self.row_off = (self.cursor.line + 1).saturating_sub(self.text_rows);
        }
        if self.render_col < self.col_off {
            self.col_off = self.render_col;
        }
        if self.render_col >= self.col_off + self.text_cols {
            self.col_off = (self.render_col + 1).saturating_sub(self.text_cols);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
