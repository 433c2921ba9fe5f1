//! Decoded input events.
//!
//! The editor core never reads the terminal itself. The frontend decodes
//! whatever byte soup the terminal produces into a [`Key`] and feeds it to
//! the dispatcher as an [`Event`]. Timeouts are events too: when a timed
//! chord is pending and no key arrives in time, the frontend delivers
//! [`Event::TimedOut`] instead of blocking the editor.

use std::fmt;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A single decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A plain character, as typed.
    Char(char),
    /// A character with the Ctrl modifier (`Ctrl('s')` for Ctrl-S).
    Ctrl(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

impl Key {
    /// True for characters that should land in the buffer when typing:
    /// printable input, not control codes.
    #[inline]
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Char(c) if !c.is_control())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Ctrl(c) => write!(f, "C-{c}"),
            Self::Enter => f.write_str("<enter>"),
            Self::Escape => f.write_str("<esc>"),
            Self::Backspace => f.write_str("<backspace>"),
            Self::Delete => f.write_str("<delete>"),
            Self::Up => f.write_str("<up>"),
            Self::Down => f.write_str("<down>"),
            Self::Left => f.write_str("<left>"),
            Self::Right => f.write_str("<right>"),
            Self::Home => f.write_str("<home>"),
            Self::End => f.write_str("<end>"),
            Self::PageUp => f.write_str("<pageup>"),
            Self::PageDown => f.write_str("<pagedown>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One tick of input for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key arrived.
    Key(Key),
    /// No key arrived within the chord timeout window.
    TimedOut,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_text_accepts_printables() {
        assert!(Key::Char('a').is_text());
        assert!(Key::Char(' ').is_text());
        assert!(Key::Char('é').is_text());
    }

    #[test]
    fn is_text_rejects_controls_and_named_keys() {
        assert!(!Key::Char('\x07').is_text());
        assert!(!Key::Ctrl('s').is_text());
        assert!(!Key::Enter.is_text());
        assert!(!Key::Left.is_text());
    }

    #[test]
    fn display_labels() {
        assert_eq!(Key::Char('j').to_string(), "j");
        assert_eq!(Key::Ctrl('s').to_string(), "C-s");
        assert_eq!(Key::Escape.to_string(), "<esc>");
        assert_eq!(Key::PageDown.to_string(), "<pagedown>");
    }
}
