//! Modal editing states.
//!
//! The editor is always in exactly one [`Mode`]. Each mode changes how input
//! is interpreted:
//!
//! | Mode   | Status tag | Purpose                      |
//! |--------|------------|------------------------------|
//! | Normal | `<N>`      | Navigation, commands, chords |
//! | Insert | `<I>`      | Typing text                  |

use std::fmt;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode.
///
/// This is a pure data type — it holds what mode we're in, not the logic
/// for handling keys. Key dispatch and mode transitions live in the editor
/// layer. The Mode enum just says "what are we doing right now."
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Default mode. Keys are commands, not text input.
    #[default]
    Normal,
    /// Text entry mode. Keys produce characters in the buffer.
    Insert,
}

impl Mode {
    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
        }
    }

    /// The compact tag shown on the status line.
    #[inline]
    #[must_use]
    pub const fn status_tag(self) -> &'static str {
        match self {
            Self::Normal => "<N>",
            Self::Insert => "<I>",
        }
    }

    /// True if this mode accepts text input.
    #[inline]
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Insert)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
