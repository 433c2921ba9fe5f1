//! Filetype definitions for the highlighter.
//!
//! Each [`SyntaxDefinition`] is a static description of one language: which
//! filenames it claims, its keyword list, its comment markers, and which
//! optional scanner features are switched on. The scanner itself lives in
//! [`crate::highlight`]; this module only carries the data.
//!
//! # Design choices
//!
//! - Definitions are `'static`. A document holds `Option<&'static
//!   SyntaxDefinition>`, so changing filetype is a pointer swap and
//!   definitions never need cloning.
//! - Keyword entries ending in `|` mark the secondary class (types). The
//!   trailing bar is stripped by [`keyword_class`] at scan time, keeping the
//!   tables flat string lists.

use bitflags::bitflags;

use crate::highlight::Highlight;

// ---------------------------------------------------------------------------
// HighlightFlags
// ---------------------------------------------------------------------------

bitflags! {
    /// Optional scanner features a filetype can enable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HighlightFlags: u8 {
        /// Highlight numeric literals.
        const NUMBERS = 1 << 0;
        /// Highlight string and character literals.
        const STRINGS = 1 << 1;
    }
}

// ---------------------------------------------------------------------------
// SyntaxDefinition
// ---------------------------------------------------------------------------

/// A static description of one supported filetype.
#[derive(Debug)]
pub struct SyntaxDefinition {
    /// Name shown on the status line.
    pub name: &'static str,
    /// Filename patterns. A pattern starting with `.` matches the filename's
    /// extension (everything from the first dot); any other pattern matches
    /// as a substring of the filename.
    pub filematch: &'static [&'static str],
    /// Keywords. A trailing `|` marks the secondary class.
    pub keywords: &'static [&'static str],
    /// Marker that starts a to-end-of-line comment. Empty disables.
    pub line_comment: &'static str,
    /// Marker that opens a block comment. Empty disables.
    pub block_comment_start: &'static str,
    /// Marker that closes a block comment. Empty disables.
    pub block_comment_end: &'static str,
    /// Which optional scanner features are on.
    pub flags: HighlightFlags,
}

impl SyntaxDefinition {
    /// True if this filetype claims `filename`.
    #[must_use]
    pub fn matches(&self, filename: &str) -> bool {
        let ext = filename.find('.').map(|dot| &filename[dot..]);
        self.filematch.iter().any(|&pattern| {
            if pattern.starts_with('.') {
                ext == Some(pattern)
            } else {
                filename.contains(pattern)
            }
        })
    }
}

/// Splits a keyword table entry into its bare word and highlight class.
#[must_use]
pub fn keyword_class(entry: &str) -> (&str, Highlight) {
    entry.strip_suffix('|').map_or(
        (entry, Highlight::KeywordPrimary),
        |word| (word, Highlight::KeywordSecondary),
    )
}

/// True for characters that end a token: whitespace, NUL, or punctuation.
#[must_use]
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\0' || ",.()+-/*=~%<>[];".contains(c)
}

// ---------------------------------------------------------------------------
// Builtin filetype database
// ---------------------------------------------------------------------------

const C_KEYWORDS: &[&str] = &[
    "switch", "if", "while", "for", "break", "continue", "return", "else",
    "struct", "union", "typedef", "static", "enum", "class", "case",
    "#define", "#include", "int|", "long|", "double|", "float|", "char|",
    "unsigned|", "signed|", "void|",
];

const BEN_C_KEYWORDS: &[&str] = &[
    "switch", "if", "while", "for", "break", "continue", "return", "else",
    "struct", "union", "typedef", "static", "enum", "class", "case",
    "#define", "#include", "int|", "long|", "double|", "float|", "char|",
    "unsigned|", "signed|", "void|", "string|",
];

const GO_KEYWORDS: &[&str] = &[
    "const", "var", "func", "type", "import", "package", "chan", "interface",
    "map", "struct", "break", "case", "continue", "default", "else",
    "fallthrough", "for", "goto", "if", "range", "return", "select",
    "switch", "defer", "go",
];

/// All filetypes the editor knows about.
pub static SYNTAXES: &[SyntaxDefinition] = &[
    SyntaxDefinition {
        name: "c",
        filematch: &[".c", ".h", ".cpp", ".hpp"],
        keywords: C_KEYWORDS,
        line_comment: "//",
        block_comment_start: "/*",
        block_comment_end: "*/",
        flags: HighlightFlags::NUMBERS.union(HighlightFlags::STRINGS),
    },
    SyntaxDefinition {
        name: "ben-c",
        filematch: &[".bc", ".bh"],
        keywords: BEN_C_KEYWORDS,
        line_comment: "//",
        block_comment_start: "/*",
        block_comment_end: "*/",
        flags: HighlightFlags::NUMBERS.union(HighlightFlags::STRINGS),
    },
    SyntaxDefinition {
        name: "go",
        filematch: &[".go"],
        keywords: GO_KEYWORDS,
        line_comment: "//",
        block_comment_start: "/*",
        block_comment_end: "*/",
        flags: HighlightFlags::NUMBERS.union(HighlightFlags::STRINGS),
    },
];

/// Picks the filetype for a filename, or `None` when nothing matches.
///
/// Extension patterns compare against everything from the first dot in the
/// filename, so `archive.tar.gz` has the extension `.tar.gz`.
#[must_use]
pub fn detect(filename: &str) -> Option<&'static SyntaxDefinition> {
    SYNTAXES.iter().find(|syntax| syntax.matches(filename))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- detect -------------------------------------------------------------

    #[test]
    fn detect_by_extension() {
        assert_eq!(detect("main.c").map(|s| s.name), Some("c"));
        assert_eq!(detect("list.h").map(|s| s.name), Some("c"));
        assert_eq!(detect("server.go").map(|s| s.name), Some("go"));
        assert_eq!(detect("prog.bc").map(|s| s.name), Some("ben-c"));
    }

    #[test]
    fn detect_unknown_extension() {
        assert_eq!(detect("notes.txt").map(|s| s.name), None);
        assert_eq!(detect("README").map(|s| s.name), None);
    }

    #[test]
    fn matches_by_substring_pattern() {
        static MAKE: SyntaxDefinition = SyntaxDefinition {
            name: "make",
            filematch: &["Makefile"],
            keywords: &[],
            line_comment: "#",
            block_comment_start: "",
            block_comment_end: "",
            flags: HighlightFlags::empty(),
        };
        assert!(MAKE.matches("Makefile"));
        assert!(MAKE.matches("project/Makefile.am"));
        assert!(!MAKE.matches("makefile"));
    }

    #[test]
    fn detect_uses_first_dot() {
        // The extension runs from the first dot, so a double extension does
        // not collapse to its last component.
        assert_eq!(detect("bundle.go.bak").map(|s| s.name), None);
    }

    // -- keyword_class ------------------------------------------------------

    #[test]
    fn keyword_class_primary_and_secondary() {
        assert_eq!(keyword_class("if"), ("if", Highlight::KeywordPrimary));
        assert_eq!(keyword_class("int|"), ("int", Highlight::KeywordSecondary));
    }

    // -- is_separator -------------------------------------------------------

    #[test]
    fn separators() {
        for c in [' ', '\t', '\0', ',', '.', '(', ')', '+', '-', '/', '*',
                  '=', '~', '%', '<', '>', '[', ']', ';'] {
            assert!(is_separator(c), "{c:?} should separate");
        }
        for c in ['a', 'Z', '0', '_', '"', '\''] {
            assert!(!is_separator(c), "{c:?} should not separate");
        }
    }

    // -- flags --------------------------------------------------------------

    #[test]
    fn builtin_filetypes_enable_numbers_and_strings() {
        for syntax in SYNTAXES {
            assert!(syntax.flags.contains(HighlightFlags::NUMBERS));
            assert!(syntax.flags.contains(HighlightFlags::STRINGS));
        }
    }
}
