//! # bse-core — Editor core for bse
//!
//! This crate contains the fundamental building blocks of the editor:
//!
//! - **[`row`]** — one line of text with its render view and highlighting
//! - **[`document`]** — the row store, edit operations, and file I/O
//! - **[`syntax`]** / **[`highlight`]** — filetype database and per-row scanner
//! - **[`word`]** — vim-style word motions
//! - **[`search`]** — incremental, wrapping document search
//! - **[`history`]** — linear snapshot undo
//! - **[`mode`]** / **[`key`]** — modal states and decoded input events
//! - **[`editor`]** — the non-blocking dispatcher tying it all together
//!
//! The crate is deliberately headless: it never touches the terminal. A
//! frontend decodes keys into [`key::Event`]s, feeds them to
//! [`editor::Editor::handle`], and renders from the accessors.

pub mod document;
pub mod editor;
pub mod error;
pub mod highlight;
pub mod history;
pub mod key;
pub mod mode;
pub mod row;
pub mod search;
pub mod syntax;
pub mod word;
