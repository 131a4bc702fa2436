//! # termwriter
//!
//! Width-aware terminal output for test-runner reports.
//!
//! A [`TerminalWriter`] writes text to a terminal, stream or callback with
//! optional ANSI markup, remembers how far along the current line the
//! cursor is, and draws separator rules sized to the terminal.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use termwriter::prelude::*;
//!
//! let mut tw = TerminalWriter::stdout();
//! tw.sep("=", Some("test session starts"), None, &[("bold", true)])?;
//! tw.write_styled("PASSED", &[("green", true)])?;
//! ```
//!
//! ## Core Concepts
//!
//! - **TerminalWriter**: writes messages and separators, tracks the current line
//! - **Sink**: where output goes (a stream, stdout, or a callback)
//! - **WriterConfig**: environment snapshot deciding markup and fallback width
//! - **Markup**: named style flags mapped to ANSI SGR codes

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cells;
pub mod error;
pub mod markup;
pub mod sink;
pub mod terminal;
pub mod writer;

/// Re-exports for convenient usage
pub mod prelude {
    pub use crate::error::WriteError;
    pub use crate::markup::InvalidMarkupError;
    pub use crate::sink::{Encoding, FnSink, Sink, SinkError, StreamSink};
    pub use crate::terminal::{AnsiTranslator, CrosstermProbe, FixedProbe, SizeProbe, WriterConfig};
    pub use crate::writer::{CurrentLine, Flags, Message, TerminalWriter, TerminalWriterBuilder};
}

// Re-export key types at crate root
pub use error::WriteError;
pub use markup::InvalidMarkupError;
pub use sink::{Encoding, Sink};
pub use terminal::WriterConfig;
pub use writer::{CurrentLine, Message, TerminalWriter};
