//! Terminal detection and environment configuration.
//!
//! Everything the writer learns from the process environment is captured
//! once in a [`WriterConfig`]. Terminal size queries and Windows console
//! translation sit behind the [`SizeProbe`] and [`AnsiTranslator`] traits so
//! the writer itself stays platform-agnostic.

use std::io;

/// Forces markup on or off when set to a non-empty value.
pub const MARKUP_ENV: &str = "PY_COLORS";
/// Terminal type; `"dumb"` disables markup.
pub const TERM_ENV: &str = "TERM";
/// Column count used when the terminal size is unknown.
pub const COLUMNS_ENV: &str = "COLUMNS";
/// Marker exported for IDE consoles once translated markup is active.
pub const IDE_HOSTED_ENV: &str = "PYCHARM_HOSTED";

/// Width used when nothing better is known.
pub const DEFAULT_WIDTH: usize = 80;
/// Reported widths below this are treated as bogus.
pub const MIN_RELIABLE_WIDTH: usize = 40;
/// Widest line the writer will lay out; terminals report at most `u16::MAX`.
pub const MAX_WIDTH: usize = 65_535;

/// Snapshot of the environment that drives writer behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Raw value of [`MARKUP_ENV`].
    pub markup_override: Option<String>,
    /// Raw value of [`TERM_ENV`].
    pub term: Option<String>,
    /// Raw value of [`COLUMNS_ENV`].
    pub columns: Option<String>,
    /// Host never receives markup, even on a terminal.
    pub restricted_host: bool,
    /// Route output through an ANSI-to-console translator.
    pub translate_ansi: bool,
    /// Keep separators out of the terminal's last column.
    pub reserve_last_column: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            markup_override: None,
            term: None,
            columns: None,
            restricted_host: false,
            translate_ansi: cfg!(windows),
            reserve_last_column: cfg!(windows),
        }
    }
}

impl WriterConfig {
    /// Read every relevant environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            markup_override: std::env::var(MARKUP_ENV).ok(),
            term: std::env::var(TERM_ENV).ok(),
            columns: std::env::var(COLUMNS_ENV).ok(),
            ..Self::default()
        }
    }

    /// Set the markup override value.
    #[must_use]
    pub fn markup_override(mut self, value: impl Into<String>) -> Self {
        self.markup_override = Some(value.into());
        self
    }

    /// Set the terminal type.
    #[must_use]
    pub fn term(mut self, value: impl Into<String>) -> Self {
        self.term = Some(value.into());
        self
    }

    /// Set the columns fallback value.
    #[must_use]
    pub fn columns(mut self, value: impl Into<String>) -> Self {
        self.columns = Some(value.into());
        self
    }

    /// Mark the host as restricted.
    #[must_use]
    pub fn restricted_host(mut self, restricted: bool) -> Self {
        self.restricted_host = restricted;
        self
    }

    /// Enable or disable console translation.
    #[must_use]
    pub fn translate_ansi(mut self, translate: bool) -> Self {
        self.translate_ansi = translate;
        self
    }

    /// Enable or disable last-column reservation for separators.
    #[must_use]
    pub fn reserve_last_column(mut self, reserve: bool) -> Self {
        self.reserve_last_column = reserve;
        self
    }

    /// Decide whether markup should be emitted for a sink.
    ///
    /// A non-empty override wins: anything but `"0"` or `"false"` turns
    /// markup on. Otherwise the sink must be a terminal, the terminal must
    /// not be dumb, and the host must not be restricted.
    #[must_use]
    pub fn markup_enabled(&self, sink_is_terminal: bool) -> bool {
        if let Some(value) = self.markup_override.as_deref()
            && !value.is_empty()
        {
            return value != "0" && value != "false";
        }
        sink_is_terminal && self.term.as_deref() != Some("dumb") && !self.restricted_host
    }

    /// Column count from [`COLUMNS_ENV`], if it is a positive integer.
    #[must_use]
    pub fn columns_fallback(&self) -> Option<usize> {
        self.columns
            .as_deref()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|&columns| columns > 0)
            .map(|columns| columns.min(MAX_WIDTH))
    }

    /// Turn a probed width into a usable one.
    ///
    /// Zero means no terminal (or one that reports 0x0), so the columns
    /// fallback or [`DEFAULT_WIDTH`] applies. Small positive widths are
    /// clamped to [`DEFAULT_WIDTH`].
    #[must_use]
    pub fn sanitize_width(&self, probed: usize) -> usize {
        if probed == 0 {
            self.columns_fallback().unwrap_or(DEFAULT_WIDTH)
        } else if probed < MIN_RELIABLE_WIDTH {
            DEFAULT_WIDTH
        } else {
            probed.min(MAX_WIDTH)
        }
    }
}

/// Source of the current terminal column count.
pub trait SizeProbe {
    /// Query the terminal width in columns.
    fn columns(&self) -> io::Result<usize>;
}

/// Queries the controlling terminal through crossterm.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermProbe;

impl SizeProbe for CrosstermProbe {
    fn columns(&self) -> io::Result<usize> {
        crossterm::terminal::size().map(|(w, _)| usize::from(w))
    }
}

/// Reports a fixed width, or a fixed error kind.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(Result<usize, io::ErrorKind>);

impl FixedProbe {
    /// Always report `columns`.
    #[must_use]
    pub const fn width(columns: usize) -> Self {
        Self(Ok(columns))
    }

    /// Always fail with `kind`.
    #[must_use]
    pub const fn failing(kind: io::ErrorKind) -> Self {
        Self(Err(kind))
    }
}

impl SizeProbe for FixedProbe {
    fn columns(&self) -> io::Result<usize> {
        self.0
            .map_err(|kind| io::Error::new(kind, "terminal size unavailable"))
    }
}

/// Translates ANSI escape sequences for consoles that do not speak them.
pub trait AnsiTranslator {
    /// Prepare the console. Returns `false` when translation is unavailable.
    fn activate(&self) -> bool;

    /// Wrap the sink so output goes through the translator.
    fn wrap(&self, sink: Box<dyn crate::sink::Sink>) -> Box<dyn crate::sink::Sink> {
        sink
    }
}

/// Enables virtual terminal processing on the Windows console, after which
/// escape sequences pass through unchanged.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualTerminal;

#[cfg(windows)]
impl AnsiTranslator for VirtualTerminal {
    fn activate(&self) -> bool {
        crossterm::ansi_support::supports_ansi()
    }
}

/// The translator available on this platform, if any.
#[must_use]
pub fn platform_translator() -> Option<Box<dyn AnsiTranslator>> {
    #[cfg(windows)]
    {
        Some(Box::new(VirtualTerminal))
    }
    #[cfg(not(windows))]
    {
        None
    }
}
