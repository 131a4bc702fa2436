//! `TerminalWriter` - styled, width-aware output to a terminal or stream.
//!
//! The writer keeps track of the unterminated tail of everything written so
//! far (see [`CurrentLine`]), so callers can decide whether the next chunk
//! still fits on the line. Separator rules are sized to the terminal width.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

use crate::cells;
use crate::error::WriteError;
use crate::markup;
use crate::sink::{self, Encoding, FnSink, Sink, SinkError, StreamSink};
use crate::terminal::{self, AnsiTranslator, CrosstermProbe, MAX_WIDTH, SizeProbe, WriterConfig};

/// Style flags for a single write, e.g. `&[("bold", true), ("red", true)]`.
pub type Flags<'f> = &'f [(&'f str, bool)];

/// Length and display width of the text written since the last line break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentLine {
    /// Characters (code points) on the current line.
    pub chars: usize,
    /// Terminal columns occupied by the current line.
    pub width: usize,
}

impl CurrentLine {
    /// Account for a written fragment.
    ///
    /// `fragment` is the text after the last line break of a write. When the
    /// write contained a line break the previous line is finished and the
    /// fragment starts a new one; otherwise it extends the current line.
    pub fn advance(&mut self, fragment: &str, line_break: bool) {
        let chars = cells::char_count(fragment);
        let width = cells::display_width(fragment);
        if line_break {
            self.chars = chars;
            self.width = width;
        } else {
            self.chars += chars;
            self.width += width;
        }
    }
}

/// A message for [`TerminalWriter::write`]: text or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<'a> {
    /// Text, encoded by the sink.
    Text(Cow<'a, str>),
    /// Bytes, passed to the sink untouched.
    Bytes(Cow<'a, [u8]>),
}

impl Message<'_> {
    /// Render any displayable value as a text message.
    pub fn display(value: &(impl fmt::Display + ?Sized)) -> Message<'static> {
        Message::Text(Cow::Owned(value.to_string()))
    }

    /// Whether the message holds nothing to write.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Bytes(bytes) => bytes.is_empty(),
        }
    }

    /// The fragment after the last line break, and whether there was one.
    fn trailing_fragment(&self) -> (Cow<'_, str>, bool) {
        match self {
            Self::Text(text) => match text.rsplit_once('\n') {
                Some((_, tail)) => (Cow::Borrowed(tail), true),
                None => (Cow::Borrowed(text.as_ref()), false),
            },
            Self::Bytes(bytes) => match bytes.iter().rposition(|&b| b == b'\n') {
                Some(pos) => (String::from_utf8_lossy(&bytes[pos + 1..]), true),
                None => (String::from_utf8_lossy(bytes), false),
            },
        }
    }
}

impl<'a> From<&'a str> for Message<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for Message<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for Message<'_> {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl From<char> for Message<'_> {
    fn from(c: char) -> Self {
        Self::Text(Cow::Owned(c.to_string()))
    }
}

impl<'a> From<Cow<'a, str>> for Message<'a> {
    fn from(text: Cow<'a, str>) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Message<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(Cow::Borrowed(bytes))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Message<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::Bytes(Cow::Borrowed(bytes.as_slice()))
    }
}

impl From<Vec<u8>> for Message<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Cow::Owned(bytes))
    }
}

/// Writes text with optional ANSI markup and draws separator rules.
///
/// # Example
///
/// ```rust
/// use termwriter::{TerminalWriter, WriterConfig};
///
/// let mut tw = TerminalWriter::builder()
///     .writer(Vec::new())
///     .config(WriterConfig::default().reserve_last_column(false))
///     .markup(false)
///     .build();
/// tw.sep("=", Some("session starts"), Some(40), &[]).unwrap();
/// tw.write("collected 3 items").unwrap();
/// assert_eq!(tw.current_line().chars, 17);
/// ```
pub struct TerminalWriter {
    sink: Box<dyn Sink>,
    encoding: Encoding,
    has_markup: bool,
    current_line: CurrentLine,
    width_override: Option<usize>,
    config: WriterConfig,
    size_probe: Box<dyn SizeProbe>,
    host_env: Vec<(&'static str, &'static str)>,
}

impl fmt::Debug for TerminalWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalWriter")
            .field("encoding", &self.encoding)
            .field("has_markup", &self.has_markup)
            .field("current_line", &self.current_line)
            .field("width_override", &self.width_override)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TerminalWriter {
    /// Create a builder for custom configuration.
    #[must_use]
    pub fn builder() -> TerminalWriterBuilder {
        TerminalWriterBuilder::default()
    }

    /// Writer for standard output, configured from the environment.
    #[must_use]
    pub fn stdout() -> Self {
        Self::builder().build()
    }

    /// Writer for `sink`, configured from the environment.
    #[must_use]
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self::builder().sink(sink).build()
    }

    /// Writer that hands every chunk of output to `consumer`.
    #[must_use]
    pub fn from_fn(consumer: impl FnMut(&[u8]) + 'static, encoding: Option<Encoding>) -> Self {
        let mut builder = Self::builder().callback(consumer);
        if let Some(encoding) = encoding {
            builder = builder.encoding(encoding);
        }
        builder.build()
    }

    /// Whether writes are wrapped in ANSI markup.
    #[must_use]
    pub const fn has_markup(&self) -> bool {
        self.has_markup
    }

    /// Turn markup on or off after construction.
    pub fn set_markup(&mut self, enabled: bool) {
        self.has_markup = enabled;
    }

    /// Encoding resolved at construction.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The unterminated tail of everything written so far.
    #[must_use]
    pub const fn current_line(&self) -> CurrentLine {
        self.current_line
    }

    /// Characters on the current line.
    #[must_use]
    pub const fn chars_on_current_line(&self) -> usize {
        self.current_line.chars
    }

    /// Display width of the current line.
    #[must_use]
    pub const fn width_of_current_line(&self) -> usize {
        self.current_line.width
    }

    /// Configuration the writer was built with.
    #[must_use]
    pub const fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Environment variables the caller should export for hosting
    /// consoles, e.g. IDE run windows once translated markup is active.
    #[must_use]
    pub fn host_env(&self) -> &[(&'static str, &'static str)] {
        &self.host_env
    }

    /// Terminal width in columns.
    ///
    /// Returns the override when one is set. Otherwise the size probe is
    /// queried; failures other than [`io::ErrorKind::Interrupted`] are
    /// treated as an unknown size, and unknown or implausibly small sizes
    /// fall back per [`WriterConfig::sanitize_width`].
    pub fn fullwidth(&self) -> Result<usize, WriteError> {
        if let Some(width) = self.width_override {
            return Ok(width);
        }

        let probed = match self.size_probe.columns() {
            Ok(columns) => columns,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                return Err(WriteError::Interrupted(err));
            }
            Err(err) => {
                log::debug!("terminal size query failed: {err}");
                0
            }
        };

        let width = self.config.sanitize_width(probed);
        log::trace!("terminal width: probed {probed}, using {width}");
        Ok(width)
    }

    /// Fix the width used by [`fullwidth`](Self::fullwidth). The value is
    /// clamped to `1..=MAX_WIDTH`.
    pub fn set_fullwidth(&mut self, width: usize) {
        self.width_override = Some(width.clamp(1, MAX_WIDTH));
    }

    /// Go back to querying the terminal for its width.
    pub fn clear_fullwidth(&mut self) {
        self.width_override = None;
    }

    /// Build the separator line that [`sep`](Self::sep) would write,
    /// without the trailing line break.
    ///
    /// With a title the line is `"<fill> <title> <fill>"`, where each fill
    /// repeats `sepchar` at least once. Without one, `sepchar` is repeated to
    /// fill the width. In both cases one more right-trimmed `sepchar` is
    /// appended when it still fits. Lengths are counted in characters and
    /// the width is capped at [`MAX_WIDTH`].
    pub fn rule_line(
        &self,
        sepchar: &str,
        title: Option<&str>,
        width: Option<usize>,
    ) -> Result<String, WriteError> {
        let sep_len = to_signed(cells::char_count(sepchar));
        if sep_len == 0 {
            return Err(WriteError::EmptySeparator);
        }

        let mut width = to_signed(match width {
            Some(width) => width.min(MAX_WIDTH),
            None => self.fullwidth()?,
        });
        if self.config.reserve_last_column {
            // Printing into the last column wraps on some consoles.
            width -= 1;
        }

        let mut line = match title {
            Some(title) => {
                let title_len = to_signed(cells::char_count(title));
                let count = (width - title_len - 2).div_euclid(2 * sep_len).max(1);
                let fill = sepchar.repeat(count.unsigned_abs());
                format!("{fill} {title} {fill}")
            }
            None => sepchar.repeat(width.div_euclid(sep_len).max(0).unsigned_abs()),
        };

        let trimmed = sepchar.trim_end();
        if to_signed(cells::char_count(&line) + cells::char_count(trimmed)) <= width {
            line.push_str(trimmed);
        }

        Ok(line)
    }

    /// Write a horizontal rule followed by a line break.
    ///
    /// `width` defaults to [`fullwidth`](Self::fullwidth). The rule is
    /// styled with `flags`; the line break is not.
    pub fn sep(
        &mut self,
        sepchar: &str,
        title: Option<&str>,
        width: Option<usize>,
        flags: Flags<'_>,
    ) -> Result<(), WriteError> {
        let line = self.rule_line(sepchar, title, width)?;
        self.write_styled(line, flags)?;
        self.write("\n")
    }

    /// Write a message without styling.
    pub fn write<'m>(&mut self, message: impl Into<Message<'m>>) -> Result<(), WriteError> {
        self.write_styled(message, &[])
    }

    /// Write any displayable value, styled with `flags`.
    pub fn write_display(
        &mut self,
        value: &(impl fmt::Display + ?Sized),
        flags: Flags<'_>,
    ) -> Result<(), WriteError> {
        self.write_styled(Message::display(value), flags)
    }

    /// Write a message styled with `flags`.
    ///
    /// Empty messages are ignored. Line tracking is updated before styling.
    /// Flags are only interpreted when markup is enabled; an unknown flag
    /// name then fails with [`WriteError::InvalidMarkup`].
    pub fn write_styled<'m>(
        &mut self,
        message: impl Into<Message<'m>>,
        flags: Flags<'_>,
    ) -> Result<(), WriteError> {
        let message = message.into();
        if message.is_empty() {
            return Ok(());
        }

        let (fragment, line_break) = message.trailing_fragment();
        self.current_line.advance(&fragment, line_break);

        let codes = if self.has_markup && !flags.is_empty() {
            markup::resolve(flags)?
        } else {
            Vec::new()
        };

        match message {
            Message::Text(text) => {
                let styled = markup::apply(&text, &codes);
                self.emit_text(&styled)
            }
            Message::Bytes(bytes) => {
                let styled = markup::apply_bytes(&bytes, &codes);
                self.sink.write_bytes(&styled)?;
                self.sink.flush()?;
                Ok(())
            }
        }
    }

    fn emit_text(&mut self, text: &str) -> Result<(), WriteError> {
        match self.sink.write_text(text) {
            Ok(()) => {}
            Err(SinkError::Io(err)) => return Err(err.into()),
            Err(SinkError::Encoding(err)) => {
                log::debug!("direct write failed: {err}");
                if let Some(encoding) = self.sink.encoding() {
                    match encoding.encode(text) {
                        Ok(bytes) => {
                            self.sink.write_bytes(&bytes)?;
                            self.sink.flush()?;
                            return Ok(());
                        }
                        Err(err) => log::debug!("sink encoding rejected text: {err}"),
                    }
                }
                self.sink.write_text(&sink::escape_non_ascii(text))?;
            }
        }
        self.sink.flush()?;
        Ok(())
    }
}

fn to_signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

enum PendingSink {
    Sink(Box<dyn Sink>),
    Callback(Box<dyn FnMut(&[u8])>),
}

/// Builder for creating a [`TerminalWriter`] with custom settings.
#[derive(Default)]
pub struct TerminalWriterBuilder {
    sink: Option<PendingSink>,
    encoding: Option<Encoding>,
    config: Option<WriterConfig>,
    markup: Option<bool>,
    width: Option<usize>,
    size_probe: Option<Box<dyn SizeProbe>>,
    translator: Option<Option<Box<dyn AnsiTranslator>>>,
}

impl fmt::Debug for TerminalWriterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalWriterBuilder")
            .field("encoding", &self.encoding)
            .field("config", &self.config)
            .field("markup", &self.markup)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

impl TerminalWriterBuilder {
    /// Write into `sink`.
    #[must_use]
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Some(PendingSink::Sink(Box::new(sink)));
        self
    }

    /// Write into an [`io::Write`] stream (non-terminal, UTF-8).
    #[must_use]
    pub fn writer(self, writer: impl Write + 'static) -> Self {
        self.sink(StreamSink::new(writer))
    }

    /// Hand output to `consumer`, encoded with the builder's encoding.
    #[must_use]
    pub fn callback(mut self, consumer: impl FnMut(&[u8]) + 'static) -> Self {
        self.sink = Some(PendingSink::Callback(Box::new(consumer)));
        self
    }

    /// Set the encoding instead of taking the sink's.
    #[must_use]
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Use `config` instead of reading the environment.
    #[must_use]
    pub fn config(mut self, config: WriterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Force markup on or off, skipping detection.
    #[must_use]
    pub fn markup(mut self, enabled: bool) -> Self {
        self.markup = Some(enabled);
        self
    }

    /// Start with a fixed width override.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Query terminal width through `probe`.
    #[must_use]
    pub fn size_probe(mut self, probe: impl SizeProbe + 'static) -> Self {
        self.size_probe = Some(Box::new(probe));
        self
    }

    /// Use `translator` for ANSI console translation.
    #[must_use]
    pub fn translator(mut self, translator: impl AnsiTranslator + 'static) -> Self {
        self.translator = Some(Some(Box::new(translator)));
        self
    }

    /// Behave as if no ANSI console translator is available.
    #[must_use]
    pub fn no_translator(mut self) -> Self {
        self.translator = Some(None);
        self
    }

    /// Build the writer.
    #[must_use]
    pub fn build(self) -> TerminalWriter {
        let mut sink: Box<dyn Sink> = match self.sink {
            Some(PendingSink::Sink(sink)) => sink,
            Some(PendingSink::Callback(consumer)) => match self.encoding {
                Some(encoding) => Box::new(FnSink::with_encoding(consumer, encoding)),
                None => Box::new(FnSink::new(consumer)),
            },
            None => Box::new(StreamSink::stdout()),
        };

        let config = self.config.unwrap_or_else(WriterConfig::from_env);
        let has_markup = self
            .markup
            .unwrap_or_else(|| config.markup_enabled(sink.is_terminal()));

        let mut host_env = Vec::new();
        if config.translate_ansi {
            let translator = self.translator.unwrap_or_else(terminal::platform_translator);
            match translator {
                Some(translator) if translator.activate() => {
                    sink = translator.wrap(sink);
                    if has_markup {
                        host_env.push((terminal::IDE_HOSTED_ENV, "1"));
                    }
                }
                _ => log::info!(
                    "ANSI console translation unavailable; styled output is written untranslated"
                ),
            }
        }

        let encoding = self
            .encoding
            .or_else(|| sink.encoding())
            .unwrap_or_default();

        TerminalWriter {
            sink,
            encoding,
            has_markup,
            current_line: CurrentLine::default(),
            width_override: self.width.map(|width| width.clamp(1, MAX_WIDTH)),
            config,
            size_probe: self
                .size_probe
                .unwrap_or_else(|| Box::new(CrosstermProbe)),
            host_env,
        }
    }
}
