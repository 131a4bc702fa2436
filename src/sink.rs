//! Output sinks the writer emits into.
//!
//! A [`Sink`] is anything that accepts text and raw bytes. Two
//! implementations are provided: [`StreamSink`] over any [`io::Write`], and
//! [`FnSink`], which adapts a plain callback into a sink.

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::str::FromStr;

/// Text encodings a sink can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// UTF-8; every character is representable.
    #[default]
    Utf8,
    /// 7-bit ASCII.
    Ascii,
    /// ISO-8859-1, one byte per code point up to U+00FF.
    Latin1,
}

impl Encoding {
    /// Canonical label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Ascii => "ascii",
            Self::Latin1 => "latin-1",
        }
    }

    fn max_code_point(self) -> u32 {
        match self {
            Self::Utf8 => u32::from(char::MAX),
            Self::Ascii => 0x7f,
            Self::Latin1 => 0xff,
        }
    }

    /// Encode `text`, failing on the first character the encoding cannot
    /// represent.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, EncodeError> {
        if self == Self::Utf8 {
            return Ok(text.as_bytes().to_vec());
        }
        let max = self.max_code_point();
        text.chars()
            .map(|c| {
                let code = u32::from(c);
                if code <= max {
                    // Bounded by `max`, which is at most 0xff here.
                    Ok(code as u8)
                } else {
                    Err(EncodeError {
                        encoding: self,
                        character: c,
                    })
                }
            })
            .collect()
    }

    /// Encode `text`, replacing unrepresentable characters with `?`.
    #[must_use]
    pub fn encode_lossy(self, text: &str) -> Vec<u8> {
        if self == Self::Utf8 {
            return text.as_bytes().to_vec();
        }
        let max = self.max_code_point();
        text.chars()
            .map(|c| {
                let code = u32::from(c);
                if code <= max { code as u8 } else { b'?' }
            })
            .collect()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an encoding label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEncoding(pub String);

impl fmt::Display for UnknownEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown encoding: {}", self.0)
    }
}

impl std::error::Error for UnknownEncoding {}

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase().replace('_', "-");
        match label.as_str() {
            "utf-8" | "utf8" | "u8" => Ok(Self::Utf8),
            "ascii" | "us-ascii" | "646" => Ok(Self::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" => Ok(Self::Latin1),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

/// A character could not be represented in the target encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeError {
    /// Encoding that rejected the character.
    pub encoding: Encoding,
    /// First offending character.
    pub character: char,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' codec can't encode character {:?} (U+{:04X})",
            self.encoding,
            self.character,
            u32::from(self.character)
        )
    }
}

impl std::error::Error for EncodeError {}

/// Replace every non-ASCII character with a backslash escape.
///
/// Code points up to U+00FF become `\xNN`, the rest of the BMP `\uNNNN`,
/// and everything above `\UNNNNNNNN`. ASCII passes through untouched.
#[must_use]
pub fn escape_non_ascii(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        let code = u32::from(c);
        match code {
            0..=0x7f => escaped.push(c),
            0x80..=0xff => escaped.push_str(&format!("\\x{code:02x}")),
            0x100..=0xffff => escaped.push_str(&format!("\\u{code:04x}")),
            _ => escaped.push_str(&format!("\\U{code:08x}")),
        }
    }
    escaped
}

/// Failure reported by a sink.
#[derive(Debug)]
pub enum SinkError {
    /// The text holds a character the sink cannot represent.
    Encoding(EncodeError),
    /// The underlying destination failed.
    Io(io::Error),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "sink write failed: {err}"),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encoding(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<EncodeError> for SinkError {
    fn from(err: EncodeError) -> Self {
        Self::Encoding(err)
    }
}

impl From<io::Error> for SinkError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Destination for writer output.
pub trait Sink {
    /// Write text, encoding it as the sink sees fit.
    fn write_text(&mut self, text: &str) -> Result<(), SinkError>;

    /// Write already-encoded bytes.
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Flush buffered output.
    fn flush(&mut self) -> io::Result<()>;

    /// Whether the destination is an interactive terminal.
    fn is_terminal(&self) -> bool {
        false
    }

    /// Encoding the destination declares, if any.
    fn encoding(&self) -> Option<Encoding> {
        None
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write_text(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).write_text(text)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_bytes(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn is_terminal(&self) -> bool {
        (**self).is_terminal()
    }

    fn encoding(&self) -> Option<Encoding> {
        (**self).encoding()
    }
}

/// Sink over any [`io::Write`] stream.
///
/// Text is encoded strictly with the stream's encoding (UTF-8 unless set
/// otherwise), so an ASCII stream rejects non-ASCII text with
/// [`SinkError::Encoding`].
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    inner: W,
    encoding: Encoding,
    is_terminal: bool,
}

impl<W: Write> StreamSink<W> {
    /// Wrap a stream. The stream is treated as a non-terminal UTF-8 stream.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            encoding: Encoding::Utf8,
            is_terminal: false,
        }
    }

    /// Set the stream encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Declare whether the stream is an interactive terminal.
    #[must_use]
    pub fn with_terminal(mut self, is_terminal: bool) -> Self {
        self.is_terminal = is_terminal;
        self
    }

    /// Borrow the wrapped stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl StreamSink<io::Stdout> {
    /// Standard output, with terminal detection.
    #[must_use]
    pub fn stdout() -> Self {
        let stdout = io::stdout();
        let is_terminal = stdout.is_terminal();
        Self::new(stdout).with_terminal(is_terminal)
    }
}

impl StreamSink<io::Stderr> {
    /// Standard error, with terminal detection.
    #[must_use]
    pub fn stderr() -> Self {
        let stderr = io::stderr();
        let is_terminal = stderr.is_terminal();
        Self::new(stderr).with_terminal(is_terminal)
    }
}

impl<W: Write> Sink for StreamSink<W> {
    fn write_text(&mut self, text: &str) -> Result<(), SinkError> {
        let bytes = self.encoding.encode(text)?;
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    fn encoding(&self) -> Option<Encoding> {
        Some(self.encoding)
    }
}

/// Adapter turning a single-argument callback into a [`Sink`].
///
/// Text is encoded with the configured encoding, replacing characters it
/// cannot represent. Flushing does nothing.
pub struct FnSink<F: FnMut(&[u8])> {
    consumer: F,
    encoding: Option<Encoding>,
}

impl<F: FnMut(&[u8])> FnSink<F> {
    /// Wrap `consumer`; text is passed on as UTF-8.
    pub fn new(consumer: F) -> Self {
        Self {
            consumer,
            encoding: None,
        }
    }

    /// Wrap `consumer`, encoding text with `encoding` first.
    pub fn with_encoding(consumer: F, encoding: Encoding) -> Self {
        Self {
            consumer,
            encoding: Some(encoding),
        }
    }
}

impl<F: FnMut(&[u8])> fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSink")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl<F: FnMut(&[u8])> Sink for FnSink<F> {
    fn write_text(&mut self, text: &str) -> Result<(), SinkError> {
        match self.encoding {
            Some(encoding) => (self.consumer)(&encoding.encode_lossy(text)),
            None => (self.consumer)(text.as_bytes()),
        }
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        (self.consumer)(bytes);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }
}
