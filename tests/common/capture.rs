//! In-memory sinks for capturing writer output.

#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use termwriter::prelude::*;
use termwriter::sink::EncodeError;

/// Shared byte buffer; clones see the same contents.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Everything written so far, as raw bytes.
    pub fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Calls a sink received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Text(String),
    Bytes(Vec<u8>),
    Flush,
}

/// A scripted sink that records every call.
///
/// `text_limit` makes `write_text` reject characters above a code point,
/// independently of the `encoding` it reports. This models byte-oriented
/// streams whose text path is narrower than their declared encoding.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    text_limit: Option<(u32, Encoding)>,
    encoding: Option<Encoding>,
    terminal: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            text_limit: None,
            encoding: None,
            terminal: false,
        }
    }

    /// Reject text holding characters above `max` on the text path.
    pub fn reject_text_above(mut self, max: u32, reported_as: Encoding) -> Self {
        self.text_limit = Some((max, reported_as));
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Handle to the recorded calls.
    pub fn calls(&self) -> Arc<Mutex<Vec<SinkCall>>> {
        Arc::clone(&self.calls)
    }
}

impl Sink for RecordingSink {
    fn write_text(&mut self, text: &str) -> Result<(), SinkError> {
        if let Some((max, encoding)) = self.text_limit
            && let Some(character) = text.chars().find(|&c| u32::from(c) > max)
        {
            return Err(SinkError::Encoding(EncodeError { encoding, character }));
        }
        self.calls.lock().unwrap().push(SinkCall::Text(text.to_string()));
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.calls.lock().unwrap().push(SinkCall::Bytes(bytes.to_vec()));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.calls.lock().unwrap().push(SinkCall::Flush);
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }
}

/// A config with no environment influence and no platform quirks.
pub fn quiet_config() -> WriterConfig {
    WriterConfig::default()
        .translate_ansi(false)
        .reserve_last_column(false)
}

/// Writer over a shared buffer with markup forced as given.
pub fn capture_writer(markup: bool) -> (TerminalWriter, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let tw = TerminalWriter::builder()
        .writer(buffer.clone())
        .config(quiet_config())
        .size_probe(FixedProbe::width(80))
        .markup(markup)
        .build();
    (tw, buffer)
}
