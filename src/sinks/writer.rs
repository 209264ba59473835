//! Injected writer sink

use crate::core::{Encoder, LevelController, LogEntry, LogLevel, Result, Sink};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Writes encoded records to any caller-supplied [`Write`]
pub struct WriterSink {
    writer: Mutex<Box<dyn Write + Send>>,
    encoder: Encoder,
    level: LevelController,
}

impl WriterSink {
    pub fn new(writer: Box<dyn Write + Send>, encoder: Encoder, level: LevelController) -> Self {
        Self {
            writer: Mutex::new(writer),
            encoder,
            level,
        }
    }
}

impl Sink for WriterSink {
    fn enabled(&self, level: LogLevel) -> bool {
        self.level.enabled(level)
    }

    fn write(&self, entry: &LogEntry) -> Result<()> {
        let record = self.encoder.encode(entry)?;
        self.writer.lock().write_all(&record)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "writer"
    }
}

/// In-memory writer whose clones share one buffer
///
/// Handy as the injected writer in tests: keep a clone, hand the other to
/// the pipeline, and inspect what was written.
///
/// # Example
///
/// ```
/// use logpipe::sinks::SharedBuffer;
/// use std::io::Write;
///
/// let buffer = SharedBuffer::new();
/// let mut writer = buffer.clone();
/// writer.write_all(b"one\ntwo\n").unwrap();
///
/// assert_eq!(buffer.lines(), vec!["one", "two"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
