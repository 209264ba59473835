//! Standard stream sink

use crate::core::{Encoder, LevelController, LogEntry, LogLevel, Result, Sink};
use std::io::Write;

/// Which standard stream a [`ConsoleSink`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

pub struct ConsoleSink {
    stream: Stream,
    encoder: Encoder,
    level: LevelController,
}

impl ConsoleSink {
    pub fn new(stream: Stream, encoder: Encoder, level: LevelController) -> Self {
        Self {
            stream,
            encoder,
            level,
        }
    }

    pub fn stdout(encoder: Encoder, level: LevelController) -> Self {
        Self::new(Stream::Stdout, encoder, level)
    }

    pub fn stderr(encoder: Encoder, level: LevelController) -> Self {
        Self::new(Stream::Stderr, encoder, level)
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }
}

impl Sink for ConsoleSink {
    fn enabled(&self, level: LogLevel) -> bool {
        self.level.enabled(level)
    }

    fn write(&self, entry: &LogEntry) -> Result<()> {
        let record = self.encoder.encode(entry)?;

        // The stream lock keeps one record contiguous across threads
        match self.stream {
            Stream::Stdout => std::io::stdout().lock().write_all(&record)?,
            Stream::Stderr => std::io::stderr().lock().write_all(&record)?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match self.stream {
            Stream::Stdout => std::io::stdout().flush()?,
            Stream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}
