//! Append-only file sink

use crate::core::{Encoder, LevelController, LogEntry, LogLevel, LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes encoded records to a file opened once in append mode
///
/// Existing content is never truncated. The handle stays open until the sink
/// is dropped; [`Sink::flush`] also syncs the data to disk.
pub struct FileSink {
    path: PathBuf,
    name: String,
    writer: Mutex<BufWriter<File>>,
    encoder: Encoder,
    level: LevelController,
}

impl FileSink {
    /// Open (creating if absent) `path` for appending
    ///
    /// Parent directories are not created.
    pub fn open(path: impl Into<PathBuf>, encoder: Encoder, level: LevelController) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::sink_open(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            name: format!("file:{}", path.display()),
            path,
            writer: Mutex::new(BufWriter::new(file)),
            encoder,
            level,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn enabled(&self, level: LogLevel) -> bool {
        self.level.enabled(level)
    }

    fn write(&self, entry: &LogEntry) -> Result<()> {
        let record = self.encoder.encode(entry)?;
        self.writer.lock().write_all(&record).map_err(|e| {
            LoggerError::io_operation("writing log file", self.path.display().to_string(), e)
        })
    }

    fn flush(&self) -> Result<()> {
        let mut writer = self.writer.lock();
        writer.flush()?;
        writer.get_ref().sync_data()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.get_mut().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fields;
    use tempfile::TempDir;

    #[test]
    fn test_appends_without_truncating() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("app.log");
        std::fs::write(&path, "existing line\n").expect("seed file");

        let sink = FileSink::open(&path, Encoder::json(), LevelController::new(LogLevel::Info))
            .expect("open");
        sink.write(&LogEntry::new(LogLevel::Info, "appended").with_fields(Fields::new().with("a", 1)))
            .expect("write");
        sink.flush().expect("flush");

        let content = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "existing line");
        assert!(lines[1].contains("\"message\":\"appended\""));
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("missing").join("app.log");

        let result = FileSink::open(&path, Encoder::console(), LevelController::default());
        assert!(matches!(result, Err(LoggerError::SinkOpen { .. })));
    }

    #[test]
    fn test_level_gate() {
        let dir = TempDir::new().expect("temp dir");
        let level = LevelController::new(LogLevel::Warn);
        let sink = FileSink::open(dir.path().join("gate.log"), Encoder::console(), level.clone())
            .expect("open");

        assert!(!sink.enabled(LogLevel::Info));
        level.set(LogLevel::Debug);
        assert!(sink.enabled(LogLevel::Info));
    }

    #[test]
    fn test_drop_flushes() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("drop.log");
        {
            let sink = FileSink::open(&path, Encoder::console(), LevelController::default())
                .expect("open");
            sink.write(&LogEntry::new(LogLevel::Error, "before drop"))
                .expect("write");
        }

        let content = std::fs::read_to_string(&path).expect("read");
        assert!(content.contains("before drop"));
    }
}
