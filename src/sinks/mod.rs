//! Concrete sinks and destination resolution

pub mod console;
pub mod file;
pub mod writer;

pub use console::{ConsoleSink, Stream};
pub use file::FileSink;
pub use writer::{SharedBuffer, WriterSink};

use crate::core::config::{STDERR, STDOUT};
use crate::core::{Encoder, LevelController, Result, Sink};

/// Build the sink for one destination specifier
///
/// `stdout` and `stderr` select the standard streams; anything else is a
/// file path opened for appending.
pub fn try_open_destination(
    destination: &str,
    encoder: Encoder,
    level: LevelController,
) -> Result<Box<dyn Sink>> {
    Ok(match destination {
        STDOUT => Box::new(ConsoleSink::stdout(encoder, level)),
        STDERR => Box::new(ConsoleSink::stderr(encoder, level)),
        path => Box::new(FileSink::open(path, encoder, level)?),
    })
}

/// Like [`try_open_destination`], but a destination that cannot be opened
/// is skipped
pub fn open_destination(
    destination: &str,
    encoder: Encoder,
    level: LevelController,
) -> Option<Box<dyn Sink>> {
    try_open_destination(destination, encoder, level).ok()
}
