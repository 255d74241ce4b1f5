//! Where the raw edge list comes from: a file, stdin, or an external
//! command such as `go mod graph`.

pub mod command;
pub mod file;
pub mod stdin;
pub mod traits;

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

pub use command::CommandSource;
pub use file::{BytesSource, FileSource};
pub use stdin::{stdin_source, StdinSource, TimedReaderSource};
pub use traits::EdgeSource;

use crate::config::InputSettings;
use crate::error::Result;

/// Uses `fallback` when `primary` produces no bytes.
pub struct FallbackSource {
    pub primary: Box<dyn EdgeSource>,
    pub fallback: Box<dyn EdgeSource>,
}

impl EdgeSource for FallbackSource {
    fn describe(&self) -> String {
        format!(
            "{}, falling back to {}",
            self.primary.describe(),
            self.fallback.describe()
        )
    }

    fn read(&mut self) -> Result<Vec<u8>> {
        let data = self.primary.read()?;
        if !data.is_empty() {
            return Ok(data);
        }
        info!(
            primary = %self.primary.describe(),
            fallback = %self.fallback.describe(),
            "no input received, using fallback"
        );
        self.fallback.read()
    }
}

/// `Some(path)` reads that file (`-` is stdin without fallback). `None`
/// waits briefly on stdin and otherwise runs the configured command.
pub fn select_source(input: Option<&Path>, settings: &InputSettings) -> Box<dyn EdgeSource> {
    let timeout = Duration::from_millis(settings.stdin_timeout_ms);
    let source: Box<dyn EdgeSource> = match input {
        Some(path) if path == Path::new("-") => Box::new(stdin_source(timeout)),
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(FallbackSource {
            primary: Box::new(stdin_source(timeout)),
            fallback: Box::new(CommandSource::new(settings.command.clone())),
        }),
    };
    debug!(source = %source.describe(), "selected edge source");
    source
}
