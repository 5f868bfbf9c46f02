// tenet-core/src/infrastructure/io/stdio.rs

use crate::domain::model::{Data, Severity};
use crate::error::TenetError;
use crate::ports::Writer;
use colored::{ColoredString, Colorize};
use std::io::Write as _;
use std::sync::Mutex;

/// Terminal writer. Colors the whole block by severity and serializes
/// writes so one document's bytes never interleave with another's.
pub struct StdWriter {
    severity: Severity,
    guard: Mutex<()>,
}

impl StdWriter {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            guard: Mutex::new(()),
        }
    }

    fn colorize(&self, text: String) -> ColoredString {
        match self.severity {
            Severity::Error => text.bright_red(),
            Severity::Warning => text.bright_yellow(),
            Severity::Success => text.bright_green(),
            Severity::Info => text.bright_white(),
        }
    }
}

impl Writer for StdWriter {
    fn write(&self, data: &Data) -> Result<(), TenetError> {
        let separator = "-".repeat(data.path.len());
        let block = format!(
            "{separator}\n{path}\n{separator}\n{content}\n",
            path = data.path,
            content = String::from_utf8_lossy(&data.content),
        );
        let painted = self.colorize(block);

        let _guard = self.guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(painted.to_string().as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}
