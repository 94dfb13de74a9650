//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use passport_photo_core::{PhotoRecord, ResultOutput};

use super::OutputFormat;

/// Writes records as JSON Lines, or buffers them and writes a single JSON
/// array on [`ResultOutput::flush`].
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    format: OutputFormat,
    pretty: bool,
    pending: Mutex<Option<Vec<PhotoRecord>>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(format: OutputFormat, pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), format, pretty)
    }

    /// Creates a new JSON output writing to the given writer.
    ///
    /// `pretty` only affects [`OutputFormat::Json`].
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, format: OutputFormat, pretty: bool) -> Self {
        let pending = match format {
            OutputFormat::Json => Some(Vec::new()),
            OutputFormat::Jsonl => None,
        };
        Self {
            writer: Mutex::new(writer),
            format,
            pretty,
            pending: Mutex::new(pending),
        }
    }

    /// Writes a batch of records as a JSON array.
    #[allow(clippy::significant_drop_tightening)]
    fn write_array(&self, records: &[PhotoRecord]) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(records)?
        } else {
            serde_json::to_string(records)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, record: &PhotoRecord) -> Result<()> {
        if self.format == OutputFormat::Json {
            let mut pending = self
                .pending
                .lock()
                .map_err(|e| anyhow!("Lock poisoned: {e}"))?;
            pending.get_or_insert_with(Vec::new).push(record.clone());
            return Ok(());
        }

        let json = serde_json::to_string(record)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let batch = self
            .pending
            .lock()
            .map_err(|e| anyhow!("Lock poisoned: {e}"))?
            .take();
        if let Some(records) = batch {
            self.write_array(&records)?;
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
