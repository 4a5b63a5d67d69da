//! Log sinks: where a run's records go.
//!
//! The driver and parsers never talk to a logger directly; they go through
//! [`RunLog`], which stamps every record with the run's correlation id and a
//! timestamp and hands it to a [`LogSink`]. The binary uses [`TracingSink`];
//! tests and embedders can use [`MemorySink`] or [`WriterSink`].
use std::io::Write;

use tracing::{info, warn};

use crate::error::Result;
use crate::logging::WriteFailures;
use crate::types::{CorrelationId, LogRecord, Severity};

pub trait LogSink {
    fn emit(&mut self, record: &LogRecord) -> Result<()>;
}

impl<T: LogSink + ?Sized> LogSink for &mut T {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        (**self).emit(record)
    }
}

/// Forwards records to the process-wide `tracing` subscriber.
///
/// Every line of the message carries the `[<id>]` tag, so multi-line records
/// stay attributable in text output.
#[derive(Debug, Default, Clone)]
pub struct TracingSink {
    failures: WriteFailures,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the emit once the subscriber's writer has reported an error.
    pub fn watching(failures: WriteFailures) -> Self {
        Self { failures }
    }
}

impl LogSink for TracingSink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let id = &record.correlation_id;
        let ts = record.timestamp_rfc3339();
        let message = record.tagged_message();
        match record.severity {
            Severity::Info => info!(correlation_id = %id, timestamp = %ts, "{}", message),
            Severity::Warn => warn!(correlation_id = %id, timestamp = %ts, "{}", message),
        }
        match self.failures.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

/// Writes `<ts> <LEVEL> [<id>] <line>` for every line of every record.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LogSink for WriterSink<W> {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let ts = record.timestamp_rfc3339();
        for line in record.message.split('\n') {
            writeln!(
                self.writer,
                "{} {:<5} [{}] {}",
                ts, record.severity, record.correlation_id, line
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every record in memory, in emission order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Vec<LogRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn messages(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.message.as_str()).collect()
    }

    pub fn into_records(self) -> Vec<LogRecord> {
        self.records
    }
}

impl LogSink for MemorySink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Per-run emitter bound to one correlation id.
pub struct RunLog<'a> {
    correlation_id: CorrelationId,
    sink: &'a mut dyn LogSink,
    emitted: usize,
}

impl<'a> RunLog<'a> {
    pub fn new(correlation_id: CorrelationId, sink: &'a mut dyn LogSink) -> Self {
        Self {
            correlation_id,
            sink,
            emitted: 0,
        }
    }

    pub fn info(&mut self, message: impl Into<String>) -> Result<()> {
        self.emit(Severity::Info, message.into())
    }

    pub fn warn(&mut self, message: impl Into<String>) -> Result<()> {
        self.emit(Severity::Warn, message.into())
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Number of records successfully handed to the sink so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn emit(&mut self, severity: Severity, message: String) -> Result<()> {
        let record = LogRecord::new(&self.correlation_id, severity, message);
        self.sink.emit(&record)?;
        self.emitted += 1;
        Ok(())
    }
}
