//! Process-wide `tracing` setup and a capturing layer for inspecting events.
use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};

use tracing::{Event, Subscriber, field::Visit};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};

use crate::error::{Error, Result};

/// Env var selecting the output format (`text` or `json`).
pub const LOG_FORMAT_ENV: &str = "BATCH_JOB_LOG_FORMAT";

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Install the global stdout subscriber. `RUST_LOG` overrides the `info` default.
///
/// The fmt layer swallows write errors, so stdout is wrapped in a
/// [`CheckedMakeWriter`]; the returned handle reports the first failure.
pub fn init(format: LogFormat) -> Result<WriteFailures> {
    let failures = WriteFailures::default();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stdout().is_terminal())
        .with_writer(CheckedMakeWriter::new(io::stdout, failures.clone()));

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(Error::sink)?;
    Ok(failures)
}

/// Shared slot holding the first write error seen by a [`CheckedWriter`].
#[derive(Clone, Debug, Default)]
pub struct WriteFailures {
    first: Arc<Mutex<Option<io::Error>>>,
}

impl WriteFailures {
    fn record(&self, err: &io::Error) {
        if let Ok(mut slot) = self.first.lock() {
            if slot.is_none() {
                *slot = Some(io::Error::new(err.kind(), err.to_string()));
            }
        }
    }

    /// Removes and returns the recorded failure, if any.
    pub fn take(&self) -> Option<io::Error> {
        self.first.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// `MakeWriter` wrapper that records write errors before passing them on.
#[derive(Clone, Debug)]
pub struct CheckedMakeWriter<M> {
    inner: M,
    failures: WriteFailures,
}

impl<M> CheckedMakeWriter<M> {
    pub fn new(inner: M, failures: WriteFailures) -> Self {
        Self { inner, failures }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for CheckedMakeWriter<M> {
    type Writer = CheckedWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        CheckedWriter {
            inner: self.inner.make_writer(),
            failures: self.failures.clone(),
        }
    }
}

pub struct CheckedWriter<W> {
    inner: W,
    failures: WriteFailures,
}

impl<W: Write> Write for CheckedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf).inspect_err(|e| self.failures.record(e))?;
        // stdout is line buffered; surface a failed line now, not at exit
        if buf[..written].contains(&b'\n') {
            self.flush()?;
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().inspect_err(|e| self.failures.record(e))
    }
}

#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: tracing::Level,
    pub timestamp: String,
    pub message: String,
    pub correlation_id: Option<String>,
    pub target: String,
}

/// Layer that keeps a copy of every event it sees.
#[derive(Clone, Default)]
pub struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the captured events; stays valid after the layer is installed.
    pub fn events(&self) -> Arc<Mutex<Vec<CapturedEvent>>> {
        self.events.clone()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    correlation_id: Option<String>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "correlation_id" => self.correlation_id = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "correlation_id" => self.correlation_id = Some(format!("{:?}", value)),
            _ => {}
        }
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let captured = CapturedEvent {
            level: *metadata.level(),
            timestamp: crate::types::format_timestamp(&chrono::Utc::now()),
            message: visitor.message,
            correlation_id: visitor.correlation_id,
            target: metadata.target().to_string(),
        };

        if let Ok(mut buf) = self.events.lock() {
            buf.push(captured);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn log_format_parses_json_case_insensitively() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse("bogus"), LogFormat::Text);
    }

    #[test]
    fn capture_layer_records_message_and_fields() {
        let layer = CaptureLayer::new();
        let events = layer.events();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(correlation_id = "batch-job-x", "disk {} full", "almost");
            tracing::info!("no id here");
        });

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].level, tracing::Level::WARN);
        assert_eq!(events[0].message, "disk almost full");
        assert_eq!(events[0].correlation_id.as_deref(), Some("batch-job-x"));
        assert_eq!(events[1].correlation_id, None);
        assert!(events[0].target.starts_with("batch_job::logging"), "{}", events[0].target);
        assert!(events[0].timestamp.ends_with('Z'), "{}", events[0].timestamp);
    }

    struct FullDevice;

    impl Write for FullDevice {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::StorageFull, "no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn checked_writer_records_the_first_failure() {
        let failures = WriteFailures::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(CheckedMakeWriter::new(|| FullDevice, failures.clone()))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("first");
            tracing::info!("second");
        });

        let err = failures.take().expect("write failure should be recorded");
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
        assert!(failures.take().is_none());
    }

    #[test]
    fn checked_writer_passes_successful_writes_through() {
        let failures = WriteFailures::default();
        let buf = Arc::new(Mutex::new(Vec::new()));
        let make = {
            let buf = buf.clone();
            move || SharedBuf(buf.clone())
        };
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(CheckedMakeWriter::new(make, failures.clone()))
            .finish();

        tracing::subscriber::with_default(subscriber, || tracing::info!("kept"));

        assert!(failures.take().is_none());
        let text = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
        assert!(text.contains("kept"), "{text}");
    }

    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
