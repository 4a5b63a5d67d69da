//! Shared types used across the job.
//! Includes `CorrelationId`, `PayloadShape`, `Severity` and `LogRecord`.
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const CORRELATION_PREFIX: &str = "batch-job-";

/// Identifier attached to every record of a single run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Fresh `batch-job-<uuid-v4>` id.
    pub fn generate() -> Self {
        Self(format!("{CORRELATION_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id has the `batch-job-<uuid>` form.
    pub fn is_well_formed(&self) -> bool {
        self.0
            .strip_prefix(CORRELATION_PREFIX)
            .is_some_and(|rest| Uuid::parse_str(rest).is_ok())
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PayloadShape {
    Empty,
    Json,
    KeyValues,
}

impl std::fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PayloadShape::Empty => "Empty",
            PayloadShape::Json => "Json",
            PayloadShape::KeyValues => "KeyValues",
        };
        write!(f, "{}", s)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
}

impl Severity {
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            Severity::Info => tracing::Level::INFO,
            Severity::Warn => tracing::Level::WARN,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
        })
    }
}

/// One entry of the run's log trail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub correlation_id: CorrelationId,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl LogRecord {
    pub fn new(correlation_id: &CorrelationId, severity: Severity, message: String) -> Self {
        Self {
            correlation_id: correlation_id.clone(),
            severity,
            timestamp: Utc::now(),
            message,
        }
    }

    /// RFC 3339 UTC timestamp with millisecond precision.
    pub fn timestamp_rfc3339(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    /// The message with `[<id>] ` in front of each of its lines.
    pub fn tagged_message(&self) -> String {
        let tag = format!("[{}] ", self.correlation_id);
        self.message
            .split('\n')
            .map(|line| format!("{tag}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let a = CorrelationId::generate();
        let b = CorrelationId::generate();
        assert!(a.as_str().starts_with("batch-job-"));
        assert!(a.is_well_formed());
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert!(!CorrelationId("batch-job-nope".to_string()).is_well_formed());
        assert!(!CorrelationId(Uuid::new_v4().to_string()).is_well_formed());
    }

    #[test]
    fn severity_maps_to_tracing_levels() {
        assert_eq!(Severity::Info.as_tracing_level(), tracing::Level::INFO);
        assert_eq!(Severity::Warn.as_tracing_level(), tracing::Level::WARN);
        assert_eq!(Severity::Warn.to_string(), "WARN");
    }

    #[test]
    fn timestamps_render_in_utc_millis() {
        let id = CorrelationId::generate();
        let record = LogRecord::new(&id, Severity::Info, "hello".to_string());
        let ts = record.timestamp_rfc3339();
        assert!(ts.ends_with('Z'), "unexpected: {ts}");
        assert_eq!(ts.split('.').nth(1).map(str::len), Some(4));
    }

    #[test]
    fn tagged_message_prefixes_each_line() {
        let id = CorrelationId::generate();
        let single = LogRecord::new(&id, Severity::Info, "one".to_string());
        assert_eq!(single.tagged_message(), format!("[{id}] one"));

        let multi = LogRecord::new(&id, Severity::Warn, "a\n\nb".to_string());
        assert_eq!(multi.tagged_message(), format!("[{id}] a\n[{id}] \n[{id}] b"));
    }
}
