//! Run driver: one pass from start envelope to finish envelope.
use chrono::Utc;

use crate::config::JobConfig;
use crate::core::classify::classify;
use crate::core::parse::{JsonOutcome, log_json_payload, log_key_value_payload};
use crate::error::Result;
use crate::sink::{LogSink, RunLog};
use crate::types::{CorrelationId, PayloadShape, format_timestamp};

/// What a completed run did, for callers that need more than the log trail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub correlation_id: CorrelationId,
    pub shape: PayloadShape,
    pub records_emitted: usize,
    pub json_warning: bool,
}

/// A single batch task invocation, configured once and run once.
#[derive(Clone, Debug, Default)]
pub struct BatchTask {
    config: JobConfig,
}

impl BatchTask {
    pub fn new(config: JobConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Run with a freshly generated correlation id.
    pub fn run<S: AsRef<str>>(&self, args: &[S], sink: &mut dyn LogSink) -> Result<RunSummary> {
        self.run_with_id(CorrelationId::generate(), args, sink)
    }

    /// Run under a caller-supplied correlation id.
    ///
    /// Only sink failures are returned as errors; malformed JSON payloads are
    /// logged as warnings and the run still completes.
    pub fn run_with_id<S: AsRef<str>>(
        &self,
        correlation_id: CorrelationId,
        args: &[S],
        sink: &mut dyn LogSink,
    ) -> Result<RunSummary> {
        let mut log = RunLog::new(correlation_id.clone(), sink);
        log.info(format!(
            "==== Batch task started at {} ====",
            format_timestamp(&Utc::now())
        ))?;

        let shape = classify(args);
        let mut json_warning = false;

        if shape == PayloadShape::Empty {
            log.warn("No command-line arguments supplied; nothing to process.")?;
        } else {
            log_raw_arguments(&mut log, args)?;
            json_warning = dispatch(&mut log, shape, args)?;
        }

        if let Some(greeting) = self.config.greeting() {
            log.info(format!("Custom greeting: {greeting}"))?;
        }

        log.info(format!(
            "==== Batch task finished at {} ====",
            format_timestamp(&Utc::now())
        ))?;

        let records_emitted = log.emitted();
        Ok(RunSummary {
            correlation_id,
            shape,
            records_emitted,
            json_warning,
        })
    }
}

fn log_raw_arguments<S: AsRef<str>>(log: &mut RunLog<'_>, args: &[S]) -> Result<()> {
    let plural = if args.len() == 1 { "" } else { "s" };
    log.info(format!("Raw argument list ({} item{})", args.len(), plural))?;
    for (i, arg) in args.iter().enumerate() {
        log.info(format!("  [{}] {}", i, arg.as_ref()))?;
    }
    Ok(())
}

/// Returns true when the JSON branch reported a parse warning.
fn dispatch<S: AsRef<str>>(log: &mut RunLog<'_>, shape: PayloadShape, args: &[S]) -> Result<bool> {
    match (shape, args) {
        (PayloadShape::Json, [raw]) => {
            log.info("Single JSON argument detected; parsing as JSON document.")?;
            let outcome = log_json_payload(log, raw.as_ref())?;
            Ok(matches!(outcome, JsonOutcome::Invalid { .. }))
        }
        _ => {
            log.info("Key=value arguments detected; parsing as pairs.")?;
            log_key_value_payload(log, args)?;
            Ok(false)
        }
    }
}
