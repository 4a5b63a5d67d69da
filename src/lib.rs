#![doc = r#"
batch-job — a one-shot batch workload that proves receipt of its payload.

The job is invoked once by an external orchestrator with either a single JSON
document or a list of `key=value` tokens. It classifies the payload, parses it,
and emits a correlation-tagged log trail bracketed by a start and a finish
envelope, then exits.

Quick start: run against an in-memory sink
------------------------------------------
```rust
use batch_job::{BatchTask, JobConfig, MemorySink, PayloadShape};

fn main() -> batch_job::Result<()> {
    let mut sink = MemorySink::new();
    let task = BatchTask::new(JobConfig::with_greeting("hi"));
    let summary = task.run(&["a=1", "b=2", "c"], &mut sink)?;

    assert_eq!(summary.shape, PayloadShape::KeyValues);
    assert!(sink.messages().contains(&"  arg_2 = c"));
    assert!(sink.records().iter().all(|r| r.correlation_id == summary.correlation_id));
    Ok(())
}
```

Classify without running
------------------------
```rust
use batch_job::{classify, PayloadShape};

assert_eq!(classify(&["[1,2,3]"]), PayloadShape::Json);
assert_eq!(classify(&["{not-json"]), PayloadShape::KeyValues);
```

Error handling
--------------
Malformed JSON payloads never surface as errors; they become a `warn` record.
`batch_job::Error` covers failures outside the payload pipeline: sink writes
and configuration resolution.

Useful modules
--------------
- [`core`] — classifier, parsers and the run driver.
- [`sink`] — the `LogSink` trait and its tracing, writer and memory implementations.
- [`config`] — `custom.greeting` resolution from TOML and the environment.
- [`logging`] — tracing subscriber setup and a capturing layer.
- [`types`] — `CorrelationId`, `PayloadShape`, `Severity`, `LogRecord`.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod sink;
pub mod types;

// Curated public API surface
pub use config::JobConfig;
pub use crate::core::classify::classify;
pub use crate::core::driver::{BatchTask, RunSummary};
pub use crate::core::parse::{JsonOutcome, KeyValueMap, pretty_print_json};
pub use error::{Error, Result};
pub use sink::{LogSink, MemorySink, RunLog, TracingSink, WriterSink};
pub use types::{CorrelationId, LogRecord, PayloadShape, Severity};
