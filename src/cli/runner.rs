use tracing::info;

use batch_job::logging::{self, LogFormat};
use batch_job::{BatchTask, TracingSink, config};

use super::args::CliArgs;

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let write_failures = logging::init(LogFormat::from_env())?;
    info!("Starting batch-job v{}", env!("CARGO_PKG_VERSION"));

    let job_config = config::resolve()?;
    let task = BatchTask::new(job_config);

    let mut sink = TracingSink::watching(write_failures);
    task.run(&args.payload, &mut sink)?;

    Ok(())
}
