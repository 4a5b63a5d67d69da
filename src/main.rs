//! batch-job entrypoint.
//!
//! Parses the payload tokens, runs the job once, and exits. Any error that
//! escapes `cli::run` produces a non-zero exit status.

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse_payload(std::env::args_os());
    cli::run(args)
}
