//! Command line layer for the batch job binary.
//!
//! `args` collects the raw payload tokens and `runner` wires configuration,
//! logging and the [`batch_job::BatchTask`] driver together. Embedders should
//! use the library directly instead.
pub mod args;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
