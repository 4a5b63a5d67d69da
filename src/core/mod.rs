//! Payload pipeline building blocks: classification, the two parsers, and the
//! run driver that sequences them between the start and finish envelopes.
pub mod classify;
pub mod driver;
pub mod parse;
