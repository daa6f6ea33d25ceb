pub mod metadata;
pub mod parser;
pub mod pipeline;
pub mod selftest;

pub use pipeline::{SubmissionHandler, SubmitError, Submitted};
