//! Library side of the `vizgrid` command: logging setup and the command
//! pipelines, kept out of the binary so they can be tested directly.

pub mod logging;
pub mod pipeline;
pub mod types;
