pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::csv::{CsvOptions, CsvSink};
pub use crate::adapters::http::HttpResponder;
pub use crate::core::convert::{identity_input, merge_output, InputConverter, OutputConverter};
pub use crate::core::responders::{responder_fn, NamedResponder, ResponderSet};
pub use crate::core::runner::{log_progress, EvalHarness, Progress, ProgressHandler, RunOptions};
pub use crate::domain::model::{Column, FieldMap, OutputSchema, Record, ResultRow, RunOutcome};
pub use crate::domain::ports::{RecordSink, Responder};
pub use crate::utils::error::{EvalError, Result};
