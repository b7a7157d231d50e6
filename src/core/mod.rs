pub mod convert;
pub mod responders;
pub mod runner;

pub use crate::domain::model::{Column, OutputSchema, Record, ResultRow, RunOutcome};
pub use crate::domain::ports::{RecordSink, Responder};
pub use crate::utils::error::Result;
