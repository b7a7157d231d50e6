use crate::adapters::csv::{CsvOptions, CsvSink};
use crate::core::convert::{identity_input, merge_output, InputConverter, OutputConverter};
use crate::core::responders::ResponderSet;
use crate::domain::model::{Column, OutputSchema, Record, ResultRow, RunOutcome};
use crate::domain::ports::RecordSink;
use crate::utils::error::{EvalError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Progress events emitted by the evaluation loop. A record event fires
/// only after its row is durable in the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Record { finished: usize, total: usize },
    Finished,
}

pub type ProgressHandler = Arc<dyn Fn(Progress) + Send + Sync>;

/// Default progress handler: logs `Finished i of N` per record and
/// `Finished!` at the end of the run.
pub fn log_progress() -> ProgressHandler {
    Arc::new(|progress| match progress {
        Progress::Record { finished, total } => {
            tracing::info!("Finished {} of {}", finished, total)
        }
        Progress::Finished => tracing::info!("Finished!"),
    })
}

/// Knobs for one evaluation run. The defaults match what most runs want:
/// records passed to responders unchanged, outputs shallow-merged over the
/// input (responder outputs win on key collision), header inferred from the
/// first record, CSV written to `output.csv`.
pub struct RunOptions {
    pub input_converter: InputConverter,
    pub output_converter: OutputConverter,
    /// Explicit output columns; when `None`, the schema is inferred once
    /// from the first record with all responder outputs stubbed empty.
    pub header: Option<Vec<Column>>,
    pub csv: CsvOptions,
    pub progress: ProgressHandler,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            input_converter: identity_input(),
            output_converter: merge_output(),
            header: None,
            csv: CsvOptions::default(),
            progress: log_progress(),
        }
    }
}

/// Drives a responder set over a dataset: one row in, one merged row
/// persisted, strictly in input order.
pub struct EvalHarness {
    responders: ResponderSet,
    options: RunOptions,
}

impl EvalHarness {
    pub fn new(responders: ResponderSet) -> Self {
        Self::with_options(responders, RunOptions::default())
    }

    pub fn with_options(responders: ResponderSet, options: RunOptions) -> Self {
        Self {
            responders,
            options,
        }
    }

    /// The schema for the whole run: the explicit header if one was given,
    /// otherwise inferred from converting the first record with every
    /// responder output stubbed to an empty string.
    pub fn resolve_schema(&self, dataset: &[Record]) -> Result<OutputSchema> {
        if let Some(columns) = &self.options.header {
            return Ok(OutputSchema::new(columns.clone()));
        }

        let first = dataset.first().ok_or_else(|| EvalError::ConfigError {
            message: "cannot infer output columns from an empty dataset; supply an explicit header"
                .to_string(),
        })?;

        let mut stub = ResultRow::new();
        for name in self.responders.names() {
            stub.insert(name.to_string(), Value::String(String::new()));
        }

        Ok(OutputSchema::infer(&(self.options.output_converter)(
            first, &stub,
        )))
    }

    /// Runs against the configured CSV sink.
    pub async fn run(&self, dataset: &[Record]) -> Result<RunOutcome> {
        let schema = self.resolve_schema(dataset)?;
        let mut sink = CsvSink::open(&schema, &self.options.csv)?;
        self.run_with_sink(dataset, &mut sink).await
    }

    /// The evaluation loop proper, against any sink. For each record:
    /// convert the input once, invoke every responder sequentially in set
    /// order, merge, persist, then report progress. Responder and sink
    /// failures propagate immediately; rows already appended stay durable.
    pub async fn run_with_sink(
        &self,
        dataset: &[Record],
        sink: &mut dyn RecordSink,
    ) -> Result<RunOutcome> {
        let total = dataset.len();
        let mut results = Vec::with_capacity(total);

        for (index, record) in dataset.iter().enumerate() {
            let input = (self.options.input_converter)(record);
            let mut row = ResultRow::new();

            // Sequential on purpose: at most one in-flight call keeps
            // rate-limited backends predictable and row order deterministic.
            for named in self.responders.iter() {
                tracing::debug!(responder = %named.name, record = index, "invoking responder");
                let output = named.responder.invoke(input.clone()).await?;
                row.insert(named.name.clone(), output);
            }

            let output = (self.options.output_converter)(record, &row);
            sink.append(&output).await?;
            results.push(output);

            (self.options.progress)(Progress::Record {
                finished: index + 1,
                total,
            });
        }

        (self.options.progress)(Progress::Finished);
        Ok(RunOutcome { results })
    }
}
