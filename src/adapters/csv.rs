use crate::domain::model::{Column, OutputSchema, Record};
use crate::domain::ports::RecordSink;
use crate::utils::error::Result;
use crate::utils::validation::validate_record_delimiter;
use async_trait::async_trait;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

/// Pass-through configuration for the CSV writer. Everything here is
/// forwarded to the underlying `csv` writer; the harness adds no logic of
/// its own beyond append-mode header handling.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub path: PathBuf,
    pub field_delimiter: u8,
    /// `"\r\n"` or any single-byte string; `None` keeps the writer's
    /// default (`\n`).
    pub record_delimiter: Option<String>,
    /// When set, a column id containing this delimiter is resolved as a
    /// nested path into the row object.
    pub header_id_delimiter: Option<char>,
    pub always_quote: bool,
    /// Append to an existing file instead of truncating, so repeated runs
    /// can resume a file. The header is only written when the file is empty.
    pub append: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output.csv"),
            field_delimiter: b',',
            record_delimiter: None,
            header_id_delimiter: None,
            always_quote: false,
            append: false,
        }
    }
}

/// File-backed record sink: one flushed CSV row per append, so a crash
/// after record k leaves k complete rows on disk.
pub struct CsvSink {
    writer: csv::Writer<File>,
    columns: Vec<Column>,
    header_id_delimiter: Option<char>,
}

impl CsvSink {
    pub fn open(schema: &OutputSchema, options: &CsvOptions) -> Result<Self> {
        let terminator = match options.record_delimiter.as_deref() {
            None => Terminator::Any(b'\n'),
            Some(delim) => {
                validate_record_delimiter("record_delimiter", delim)?;
                if delim == "\r\n" {
                    Terminator::CRLF
                } else {
                    Terminator::Any(delim.as_bytes()[0])
                }
            }
        };

        let mut open_options = OpenOptions::new();
        open_options.create(true).write(true);
        if options.append {
            open_options.append(true);
        } else {
            open_options.truncate(true);
        }
        let file = open_options.open(&options.path)?;
        let write_header = !options.append || file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new()
            .delimiter(options.field_delimiter)
            .terminator(terminator)
            .quote_style(if options.always_quote {
                QuoteStyle::Always
            } else {
                QuoteStyle::Necessary
            })
            .from_writer(file);

        if write_header {
            writer.write_record(schema.columns.iter().map(|c| c.title.as_str()))?;
            writer.flush()?;
        }

        tracing::debug!(
            path = %options.path.display(),
            columns = schema.columns.len(),
            append = options.append,
            "opened CSV sink"
        );

        Ok(Self {
            writer,
            columns: schema.columns.clone(),
            header_id_delimiter: options.header_id_delimiter,
        })
    }

    fn field_for(&self, row: &Record, id: &str) -> String {
        let value = match self.header_id_delimiter {
            Some(delim) if id.contains(delim) => lookup_path(row, id, delim),
            _ => row.get(id),
        };
        match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

fn lookup_path<'a>(row: &'a Record, id: &str, delim: char) -> Option<&'a Value> {
    let mut parts = id.split(delim);
    let mut current = row.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn append(&mut self, row: &Record) -> Result<()> {
        let fields: Vec<String> = self
            .columns
            .iter()
            .map(|column| self.field_for(row, &column.id))
            .collect();
        self.writer.write_record(&fields)?;
        self.writer.flush()?;
        Ok(())
    }
}
