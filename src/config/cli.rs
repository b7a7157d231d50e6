use crate::utils::error::{EvalError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "ensemble-eval")]
#[command(about = "Runs a set of HTTP responders over a JSON dataset and merges the results into one CSV file")]
pub struct CliConfig {
    /// JSON file holding an array of input records
    #[arg(long)]
    pub input: String,

    /// Responder endpoint as a NAME=URL pair; repeat for each responder
    #[arg(long = "responder", value_name = "NAME=URL", required = true)]
    pub responders: Vec<String>,

    #[arg(long, default_value = "output.csv")]
    pub output: String,

    /// Append to the output file instead of truncating it
    #[arg(long)]
    pub append: bool,

    /// Field delimiter for the output file
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Quote every field, not only the ones that need it
    #[arg(long)]
    pub always_quote: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn parsed_responders(&self) -> Result<Vec<(String, String)>> {
        self.responders
            .iter()
            .map(|entry| {
                entry
                    .split_once('=')
                    .map(|(name, url)| (name.to_string(), url.to_string()))
                    .ok_or_else(|| EvalError::InvalidConfigValueError {
                        field: "responder".to_string(),
                        value: entry.clone(),
                        reason: "Expected NAME=URL".to_string(),
                    })
            })
            .collect()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("input", &self.input)?;
        validation::validate_non_empty_string("output", &self.output)?;

        if !self.delimiter.is_ascii() {
            return Err(EvalError::InvalidConfigValueError {
                field: "delimiter".to_string(),
                value: self.delimiter.to_string(),
                reason: "Field delimiter must be a single ASCII character".to_string(),
            });
        }

        let pairs = self.parsed_responders()?;
        validation::validate_unique_names("responder", pairs.iter().map(|(name, _)| name.as_str()))?;
        for (name, url) in &pairs {
            validation::validate_non_empty_string("responder name", name)?;
            validation::validate_url(&format!("responder '{}'", name), url)?;
        }

        Ok(())
    }
}
