use anyhow::Context;
use clap::Parser;
use ensemble_eval::utils::{logger, validation::Validate};
use ensemble_eval::{
    CliConfig, EvalHarness, HttpResponder, Record, Responder, ResponderSet, RunOptions,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting ensemble-eval CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let raw = std::fs::read_to_string(&config.input)
        .with_context(|| format!("reading dataset from {}", config.input))?;
    let dataset: Vec<Record> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as an array of records", config.input))?;
    tracing::info!("Loaded {} records from {}", dataset.len(), config.input);

    let chains = config
        .parsed_responders()?
        .into_iter()
        .map(|(name, url)| {
            let responder: Box<dyn Responder> = Box::new(HttpResponder::new(name.clone(), url));
            (name, responder)
        })
        .collect();
    let responders = ResponderSet::from_chains(chains)?;
    tracing::info!("Comparing {} responders", responders.len());

    let mut options = RunOptions::default();
    options.csv.path = config.output.clone().into();
    options.csv.append = config.append;
    options.csv.always_quote = config.always_quote;
    options.csv.field_delimiter = config.delimiter as u8;

    let harness = EvalHarness::with_options(responders, options);
    match harness.run(&dataset).await {
        Ok(outcome) => {
            tracing::info!("Run completed successfully");
            println!("Wrote {} rows to {}", outcome.results.len(), config.output);
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
