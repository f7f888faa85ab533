//! Template runner CLI
//!
//! Usage:
//!   template-runner --template <FILE> [OPTIONS]
//!
//! Options:
//!   -t, --template <FILE>      Request template (JSON)
//!   -d, --data <JSON>          Data context object
//!   -i, --input <RAW>          Raw user input, formatted by the template's input kind
//!   --input-key <NAME>         Context key for the formatted input [default: input]
//!   -c, --config <FILE>        Settings document with a "request-template" section
//!   --strict                   Fail on placeholders missing from the context
//!   --timeout <MS>             Request timeout in milliseconds
//!   -h, --help                 Print help
//!
//! The rendered output is printed to stdout as JSON. Logging goes to stderr and
//! is controlled by `RUST_LOG`.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::{Map, Value};

use request_template::template::load_template;
use request_template::{
    load_config, EngineConfig, MissingPolicy, RequestTemplate, TemplateError, TemplateExecutor,
};

#[derive(Parser)]
#[command(name = "template-runner")]
#[command(about = "Execute a declarative HTTP request template", version)]
struct Cli {
    /// Request template file (JSON)
    #[arg(short, long)]
    template: PathBuf,

    /// Data context as a JSON object
    #[arg(short, long)]
    data: Option<String>,

    /// Raw user input, formatted according to the template's input kind
    #[arg(short, long)]
    input: Option<String>,

    /// Context key the formatted input is stored under
    #[arg(long, default_value = "input")]
    input_key: String,

    /// Settings file (JSON) with engine options under "request-template"
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail when a placeholder path is missing from the context
    #[arg(long)]
    strict: bool,

    /// Request timeout in milliseconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<String, TemplateError> {
    let template = load_template(&cli.template)?;
    let context = build_context(
        cli.data.as_deref(),
        cli.input.as_deref(),
        &cli.input_key,
        &template,
    )?;
    let config = engine_config(cli.config.as_deref(), cli.strict, cli.timeout)?;

    let executor = TemplateExecutor::from_config(&config)?;
    let output = executor.execute(&template, &context).await?;

    serde_json::to_string_pretty(&output)
        .map_err(|e| TemplateError::InvalidInput(format!("failed to serialize output: {}", e)))
}

/// Builds the data context from `--data` and `--input`.
///
/// `data` must be a JSON object. The formatted input, if any, is stored under
/// `key` and replaces a field of the same name from `data`.
fn build_context(
    data: Option<&str>,
    input: Option<&str>,
    key: &str,
    template: &RequestTemplate,
) -> Result<Value, TemplateError> {
    let mut context = match data {
        Some(data) => match serde_json::from_str::<Value>(data)
            .map_err(|e| TemplateError::InvalidInput(format!("--data: {}", e)))?
        {
            Value::Object(map) => map,
            _ => {
                return Err(TemplateError::InvalidInput(
                    "--data must be a JSON object".to_string(),
                ))
            }
        },
        None => Map::new(),
    };

    if let Some(raw) = input {
        context.insert(key.to_string(), template.format_input(raw)?);
    }

    Ok(Value::Object(context))
}

/// Loads settings through `load_config`, then applies command-line overrides.
fn engine_config(
    path: Option<&Path>,
    strict: bool,
    timeout: Option<u64>,
) -> Result<EngineConfig, TemplateError> {
    let settings = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                TemplateError::InvalidInput(format!("failed to read {}: {}", path.display(), e))
            })?;
            let value = serde_json::from_str::<Value>(&text).map_err(|e| {
                TemplateError::InvalidInput(format!("{}: {}", path.display(), e))
            })?;
            Some(value)
        }
        None => None,
    };

    let mut config = load_config(settings).map_err(TemplateError::InvalidInput)?;
    if strict {
        config.missing_values = MissingPolicy::Strict;
    }
    if timeout.is_some() {
        config.timeout = timeout;
    }
    config
        .validate()
        .map_err(|e| TemplateError::InvalidInput(format!("Invalid configuration: {}", e)))?;

    Ok(config)
}
