//! cellcalc CLI - evaluate pre-tokenized formulas

use anyhow::{anyhow, Context, Result};
use cellcalc_core::Token;
use cellcalc_formula::{interpreter, Evaluator};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "cellcalc")]
#[command(author, version, about = "Spreadsheet formula interpreter")]
struct Cli {
    /// Log parser and evaluator activity to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a token file and print the result as JSON
    Eval {
        /// JSON array of formula tokens
        tokens: PathBuf,

        /// JSON object mapping input names to tokens
        #[arg(short, long)]
        inputs: Option<PathBuf>,
    },

    /// Print the RPN program, one item per line
    Rpn {
        /// JSON array of formula tokens
        tokens: PathBuf,
    },

    /// List the input names a formula reads
    Inputs {
        /// JSON array of formula tokens
        tokens: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Eval { tokens, inputs } => eval(&tokens, inputs.as_deref()),
        Commands::Rpn { tokens } => {
            let evaluator = load(&tokens)?;
            write_stdout(&evaluator.program().to_string())
        }
        Commands::Inputs { tokens } => {
            let evaluator = load(&tokens)?;
            let mut out = String::new();
            for name in evaluator.required_inputs() {
                out.push_str(name);
                out.push('\n');
            }
            write_stdout(&out)
        }
    }
}

/// `RUST_LOG` wins when set; otherwise `-v` selects debug and `-vv` trace
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn load(path: &Path) -> Result<Evaluator> {
    let tokens = Token::list_from_json(&read(path)?)
        .with_context(|| format!("Invalid token file '{}'", path.display()))?;
    debug!(count = tokens.len(), "decoded tokens");

    interpreter(Some(tokens))?.ok_or_else(|| anyhow!("No tokens in '{}'", path.display()))
}

fn load_inputs(path: &Path) -> Result<HashMap<String, Token>> {
    let json: Value = serde_json::from_str(&read(path)?)
        .with_context(|| format!("Invalid JSON in '{}'", path.display()))?;
    let Value::Object(entries) = json else {
        return Err(anyhow!(
            "Inputs file '{}' must contain a JSON object",
            path.display()
        ));
    };

    entries
        .into_iter()
        .map(|(name, value)| {
            let token = Token::from_json_value(value)
                .with_context(|| format!("Invalid token for input '{}'", name))?;
            Ok((name, token))
        })
        .collect()
}

fn eval(tokens: &Path, inputs: Option<&Path>) -> Result<()> {
    let evaluator = load(tokens)?;
    let inputs = match inputs {
        Some(path) => load_inputs(path)?,
        None => HashMap::new(),
    };

    let token = evaluator.evaluate_token(&inputs)?;
    if let Some(err) = token.as_error() {
        debug!(code = %err.code(), message = err.message(), "formula produced an error value");
    }
    let result = token
        .to_scalar()
        .ok_or_else(|| anyhow!("Formula did not produce a value: {}", token))?;

    let json = serde_json::to_string(&result).context("Failed to serialize result")?;
    write_stdout(&format!("{}\n", json))
}

fn write_stdout(text: &str) -> Result<()> {
    io::stdout()
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")
}
