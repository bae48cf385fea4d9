mod script;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

use clap::{Args, Parser, Subcommand};
use formsmith::engine::EngineCore;
use formsmith::ids::SequentialIds;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::script::{Runner, ScriptError, parse_script};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "formsmith-cli", about = "Build a form from a line script and print the result")]
struct Cli {
    /// Form title set before the script runs.
    #[arg(long, env = "FORMSMITH_TITLE")]
    title: Option<String>,

    /// Hand out ids 00000000-...-0001, -0002, ... instead of random v4 UUIDs.
    #[arg(long, env = "FORMSMITH_SEQUENTIAL_IDS")]
    sequential_ids: bool,

    #[arg(long, help = "Pretty-print the JSON output")]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the script and print the document snapshot.
    Run(ScriptArgs),
    /// Run the script and print the view tree for the final mode.
    Render(ScriptArgs),
    /// Run the script and print the submitted preview answers.
    Answers(ScriptArgs),
}

#[derive(Args, Debug)]
struct ScriptArgs {
    #[arg(long, env = "FORMSMITH_INPUT", default_value = "-", help = "Script file path, or - for stdin")]
    input: String,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let args = match &cli.command {
        Command::Run(args) | Command::Render(args) | Command::Answers(args) => args,
    };

    let text = read_input(&args.input)?;
    let lines = parse_script(&text)?;
    tracing::debug!(input = %args.input, steps = lines.len(), "script parsed");

    let mut engine = if cli.sequential_ids { EngineCore::with_ids(SequentialIds::new()) } else { EngineCore::new() };
    if let Some(title) = &cli.title {
        engine.set_title(title.as_str());
    }
    let mut runner = Runner::new(engine);
    runner.run(&lines)?;
    let engine = runner.engine();

    match cli.command {
        Command::Run(_) => print_json(&engine.snapshot(), cli.pretty),
        Command::Render(_) => print_json(
            &json!({
                "title": engine.title(),
                "mode": engine.mode(),
                "fields": engine.render(),
            }),
            cli.pretty,
        ),
        Command::Answers(_) => print_json(&engine.submit_preview(), cli.pretty),
    }
}

fn read_input(path: &str) -> Result<String, CliError> {
    let read_error = |source| CliError::Read { path: path.to_owned(), source };
    let mut reader: Box<dyn BufRead> = if path == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(path).map_err(read_error)?))
    };
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(read_error)?;
    Ok(text)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    println!("{rendered}");
    Ok(())
}
