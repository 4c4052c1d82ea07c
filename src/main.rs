mod debug_report;

use clap::Parser;
use kgmatch::{EntityCatalog, MatchOptions, RelationshipGraph, detect_verbose};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Find knowledge-graph entities in text and resolve overlapping highlights.
///
/// Input is taken from --input, else from the trailing arguments, else from
/// stdin.
#[derive(Debug, Parser)]
#[command(name = "kgmatch", version)]
struct Cli {
    /// Relationship graph JSON: an object mapping entity name to its records.
    #[arg(short, long, env = "KGMATCH_GRAPH")]
    graph: PathBuf,

    /// Input text to scan.
    #[arg(short, long, conflicts_with = "text")]
    input: Option<String>,

    /// Selections shorter than this many characters are also matched as
    /// fragments of longer entity names.
    #[arg(long, default_value_t = 30)]
    threshold: usize,

    /// Fragments must be longer than this many characters.
    #[arg(long, default_value_t = 2)]
    min_fragment: usize,

    /// Print the match result as JSON instead of a report.
    #[arg(long)]
    json: bool,

    /// List the relationships of every candidate entity.
    #[arg(long)]
    relationships: bool,

    /// Force ANSI color output.
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long)]
    no_color: bool,

    /// Log engine stages to stderr (overrides KGMATCH_LOG).
    #[arg(short, long)]
    verbose: bool,

    #[arg(trailing_var_arg = true, value_name = "TEXT")]
    text: Vec<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("no input provided (pass --input, trailing text, or pipe stdin)")]
    NoInput,
    #[error(transparent)]
    Match(#[from] kgmatch::Error),
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::NoInput | CliError::Match(_) => ExitCode::from(2),
            CliError::Read { .. } | CliError::Encode(_) => ExitCode::from(1),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("kgmatch=debug")
    } else {
        EnvFilter::try_from_env("KGMATCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(&cli.graph)
        .map_err(|source| CliError::Read { path: cli.graph.display().to_string(), source })?;
    let graph = RelationshipGraph::from_json_str(&raw)?;
    let catalog = EntityCatalog::from_graph(&graph);

    let input = read_input(cli)?;
    let options = MatchOptions::default()
        .with_short_text_threshold(cli.threshold)
        .with_min_fragment_len(cli.min_fragment);

    let report = detect_verbose(&input, &catalog, &options)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.result)?);
        return Ok(());
    }

    let color = if cli.color {
        true
    } else if cli.no_color {
        false
    } else {
        io::stdout().is_terminal()
    };
    let graph = cli.relationships.then_some(&graph);
    debug_report::print_run(&input, &report, graph, color);
    Ok(())
}

fn read_input(cli: &Cli) -> Result<String, CliError> {
    let input = match (&cli.input, cli.text.is_empty()) {
        (Some(value), _) => value.clone(),
        (None, false) => cli.text.join(" "),
        (None, true) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| CliError::Read { path: "stdin".to_string(), source })?;
            buffer
        }
    };

    if input.trim().is_empty() {
        return Err(CliError::NoInput);
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn trailing_text_is_joined() {
        let cli = Cli::try_parse_from(["kgmatch", "--graph", "g.json", "Jacob", "Frey"]).unwrap();
        assert_eq!(read_input(&cli).unwrap(), "Jacob Frey");
        assert_eq!(cli.threshold, 30);
    }

    #[test]
    fn input_flag_wins_and_blank_input_is_rejected() {
        let cli = Cli::try_parse_from(["kgmatch", "-g", "g.json", "--input", "Minneapolis"]).unwrap();
        assert_eq!(read_input(&cli).unwrap(), "Minneapolis");

        let cli = Cli::try_parse_from(["kgmatch", "-g", "g.json", "--input", "   "]).unwrap();
        assert!(matches!(read_input(&cli), Err(CliError::NoInput)));
    }

    #[test]
    fn input_and_trailing_text_conflict() {
        assert!(Cli::try_parse_from(["kgmatch", "-g", "g.json", "-i", "a", "b"]).is_err());
    }
}
