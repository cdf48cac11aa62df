mod commands;
mod error;

use clap::{ArgAction, Parser, Subcommand};
use implidx_codec::MergePolicy;
use implidx_config::Config;
use implidx_index::Severity;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::commands::Context;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;

#[derive(Debug, Parser)]
#[command(name = "implidx", version, about, long_about = None)]
struct Cli {
    /// Configuration file (toml, yaml or json)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// More logging, repeat for more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// rustdoc output directory (defaults to `target/doc`)
    #[arg(long, global = true, value_name = "DIR")]
    doc_root: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every record of one implementors file
    Inspect {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Per-crate implementor counts over the doc root
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Find implementors by trait, by type, or both
    Query {
        /// Trait path, or any `::`-suffix of it (`Debug`, `fmt::Debug`)
        #[arg(long = "trait", value_name = "PATH", required_unless_present = "type_path")]
        trait_path: Option<String>,
        /// Type path, or any `::`-suffix of it
        #[arg(long = "type", value_name = "PATH")]
        type_path: Option<String>,
        /// Only records listed under this crate
        #[arg(long = "crate", value_name = "NAME")]
        crate_name: Option<String>,
        /// Only compiler-derived impls
        #[arg(long, conflicts_with = "explicit")]
        synthetic: bool,
        /// Only impls written in source
        #[arg(long)]
        explicit: bool,
    },
    /// Check every implementors file; exits with 2 if errors are found
    Validate {
        /// Hide issues below this level (info, warning, error)
        #[arg(long, value_name = "LEVEL")]
        min_severity: Option<Severity>,
    },
    /// Merge implementors files for one trait into a single file
    Merge {
        output: PathBuf,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// What to do when a crate is in more than one input (replace, keep, strict)
        #[arg(long, value_name = "POLICY")]
        policy: Option<MergePolicy>,
    },
    /// Remove a crate's records from every implementors file under the doc root
    Prune {
        crate_name: String,
        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// The whole index as JSON
    Export {
        #[arg(long)]
        pretty: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if let Some(doc_root) = cli.doc_root {
        config.doc_root = doc_root;
    }
    tracing::debug!(?config, "effective configuration");
    let context = Context::new(config);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Inspect { file, json } => commands::inspect(&file, json, &mut stdout).await?,
        Command::Summary { json } => commands::summary(&context, json, &mut stdout).await?,
        Command::Query {
            trait_path,
            type_path,
            crate_name,
            synthetic,
            explicit,
        } => {
            let filter = implidx_index::Filter {
                crate_name,
                trait_path,
                type_path,
                synthetic: match (synthetic, explicit) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            commands::query(&context, &filter, &mut stdout).await?
        },
        Command::Validate { min_severity } => {
            let min_severity = min_severity.unwrap_or(context.config.min_severity);
            let errors = commands::validate(&context, min_severity, &mut stdout).await?;
            if errors > 0 {
                return Ok(ExitCode::from(2));
            }
        },
        Command::Merge { output, inputs, policy } => {
            let policy = policy.unwrap_or(context.config.merge_policy);
            commands::merge(&context, &output, &inputs, policy).await?
        },
        Command::Prune { crate_name, dry_run } => commands::prune(&context, &crate_name, dry_run, &mut stdout).await?,
        Command::Export { pretty } => commands::export(&context, pretty, &mut stdout).await?,
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["implidx", "query", "--trait", "Debug"])]
    #[case(&["implidx", "query", "--type", "Header", "--synthetic"])]
    #[case(&["implidx", "-vv", "validate", "--min-severity", "error"])]
    #[case(&["implidx", "merge", "out.js", "a.js", "b.js", "--policy", "strict"])]
    #[case(&["implidx", "summary", "--doc-root", "docs"])]
    fn test_parses(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_ok());
    }

    #[rstest]
    #[case::query_needs_something(&["implidx", "query"])]
    #[case::synthetic_or_explicit(&["implidx", "query", "--trait", "Debug", "--synthetic", "--explicit"])]
    #[case::merge_needs_inputs(&["implidx", "merge", "out.js"])]
    #[case::bad_policy(&["implidx", "merge", "out.js", "a.js", "--policy", "sometimes"])]
    #[case::bad_severity(&["implidx", "validate", "--min-severity", "loud"])]
    fn test_rejects(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["implidx", "export", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
        assert!(matches!(cli.command, Command::Export { pretty: false }));
    }
}
