//! CLI - Command Line Interface
//!
//! Available Commands:
//! - pragma run      - Run a batch of simulations from a YAML config
//! - pragma inspect  - Generate one lexicon and print its pragmatic matrices

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use pragma_core::RandomSource;
use pragma_lexicon::{Lexicon, PragmaticModel};
use pragma_simulation::SimulationConfig;

use crate::batch::{run_batch, summarize, TaggedReport};

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Pragma CLI
#[derive(Parser, Debug)]
#[command(name = "pragma")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Run a batch of simulations
    Run(RunArgs),

    /// Print a lexicon with its speaker and listener matrices
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base seed (overrides config and PRAGMA_SEED)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of runs (overrides config and PRAGMA_RUNS)
    #[arg(long)]
    pub runs: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct InspectArgs {
    /// Number of signals
    #[arg(long, default_value_t = 4)]
    pub vocabulary: usize,

    /// Number of referents
    #[arg(long, default_value_t = 3)]
    pub context: usize,

    /// Referents per signal
    #[arg(long, default_value_t = 2)]
    pub ambiguity: usize,

    /// Pragmatic order
    #[arg(long, default_value_t = 1)]
    pub order: usize,

    /// frank-goodman, blokpoel-et-al or franke-degen
    #[arg(long, default_value = "blokpoel-et-al")]
    pub model: PragmaticModel,

    #[arg(long)]
    pub seed: Option<u64>,
}

/// Parse CLI arguments and execute commands
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt::init();
    }

    match cli.command {
        Commands::Run(args) => cmd_run(args).await,
        Commands::Inspect(args) => cmd_inspect(args),
    }
}

fn resolve_config(args: &RunArgs) -> Result<SimulationConfig> {
    resolve_config_with(args, |key| std::env::var(key).ok())
}

/// Config file, then env (`lookup`), then flags. Env keys shadowed by a flag are not read.
fn resolve_config_with<F>(args: &RunArgs, lookup: F) -> Result<SimulationConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    config.apply_overrides(|key| match key {
        "PRAGMA_SEED" if args.seed.is_some() => None,
        "PRAGMA_RUNS" if args.runs.is_some() => None,
        _ => lookup(key),
    })?;

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(runs) = args.runs {
        config.runs = runs;
    }
    config.validate()?;
    Ok(config)
}

async fn cmd_run(args: RunArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    info!("Running {} simulations", config.runs);

    let reports = run_batch(config).await?;
    let summary = summarize(&reports);

    match args.output {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "reports": reports,
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => {
            print_table(&reports);
            println!(
                "\n{} runs: mean success {:.3}, mean asymmetry {:.3}, mean turns {:.1}",
                summary.runs, summary.mean_success_rate, summary.mean_asymmetry, summary.mean_turns
            );
        }
    }
    Ok(())
}

fn print_table(reports: &[TaggedReport]) {
    println!(
        "{:<28} {:>4} {:>18} {:>6} {:>8} {:>9} {:>9}  stopped",
        "run id", "run", "seed", "turns", "success", "asymmetry", "ambiguity"
    );
    for tagged in reports {
        let report = &tagged.report;
        let summary = &report.summary;
        println!(
            "{:<28} {:>4} {:>#18x} {:>6} {:>8.3} {:>9.3} {:>9.3}  {:?}",
            tagged.run_id.to_string(),
            report.run,
            report.seed,
            summary.turns,
            summary.success_rate,
            summary.asymmetry,
            report.mean_ambiguity,
            summary.stopped_by
        );
    }
}

fn cmd_inspect(args: InspectArgs) -> Result<()> {
    let mut rng = RandomSource::new(args.seed.unwrap_or(pragma_core::DEFAULT_SEED));
    let lexicon = Lexicon::generate_consistent_ambiguity_mapping(
        args.ambiguity,
        args.vocabulary,
        args.context,
        &mut rng,
    )?
    .with_model(args.model);

    let (mean, variance) = lexicon.mean_and_variance_ambiguity(1.0);
    println!("Lexicon ({} signals x {} referents, {})", args.vocabulary, args.context, args.model);
    print!("{lexicon}");
    println!("ambiguity: mean {mean:.3}, variance {variance:.3}");

    println!("\nSpeaker, order {}", args.order);
    print!("{}", lexicon.set_order_as_speaker(args.order));

    println!("\nListener, order {}", args.order);
    print!("{}", lexicon.set_order_as_listener(args.order));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_run_args() {
        let cli = Cli::try_parse_from([
            "pragma", "-v", "run", "--seed", "12", "--runs", "3", "--output", "json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.seed, Some(12));
                assert_eq!(args.runs, Some(3));
                assert_eq!(args.output, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_inspect_model() {
        let cli = Cli::try_parse_from(["pragma", "inspect", "--model", "fg", "--order", "3"]).unwrap();
        match cli.command {
            Commands::Inspect(args) => {
                assert_eq!(args.model, PragmaticModel::FrankGoodman);
                assert_eq!(args.order, 3);
                assert_eq!(args.vocabulary, 4);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["pragma", "inspect", "--model", "nope"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed: 5\nruns: 8\ninteraction:\n  max_turns: 20").unwrap();

        let args = RunArgs {
            config: Some(file.path().to_path_buf()),
            seed: None,
            runs: Some(2),
            output: OutputFormat::Pretty,
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.runs, 2);
        assert_eq!(config.interaction.max_turns, 20);
    }

    #[test]
    fn test_flag_shadows_malformed_env() {
        let args = RunArgs {
            config: None,
            seed: Some(9),
            runs: None,
            output: OutputFormat::Pretty,
        };
        let env = |key: &str| match key {
            "PRAGMA_SEED" => Some("not-a-number".to_string()),
            "PRAGMA_RUNS" => Some("3".to_string()),
            _ => None,
        };

        let config = resolve_config_with(&args, env).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.runs, 3);

        let no_flag = RunArgs { seed: None, ..args };
        assert!(resolve_config_with(&no_flag, env).is_err());
    }

    #[test]
    fn test_inspect_rejects_undercovered_context() {
        let args = InspectArgs {
            vocabulary: 2,
            context: 5,
            ambiguity: 1,
            order: 1,
            model: PragmaticModel::default(),
            seed: Some(1),
        };
        assert!(cmd_inspect(args).is_err());
    }
}
