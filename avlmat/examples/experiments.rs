#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
use avlmat::{
    run_size_experiments, run_time_experiments, write_csv, write_json, CsvRecord, ExperimentCase,
    ExperimentConfig, HarnessResult,
};

#[cfg(feature = "cli")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    about = "avlmat experiments - Compare memory and operation time of AVL, hash and dense matrices"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output file (defaults to stdout)
    #[arg(long, short, global = true)]
    output: Option<std::path::PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Csv, global = true)]
    format: Format,

    /// Base RNG seed
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Cases to run (format: n:sparsity, comma separated)
    #[arg(long, value_delimiter = ',', global = true)]
    cases: Vec<ExperimentCase>,

    /// Number of leading cases that also time the dense baseline
    #[arg(long, global = true)]
    dense_limit: Option<usize>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Measure the memory footprint of each representation
    Size,
    /// Time get, set, transpose, scalar, sum and multiply on each representation
    Time,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[cfg(feature = "cli")]
fn write_report<R>(
    records: &[R],
    format: Format,
    output: Option<&std::path::Path>,
) -> HarnessResult<()>
where
    R: CsvRecord + serde::Serialize,
{
    let writer: Box<dyn std::io::Write> = match output {
        Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    match format {
        Format::Csv => write_csv(records, writer),
        Format::Json => write_json(records, writer),
    }
}

#[cfg(feature = "cli")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avlmat=info,experiments=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let start_time = std::time::Instant::now();

    let mut config = ExperimentConfig::default().with_seed(cli.seed);
    if !cli.cases.is_empty() {
        config = config.with_cases(cli.cases.clone());
    }
    if let Some(limit) = cli.dense_limit {
        config = config.with_dense_case_limit(limit);
    }

    tracing::info!(cases = config.cases.len(), seed = config.seed, "Starting experiments");

    match cli.command {
        Commands::Size => {
            let records = run_size_experiments(&config)?;
            write_report(&records, cli.format, cli.output.as_deref())?;
        }
        Commands::Time => {
            let records = run_time_experiments(&config)?;
            write_report(&records, cli.format, cli.output.as_deref())?;
        }
    }

    let elapsed = start_time.elapsed();
    tracing::info!("Experiments completed in {elapsed:.2?}");

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This example requires the 'cli' feature to be enabled.");
    eprintln!("Run with: cargo run --features cli --example experiments");
    std::process::exit(1);
}
