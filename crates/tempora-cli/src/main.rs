//! Tempora CLI - temporal-graph benchmark utilities from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show dataset statistics
//! tempora stats edges.csv
//!
//! # Cache a CSV dataset (with splits and labels) as binary
//! tempora cache edges.csv dataset.bin --labels node_labels.csv
//!
//! # Pre-generate negative sets for evaluation
//! tempora gen-neg dataset.bin -o test_ns.json --split test --strategy hist-rnd
//!
//! # Run the EdgeBank link baseline
//! tempora eval-link dataset.bin --negatives test_ns.json
//!
//! # Run a node-property forecaster baseline
//! tempora eval-node dataset.bin --forecaster moving-average --window 7
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;

use tempora_baseline::{
    run_link_baseline, EdgeBank, LinkRunConfig, MovingAverageForecaster, NodeBaselineRun,
    NodeRunConfig, PersistentForecaster,
};
use tempora_core::{Split, TemporalDataset};
use tempora_sample::{FixedNegativeSet, GeneratorConfig, NegativeSetGenerator, SamplingStrategy};

#[derive(Parser)]
#[command(name = "tempora")]
#[command(about = "Temporal-graph benchmark utilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics about a dataset
    Stats {
        /// Input file (.csv or .bin cache)
        input: PathBuf,

        /// Node label events CSV (optional)
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Validation ratio for generated splits
        #[arg(long, default_value = "0.15")]
        val_ratio: f64,

        /// Test ratio for generated splits
        #[arg(long, default_value = "0.15")]
        test_ratio: f64,
    },

    /// Cache a CSV dataset as binary (fast loading)
    Cache {
        /// Input edge CSV
        input: PathBuf,

        /// Output file (.bin)
        output: PathBuf,

        /// Node label events CSV (optional)
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Validation ratio for generated splits
        #[arg(long, default_value = "0.15")]
        val_ratio: f64,

        /// Test ratio for generated splits
        #[arg(long, default_value = "0.15")]
        test_ratio: f64,
    },

    /// Pre-generate a fixed negative set for one split
    GenNeg {
        /// Input file (.csv or .bin cache)
        input: PathBuf,

        /// Output file (.json or .bin)
        #[arg(short, long)]
        output: PathBuf,

        /// Which split to cover
        #[arg(long, default_value = "test")]
        split: SplitArg,

        /// Negatives per positive edge
        #[arg(long, default_value = "20")]
        num_neg: usize,

        /// Sampling strategy
        #[arg(long, default_value = "rnd")]
        strategy: StrategyArg,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Validation ratio for generated splits
        #[arg(long, default_value = "0.15")]
        val_ratio: f64,

        /// Test ratio for generated splits
        #[arg(long, default_value = "0.15")]
        test_ratio: f64,
    },

    /// Evaluate the EdgeBank link-prediction baseline
    EvalLink {
        /// Input file (.csv or .bin cache)
        input: PathBuf,

        /// Pre-generated negative set (.json or .bin)
        #[arg(short, long)]
        negatives: PathBuf,

        /// Memory mode
        #[arg(long, default_value = "unlimited")]
        memory: MemoryArg,

        /// Window size as a fraction of the train span (window mode)
        #[arg(long, default_value = "0.15")]
        window_ratio: f64,

        /// Edges per batch
        #[arg(long, default_value = "200")]
        batch_size: usize,

        /// Validation ratio for generated splits
        #[arg(long, default_value = "0.15")]
        val_ratio: f64,

        /// Test ratio for generated splits
        #[arg(long, default_value = "0.15")]
        test_ratio: f64,
    },

    /// Evaluate a node-property forecaster baseline over all splits
    EvalNode {
        /// Input file (.csv or .bin cache)
        input: PathBuf,

        /// Node label events CSV (required unless cached in the input)
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Forecaster
        #[arg(long, default_value = "persistence")]
        forecaster: ForecasterArg,

        /// Averaging window (moving-average only)
        #[arg(long, default_value = "7")]
        window: u32,

        /// Edges per batch
        #[arg(long, default_value = "200")]
        batch_size: usize,

        /// NDCG cutoff
        #[arg(long, default_value = "10")]
        ndcg_k: usize,

        /// Validation ratio for generated splits
        #[arg(long, default_value = "0.15")]
        val_ratio: f64,

        /// Test ratio for generated splits
        #[arg(long, default_value = "0.15")]
        test_ratio: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SplitArg {
    Val,
    Test,
}

impl From<SplitArg> for Split {
    fn from(s: SplitArg) -> Split {
        match s {
            SplitArg::Val => Split::Val,
            SplitArg::Test => Split::Test,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Uniform random negatives
    Rnd,
    /// Half historical, half random
    HistRnd,
}

impl From<StrategyArg> for SamplingStrategy {
    fn from(s: StrategyArg) -> SamplingStrategy {
        match s {
            StrategyArg::Rnd => SamplingStrategy::Random,
            StrategyArg::HistRnd => SamplingStrategy::HistoricalRandom,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MemoryArg {
    /// Remember every edge ever seen
    Unlimited,
    /// Remember edges within a sliding time window
    Window,
}

#[derive(Clone, Copy, ValueEnum)]
enum ForecasterArg {
    /// Repeat the last observed label vector
    Persistence,
    /// Running mean with a fixed window
    MovingAverage,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats {
            input,
            labels,
            val_ratio,
            test_ratio,
        } => cmd_stats(&input, labels.as_deref(), val_ratio, test_ratio),
        Commands::Cache {
            input,
            output,
            labels,
            val_ratio,
            test_ratio,
        } => cmd_cache(&input, &output, labels.as_deref(), val_ratio, test_ratio),
        Commands::GenNeg {
            input,
            output,
            split,
            num_neg,
            strategy,
            seed,
            val_ratio,
            test_ratio,
        } => cmd_gen_neg(
            &input, &output, split, num_neg, strategy, seed, val_ratio, test_ratio,
        ),
        Commands::EvalLink {
            input,
            negatives,
            memory,
            window_ratio,
            batch_size,
            val_ratio,
            test_ratio,
        } => cmd_eval_link(
            &input,
            &negatives,
            memory,
            window_ratio,
            batch_size,
            val_ratio,
            test_ratio,
        ),
        Commands::EvalNode {
            input,
            labels,
            forecaster,
            window,
            batch_size,
            ndcg_k,
            val_ratio,
            test_ratio,
        } => cmd_eval_node(
            &input,
            labels.as_deref(),
            forecaster,
            window,
            batch_size,
            ndcg_k,
            val_ratio,
            test_ratio,
        ),
    }
}

/// Load a dataset from CSV or binary cache, generating splits when the
/// source carries none.
fn load_dataset(
    path: &Path,
    labels: Option<&Path>,
    val_ratio: f64,
    test_ratio: f64,
) -> Result<TemporalDataset> {
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Loading {}...", path.display()));

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string();

    let mut ds = if path.extension().is_some_and(|e| e == "bin") {
        TemporalDataset::from_cache_file(path)
            .with_context(|| format!("Failed to load binary cache {}", path.display()))?
    } else {
        TemporalDataset::from_csv_file(name, path)
            .with_context(|| format!("Failed to parse CSV {}", path.display()))?
    };

    if let Some(labels) = labels {
        ds.load_node_labels_csv(labels)
            .with_context(|| format!("Failed to parse node labels {}", labels.display()))?;
    }
    if ds.splits().is_err() {
        ds.generate_splits(val_ratio, test_ratio)?;
    }

    pb.finish_with_message(format!("Loaded in {:.2?}", start.elapsed()));
    Ok(ds)
}

fn cmd_stats(
    input: &Path,
    labels: Option<&Path>,
    val_ratio: f64,
    test_ratio: f64,
) -> Result<()> {
    let ds = load_dataset(input, labels, val_ratio, test_ratio)?;
    let stats = ds.stats();

    println!("Dataset Statistics");
    println!("==================");
    println!("Name:           {}", stats.name);
    println!("Edges:          {}", stats.num_edges);
    println!("Nodes:          {}", stats.num_nodes);
    println!("Time range:     [{}, {}]", stats.min_time, stats.max_time);
    println!("Edge features:  {}", stats.feat_dim);
    if let (Some(train), Some(val), Some(test)) =
        (stats.train_edges, stats.val_edges, stats.test_edges)
    {
        println!("Train edges:    {train}");
        println!("Val edges:      {val}");
        println!("Test edges:     {test}");
    }
    if let Some(events) = stats.num_label_events {
        println!("Label events:   {events}");
        println!("Classes:        {}", stats.num_classes.unwrap_or(0));
    }

    Ok(())
}

fn cmd_cache(
    input: &Path,
    output: &Path,
    labels: Option<&Path>,
    val_ratio: f64,
    test_ratio: f64,
) -> Result<()> {
    let ds = load_dataset(input, labels, val_ratio, test_ratio)?;

    let start = Instant::now();
    ds.to_cache_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Cached {} edges to {} in {:.2?}",
        ds.edges().len(),
        output.display(),
        start.elapsed()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_gen_neg(
    input: &Path,
    output: &Path,
    split: SplitArg,
    num_neg: usize,
    strategy: StrategyArg,
    seed: u64,
    val_ratio: f64,
    test_ratio: f64,
) -> Result<()> {
    let ds = load_dataset(input, None, val_ratio, test_ratio)?;
    let split: Split = split.into();

    println!("Generating negatives (split={split}, num_neg={num_neg}, seed={seed})...");
    let start = Instant::now();
    let config = GeneratorConfig::default()
        .with_num_neg(num_neg)
        .with_strategy(strategy.into())
        .with_seed(seed);
    let set = NegativeSetGenerator::new(config).generate(&ds, split)?;
    println!("Generated {} records in {:.2?}", set.len(), start.elapsed());

    set.save_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_eval_link(
    input: &Path,
    negatives: &Path,
    memory: MemoryArg,
    window_ratio: f64,
    batch_size: usize,
    val_ratio: f64,
    test_ratio: f64,
) -> Result<()> {
    let ds = load_dataset(input, None, val_ratio, test_ratio)?;
    let set = FixedNegativeSet::load_file(negatives)
        .with_context(|| format!("Failed to load negative set {}", negatives.display()))?;

    let mut bank = match memory {
        MemoryArg::Unlimited => EdgeBank::unlimited(),
        MemoryArg::Window => EdgeBank::with_window_from_train_span(&ds, window_ratio)?,
    };

    println!(
        "EdgeBank on {} ({} split, {} queries)...",
        ds.name(),
        set.split(),
        set.len()
    );
    let start = Instant::now();
    let config = LinkRunConfig::default().with_batch_size(batch_size);
    let metrics = run_link_baseline(&ds, &mut bank, &set, &config)?;

    println!("Evaluated in {:.2?}", start.elapsed());
    println!("{}", metrics.summary());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_eval_node(
    input: &Path,
    labels: Option<&Path>,
    forecaster: ForecasterArg,
    window: u32,
    batch_size: usize,
    ndcg_k: usize,
    val_ratio: f64,
    test_ratio: f64,
) -> Result<()> {
    let ds = load_dataset(input, labels, val_ratio, test_ratio)?;
    if !ds.has_node_labels() {
        bail!("dataset has no node labels; pass --labels <csv>");
    }
    let num_classes = ds.node_labels()?.num_classes();

    let config = NodeRunConfig::default()
        .with_batch_size(batch_size)
        .with_ndcg_k(ndcg_k);

    match forecaster {
        ForecasterArg::Persistence => {
            println!("Persistence forecast on {}...", ds.name());
            let run = NodeBaselineRun::new(&ds, PersistentForecaster::new(num_classes), config)?;
            report_splits(run)
        }
        ForecasterArg::MovingAverage => {
            println!("Moving average (window={window}) on {}...", ds.name());
            let run = NodeBaselineRun::new(
                &ds,
                MovingAverageForecaster::new(num_classes, window),
                config,
            )?;
            report_splits(run)
        }
    }
}

fn report_splits<F: tempora_baseline::Forecaster>(mut run: NodeBaselineRun<'_, F>) -> Result<()> {
    for split in [Split::Train, Split::Val, Split::Test] {
        let start = Instant::now();
        let report = run.run_split(split)?;
        println!(
            "{:<5} {} [{:.2?}]",
            split,
            report.summary(),
            start.elapsed()
        );
    }
    Ok(())
}
