//! logistic-trainer CLI
//!
//! Trains a binary logistic classifier on a CSV file and prints the
//! parameter block for the embedded consumer.
//!
//! # Usage
//!
//! ```bash
//! # Train with the default hyperparameters
//! logistic-trainer train colors.csv --columns red,green,blue,ambient,width,label
//!
//! # Train with overrides and keep the log
//! logistic-trainer train colors.csv --config run.json --max-iters 500001 --loss-freq 50000 --log run.jsonl
//!
//! # Mean k-fold accuracy of one penalty strength
//! logistic-trainer cross-validate colors.csv --lambda 0.001
//!
//! # Search the penalty strength, then train with the best one
//! logistic-trainer search colors.csv --depth 10
//! ```
//!
//! `RUST_LOG` controls verbosity (default `info`).

use clap::{Args, Parser, Subcommand};
use logistic_trainer::backend::{CpuBackend, Tensor1D, Tensor2D};
use logistic_trainer::config::PipelineConfig;
use logistic_trainer::dataset::read_csv;
use logistic_trainer::export::ExportedModel;
use logistic_trainer::metrics::accuracy;
use logistic_trainer::preprocessing::{
    preprocess_data, FittedStandardScaler, FittedTransformer, PreparedData,
};
use logistic_trainer::validation::{cross_validate, find_regularization_param_with};
use logistic_trainer::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

type B = CpuBackend;

#[derive(Parser, Debug)]
#[command(name = "logistic-trainer", version, about = "Train a binary logistic classifier")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train on the training split and report train/test accuracy
    Train(RunArgs),
    /// Cross-validate one penalty strength on the training split
    CrossValidate(RunArgs),
    /// Search the penalty strength, then train with the best one
    Search {
        #[command(flatten)]
        run: RunArgs,
        /// Candidates are 0 and 10^-depth ..= 1
        #[arg(long)]
        depth: Option<u32>,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// CSV file with a header row
    data: PathBuf,
    /// JSON run configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    label: Option<String>,
    /// Columns to load, comma separated (must include the label)
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,
    #[arg(long)]
    train_size: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_iters: Option<usize>,
    #[arg(long)]
    alpha: Option<f64>,
    #[arg(long)]
    loss_freq: Option<usize>,
    #[arg(long)]
    patience: Option<usize>,
    #[arg(long)]
    min_delta: Option<f64>,
    #[arg(long)]
    lambda: Option<f64>,
    #[arg(long)]
    k: Option<usize>,
    #[arg(long)]
    init_seed: Option<u64>,
    /// Name prefix of the exported constants
    #[arg(long)]
    prefix: Option<String>,
    /// Save the exported parameters (`.json` for JSON, bincode otherwise)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Append the training log as JSON lines
    #[arg(long)]
    log: Option<PathBuf>,
}

impl RunArgs {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(label) = &self.label {
            config.label = label.clone();
        }
        if let Some(columns) = &self.columns {
            config.columns = columns.clone();
        }
        if let Some(train_size) = self.train_size {
            config.train_size = train_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        let train = &mut config.train;
        if let Some(v) = self.max_iters {
            train.max_iters = v;
        }
        if let Some(v) = self.alpha {
            train.alpha = v;
        }
        if let Some(v) = self.loss_freq {
            train.loss_freq = v;
        }
        if self.patience.is_some() {
            train.patience = self.patience;
        }
        if let Some(v) = self.min_delta {
            train.min_delta = v;
        }
        if let Some(v) = self.lambda {
            train.lambda = v;
        }
        if let Some(v) = self.k {
            train.k = v;
        }
        if let Some(v) = self.init_seed {
            train.init_seed = v;
        }
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Loaded, split and standardized data.
struct Prepared {
    data: PreparedData<B>,
    x_train: Tensor2D<B>,
    x_test: Tensor2D<B>,
    scaler: FittedStandardScaler<B>,
}

fn prepare(args: &RunArgs, config: &PipelineConfig) -> Result<Prepared> {
    let columns: Vec<&str> = config.columns.iter().map(String::as_str).collect();
    let usecols = (!columns.is_empty()).then_some(columns.as_slice());
    let table = read_csv(&args.data, usecols)?;
    let data = preprocess_data::<B>(&table, &config.label, config.train_size, config.seed)?;
    let scaler = data.fit_scaler()?;
    let x_train = scaler.transform(&data.x_train)?;
    let x_test = scaler.transform(&data.x_test)?;
    info!(
        train = data.x_train.rows(),
        test = data.x_test.rows(),
        features = ?data.feature_names,
        "data prepared"
    );
    Ok(Prepared {
        data,
        x_train,
        x_test,
        scaler,
    })
}

fn percent(y: &Tensor1D<B>, predicted: &Tensor1D<B>) -> String {
    format!("{:.2}%", 100.0 * accuracy(y, predicted))
}

fn train_and_report(
    args: &RunArgs,
    config: &PipelineConfig,
    prepared: &Prepared,
    lambda: f64,
) -> Result<()> {
    let outcome = config
        .train
        .trainer::<B>(lambda)
        .fit(&prepared.x_train, &prepared.data.y_train)?;
    let model = &outcome.model;

    println!("------------------");
    println!(
        "Training accuracy: {}",
        percent(&prepared.data.y_train, &model.classify(&prepared.x_train))
    );
    if prepared.x_test.rows() > 0 {
        let y_test = &prepared.data.y_test;
        println!("Testing accuracy: {}", percent(y_test, &model.classify(&prepared.x_test)));
        let fast = model.fast_predict_batch(&prepared.x_test).threshold(0.5);
        println!("Testing accuracy with fast_sigmoid: {}", percent(y_test, &fast));
    }
    println!("------------------");

    let exported = ExportedModel::from_fitted(model, &prepared.scaler)?;
    print!("{}", exported.to_text(&config.prefix));

    if let Some(path) = &args.output {
        if path.extension().is_some_and(|ext| ext == "json") {
            exported.save_json(path)?;
        } else {
            exported.save_to_file(path)?;
        }
        info!(path = %path.display(), "parameters saved");
    }
    if let Some(path) = &args.log {
        outcome.log.save_json_lines(path)?;
        info!(path = %path.display(), records = outcome.log.len(), "training log saved");
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Train(args) => {
            let config = args.pipeline_config()?;
            let prepared = prepare(&args, &config)?;
            train_and_report(&args, &config, &prepared, config.train.lambda)
        }
        Command::CrossValidate(args) => {
            let config = args.pipeline_config()?;
            let prepared = prepare(&args, &config)?;
            let report = cross_validate(
                &prepared.x_train,
                &prepared.data.y_train,
                config.train.lambda,
                &config.train.cross_validation(),
            )?;
            for (i, acc) in report.fold_accuracies.iter().enumerate() {
                println!("Fold {i}: {:.3}", acc);
            }
            println!("Mean CV acc: {:.3}", report.mean_accuracy);
            Ok(())
        }
        Command::Search { run, depth } => {
            let config = run.pipeline_config()?;
            let prepared = prepare(&run, &config)?;
            let result = find_regularization_param_with(
                &prepared.x_train,
                &prepared.data.y_train,
                depth.unwrap_or(config.train.search_depth),
                &config.train.cross_validation(),
            )?;
            println!("Best lambda: {}", result.best_lambda);
            println!("Best CV acc: {:.3}", result.best_accuracy);
            train_and_report(&run, &config, &prepared, result.best_lambda)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
