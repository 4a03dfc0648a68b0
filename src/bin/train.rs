//! Trains a network on a CSV dataset and optionally saves the result.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rusty_mlp::{
    config::Config,
    data,
    initializer::Normal,
    network::FeedForward,
    trainer::{LogFile, Stochastic, TracingLogger},
    Float,
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train a sigmoid network with mini-batch gradient descent", long_about = None)]
struct Cli {
    /// JSON file with the layer sizes and training parameters
    #[arg(short, long)]
    config: PathBuf,

    /// Training set, one `label,x1,x2,...` row per example
    #[arg(long)]
    train: PathBuf,

    /// Test set in the same format
    #[arg(long)]
    test: Option<PathBuf>,

    /// Every feature is divided by this value
    #[arg(long, default_value = "1.0")]
    scale: Float,

    /// Where to write the trained network
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Also write per-epoch metrics to this CSV file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbosity level: trace, debug, info, warn or error
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_file(&cli.config)?;
    let training = data::load_csv(&cli.train, cli.scale)?;
    let test = cli
        .test
        .as_ref()
        .map(|path| data::load_csv(path, cli.scale))
        .transpose()?;
    info!(
        "Loaded {} training examples{}",
        training.len(),
        test.as_ref()
            .map(|t| format!(" and {} test examples", t.len()))
            .unwrap_or_default()
    );

    let init = match config.training.seed {
        Some(seed) => Normal::seeded(seed),
        None => Normal::new(),
    };
    let mut network = FeedForward::with_initializer(&config.layers, init)?;

    {
        let mut builder = Stochastic::builder(&mut network, config.training.clone()).data(training);
        if let Some(test) = &test {
            builder = builder.test_data(test.clone());
        }
        builder = match &cli.log_file {
            Some(path) => builder.logger(LogFile::new(path)?),
            None => builder.logger(TracingLogger),
        };
        builder.build()?.train()?;
    }

    if let Some(test) = &test {
        let correct = network.evaluate(test)?;
        info!("Test accuracy: {} / {}", correct, test.len());
    }

    if let Some(path) = &cli.save {
        if let Err(e) = network.save(path) {
            warn!("Error while saving network to {}: {:#}", path.display(), e);
        } else {
            info!("Saved network to {}", path.display());
        }
    }
    Ok(())
}
