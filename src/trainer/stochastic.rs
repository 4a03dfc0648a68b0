use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rand::{seq::SliceRandom, SeedableRng};
use rand_pcg::Pcg64Mcg;

use super::{EpochReport, Logger, TracingLogger, TrainingConfig};
use crate::data::{into_one_hot, Example};
use crate::error::{Error, Result};
use crate::loss::{LossFunc, Quadratic};
use crate::network::FeedForward;
use crate::optimizer::{self, GradientDescent};
use crate::Float;

/// Where the trainer is in its epoch loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainingState {
    /// No epoch has run yet.
    Idle,
    /// `completed` epochs have finished and more remain.
    Running { completed: usize },
    /// Every configured epoch has finished, or training stopped on an error.
    Done,
}

/// Consecutive mini-batches of `batch_size` examples. The last one is shorter when
/// `batch_size` doesn't divide the data length. Panics if `batch_size` is zero.
pub fn partition<T>(data: &[T], batch_size: usize) -> std::slice::Chunks<'_, T> {
    data.chunks(batch_size)
}

/// Drives mini-batch stochastic gradient descent on a network it borrows exclusively.
///
/// Every epoch the whole training set is shuffled, split into mini-batches and each batch is
/// applied in order, so a batch always sees the parameters produced by the one before it.
/// The trainer can be driven with [train](Self::train) or iterated one epoch at a time.
#[derive(Debug)]
pub struct Stochastic<'a> {
    network: &'a mut FeedForward,
    config: TrainingConfig,
    optimizer: GradientDescent,
    cost: Box<dyn LossFunc>,
    logger: Box<dyn Logger>,
    rng: Pcg64Mcg,
    data: Vec<Example>,
    test_data: Option<Vec<Example>>,
    cancel: Option<Arc<AtomicBool>>,
    state: TrainingState,
}

impl<'a> Stochastic<'a> {
    pub fn builder(network: &'a mut FeedForward, config: TrainingConfig) -> StochasticBuilder<'a> {
        StochasticBuilder {
            network,
            config,
            data: Vec::new(),
            test_data: None,
            cost: Box::new(Quadratic),
            logger: Box::new(TracingLogger),
            cancel: None,
        }
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn network(&self) -> &FeedForward {
        &*self.network
    }

    /// Runs every remaining epoch and returns their reports.
    pub fn train(&mut self) -> Result<Vec<EpochReport>> {
        let mut reports = Vec::with_capacity(self.config.epochs);
        for report in self.by_ref() {
            reports.push(report?);
        }
        Ok(reports)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |c| c.load(Ordering::Relaxed))
    }

    /// Shuffles the data, applies every mini-batch and gathers the monitored metrics.
    pub fn do_epoch(&mut self) -> Result<EpochReport> {
        let epoch = match self.state {
            TrainingState::Idle => 0,
            TrainingState::Running { completed } => completed,
            TrainingState::Done => {
                return Err(Error::InvalidInput(
                    "All epochs have already been run".to_owned(),
                ))
            }
        };

        let result = self.run_epoch(epoch);
        self.state = match result {
            Ok(_) if epoch + 1 < self.config.epochs => TrainingState::Running {
                completed: epoch + 1,
            },
            _ => TrainingState::Done,
        };
        result
    }

    fn run_epoch(&mut self, epoch: usize) -> Result<EpochReport> {
        self.data.shuffle(&mut self.rng);

        for (batch_idx, batch) in partition(&self.data, self.config.batch_size).enumerate() {
            if self.is_cancelled() {
                tracing::info!(epoch, batch = batch_idx, "training cancelled");
                return Err(Error::Cancelled);
            }
            optimizer::update_mini_batch(self.network, batch, &self.optimizer)?;
            self.logger.batch(epoch, batch_idx, batch.len());
        }

        let report = self.report(epoch)?;
        self.logger.epoch(&report);
        Ok(report)
    }

    /// Computes only the metrics enabled in the monitor.
    fn report(&self, epoch: usize) -> Result<EpochReport> {
        let monitor = self.config.monitor;
        let mut report = EpochReport {
            epoch,
            ..Default::default()
        };

        if monitor.training_cost {
            report.training_cost = Some(self.cost_on(&self.data)?);
        }
        if monitor.training_accuracy {
            report.training_accuracy = Some(self.accuracy_on(&self.data)?);
        }
        if let Some(test) = &self.test_data {
            if monitor.test_cost {
                report.test_cost = Some(self.cost_on(test)?);
            }
            if monitor.test_accuracy {
                report.test_accuracy = Some(self.accuracy_on(test)?);
            }
        }
        Ok(report)
    }

    // Labels within a dataset share one representation, see `uniform_labels`.

    fn cost_on(&self, data: &[Example]) -> Result<Float> {
        let convert = !starts_one_hot(data);
        self.network
            .total_cost(data, self.config.lambda, &*self.cost, convert)
    }

    fn accuracy_on(&self, data: &[Example]) -> Result<(usize, usize)> {
        let convert = starts_one_hot(data);
        Ok((self.network.accuracy(data, convert)?, data.len()))
    }
}

fn starts_one_hot(data: &[Example]) -> bool {
    data.first().map_or(false, |e| e.label.is_one_hot())
}

/// One-hot encodes every label of a dataset that mixes both representations, so the metrics
/// can pick a single conversion for the whole set.
fn uniform_labels(data: Vec<Example>, n_classes: usize) -> Result<Vec<Example>> {
    let one_hot = data.iter().filter(|e| e.label.is_one_hot()).count();
    if one_hot == 0 || one_hot == data.len() {
        Ok(data)
    } else {
        into_one_hot(data, n_classes)
    }
}

impl Iterator for Stochastic<'_> {
    type Item = Result<EpochReport>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == TrainingState::Done {
            return None;
        }
        Some(self.do_epoch())
    }
}

/// Constructor for [Stochastic](self::Stochastic)
pub struct StochasticBuilder<'a> {
    network: &'a mut FeedForward,
    config: TrainingConfig,
    data: Vec<Example>,
    test_data: Option<Vec<Example>>,
    cost: Box<dyn LossFunc>,
    logger: Box<dyn Logger>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> StochasticBuilder<'a> {
    /// The training set.
    pub fn data(mut self, data: Vec<Example>) -> Self {
        self.data = data;
        self
    }

    /// Held-out data for the test metrics.
    pub fn test_data(mut self, data: Vec<Example>) -> Self {
        self.test_data = Some(data);
        self
    }

    /// Cost function used for the cost metrics. Defaults to [Quadratic].
    pub fn cost<C: LossFunc + 'static>(mut self, cost: C) -> Self {
        self.cost = Box::new(cost);
        self
    }

    /// Defaults to [TracingLogger].
    pub fn logger<L: Logger + 'static>(mut self, logger: L) -> Self {
        self.logger = Box::new(logger);
        self
    }

    /// Training stops with [Error::Cancelled] before the next mini-batch once the flag is set.
    pub fn cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build(self) -> Result<Stochastic<'a>> {
        self.config.validate()?;
        if self.data.is_empty() {
            return Err(Error::InvalidInput(
                "The training set must contain at least one example".to_owned(),
            ));
        }
        if self.config.monitor.needs_test_data() {
            match &self.test_data {
                None => {
                    return Err(Error::InvalidConfiguration(
                        "Test metrics are monitored but no test data was provided".to_owned(),
                    ))
                }
                Some(test) if test.is_empty() => {
                    return Err(Error::InvalidInput(
                        "Test metrics are monitored but the test set is empty".to_owned(),
                    ))
                }
                _ => {}
            }
        }

        let out_size = self.network.out_size();
        let data = uniform_labels(self.data, out_size)?;
        let test_data = self
            .test_data
            .map(|test| uniform_labels(test, out_size))
            .transpose()?;

        let rng = match self.config.seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed),
            None => Pcg64Mcg::from_entropy(),
        };

        // with zero epochs every configured epoch is already complete
        let state = if self.config.epochs == 0 {
            TrainingState::Done
        } else {
            TrainingState::Idle
        };

        tracing::debug!(
            examples = data.len(),
            batch_size = self.config.batch_size,
            epochs = self.config.epochs,
            "built trainer"
        );

        Ok(Stochastic {
            optimizer: GradientDescent::new(self.config.learning_rate)?,
            network: self.network,
            config: self.config,
            cost: self.cost,
            logger: self.logger,
            rng,
            data,
            test_data,
            cancel: self.cancel,
            state,
        })
    }
}
