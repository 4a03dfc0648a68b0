//! Stochastic gradient descent over a dataset for a configured number of epochs.

mod logger;
mod stochastic;

pub use logger::{LogFile, Logger, MockLogger, TracingLogger};
pub use stochastic::{partition, Stochastic, StochasticBuilder, TrainingState};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::Float;

/// Which metrics are computed after every epoch. Each toggle only controls whether its metric
/// is computed and reported, none of them affect training.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
    pub test_cost: bool,
    pub test_accuracy: bool,
    pub training_cost: bool,
    pub training_accuracy: bool,
}

impl Monitor {
    /// Every metric enabled.
    pub fn all() -> Self {
        Self {
            test_cost: true,
            test_accuracy: true,
            training_cost: true,
            training_accuracy: true,
        }
    }

    /// True if any metric needs the test set.
    pub fn needs_test_data(&self) -> bool {
        self.test_cost || self.test_accuracy
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: Float,
    /// L2 regularization coefficient, only used when reporting cost.
    #[serde(default)]
    pub lambda: Float,
    /// Seed for the shuffling RNG. Taken from system entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub monitor: Monitor,
}

impl TrainingConfig {
    pub fn new(epochs: usize, batch_size: usize, learning_rate: Float) -> Self {
        Self {
            epochs,
            batch_size,
            learning_rate,
            lambda: 0.,
            seed: None,
            monitor: Monitor::default(),
        }
    }

    pub fn lambda(mut self, lambda: Float) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn monitor(mut self, monitor: Monitor) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfiguration(
                "Batch size must be at least 1".to_owned(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate < 0. {
            return Err(Error::InvalidConfiguration(format!(
                "Learning rate must be a finite, non-negative number, received {}",
                self.learning_rate
            )));
        }
        if !self.lambda.is_finite() || self.lambda < 0. {
            return Err(Error::InvalidConfiguration(format!(
                "Regularization coefficient must be a finite, non-negative number, received {}",
                self.lambda
            )));
        }
        Ok(())
    }
}

/// Metrics gathered after an epoch. A metric is `None` when its toggle in [Monitor] is off.
/// Accuracies are `(correct, total)`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EpochReport {
    pub epoch: usize,
    pub test_cost: Option<Float>,
    pub test_accuracy: Option<(usize, usize)>,
    pub training_cost: Option<Float>,
    pub training_accuracy: Option<(usize, usize)>,
}

impl EpochReport {
    /// True if no metric was computed.
    pub fn is_empty(&self) -> bool {
        self.test_cost.is_none()
            && self.test_accuracy.is_none()
            && self.training_cost.is_none()
            && self.training_accuracy.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_from_json() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{"epochs": 10, "batch_size": 10, "learning_rate": 3.0}"#)
                .unwrap();
        assert_eq!(config, TrainingConfig::new(10, 10, 3.));
        assert_eq!(config.monitor, Monitor::default());
    }

    #[test]
    fn partial_monitor_from_json() {
        let config: TrainingConfig = serde_json::from_str(
            r#"{"epochs": 1, "batch_size": 2, "learning_rate": 0.5, "lambda": 5.0,
                "seed": 4, "monitor": {"training_cost": true}}"#,
        )
        .unwrap();
        assert_eq!(config.lambda, 5.);
        assert_eq!(config.seed, Some(4));
        assert!(config.monitor.training_cost);
        assert!(!config.monitor.test_cost && !config.monitor.test_accuracy);
        assert!(!config.monitor.needs_test_data());
    }

    #[test]
    fn validation() {
        assert!(TrainingConfig::new(1, 10, 0.1).validate().is_ok());
        assert!(TrainingConfig::new(0, 10, 0.).validate().is_ok());
        assert!(TrainingConfig::new(1, 0, 0.1).validate().is_err());
        assert!(TrainingConfig::new(1, 1, -0.1).validate().is_err());
        assert!(TrainingConfig::new(1, 1, Float::NAN).validate().is_err());
        assert!(TrainingConfig::new(1, 1, 0.1)
            .lambda(-1.)
            .validate()
            .is_err());
    }

    #[test]
    fn report_emptiness() {
        assert!(EpochReport::default().is_empty());
        assert!(!EpochReport {
            training_cost: Some(0.),
            ..Default::default()
        }
        .is_empty());
        assert!(Monitor::all().needs_test_data());
    }
}
