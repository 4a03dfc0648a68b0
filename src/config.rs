//! Run configuration read from a JSON file.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::network::construction::validate_sizes;
use crate::trainer::TrainingConfig;

/// Network shape and training hyperparameters for a single run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Layer sizes, input layer first.
    pub layers: Vec<usize>,
    pub training: TrainingConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&s)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_sizes(&self.layers)?;
        self.training.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    const CONFIG: &str = r#"{
        "layers": [784, 30, 10],
        "training": {"epochs": 30, "batch_size": 10, "learning_rate": 3.0}
    }"#;

    #[test]
    fn parse_and_validate() {
        let config: Config = serde_json::from_str(CONFIG).unwrap();
        assert_eq!(config.layers, vec![784, 30, 10]);
        assert_eq!(config.training.epochs, 30);
        assert!(config.validate().is_ok());

        let bad = Config {
            layers: vec![784],
            ..config
        };
        assert!(matches!(
            bad.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn from_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(CONFIG.as_bytes())?;
        let config = Config::from_file(file.path())?;
        assert_eq!(config.training.learning_rate, 3.);

        let mut zero_batch = tempfile::NamedTempFile::new()?;
        zero_batch.write_all(CONFIG.replace("\"batch_size\": 10", "\"batch_size\": 0").as_bytes())?;
        assert!(Config::from_file(zero_batch.path()).is_err());
        assert!(Config::from_file("does/not/exist.json").is_err());
        Ok(())
    }
}
