use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by network construction, inference and training.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The network or training parameters can't be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A vector or matrix doesn't have the size the network expects, or a class index has no
    /// matching output neuron.
    #[error("Dimension mismatch for {what}: expected {expected}, received {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Empty data or a label in the wrong representation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Training was stopped through its cancellation token.
    #[error("Training was cancelled")]
    Cancelled,
}

impl Error {
    /// Returns `Err(DimensionMismatch)` unless `expected == found`.
    pub(crate) fn check_dim(what: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                what,
                expected,
                found,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_dim() {
        assert_eq!(Error::check_dim("input", 3, 3), Ok(()));
        assert_eq!(
            Error::check_dim("input", 3, 4),
            Err(Error::DimensionMismatch {
                what: "input",
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn display() {
        let e = Error::DimensionMismatch {
            what: "label",
            expected: 10,
            found: 2,
        };
        assert_eq!(
            e.to_string(),
            "Dimension mismatch for label: expected 10, received 2"
        );
    }
}
