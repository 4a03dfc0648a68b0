use super::FeedForward;
use crate::{
    error::{Error, Result},
    initializer::{Initializer, Normal},
};

use ndarray::{Array1, Array2};

/// Builder for fully connected networks. Every layer is connected to the previous one.
pub struct LinearBuilder<I = Normal> {
    sizes: Vec<usize>,
    init: I,
}

impl LinearBuilder<Normal> {
    /// Starts a network with an input layer of `in_size` neurons.
    pub fn new(in_size: usize) -> Self {
        Self::from_sizes(&[in_size])
    }

    /// Starts a network with all of the layer sizes given at once, input size first.
    pub fn from_sizes(sizes: &[usize]) -> Self {
        LinearBuilder {
            sizes: sizes.to_vec(),
            init: Normal::new(),
        }
    }
}

impl<I> LinearBuilder<I>
where
    I: Initializer,
{
    /// Adds a layer of `size` neurons.
    pub fn layer(mut self, size: usize) -> Self {
        self.sizes.push(size);
        self
    }

    /// Adds all of the provided layers in order.
    pub fn layers<T>(mut self, sizes: T) -> Self
    where
        T: IntoIterator<Item = usize>,
    {
        self.sizes.extend(sizes);
        self
    }

    /// Replaces the source of initial weights and biases.
    pub fn initializer<J: Initializer>(self, init: J) -> LinearBuilder<J> {
        LinearBuilder {
            sizes: self.sizes,
            init,
        }
    }

    /// Allocates the parameters. All weights are drawn before the biases.
    pub fn build(mut self) -> Result<FeedForward> {
        validate_sizes(&self.sizes)?;

        let init = &mut self.init;
        let weights: Vec<Array2<_>> = self
            .sizes
            .windows(2)
            .map(|w| Array2::from_shape_fn((w[0], w[1]), |_| init.get(w[0], w[1])))
            .collect();
        let biases: Vec<Array1<_>> = self
            .sizes
            .windows(2)
            .map(|w| Array1::from_shape_fn(w[1], |_| init.get(w[0], w[1])))
            .collect();

        tracing::debug!(sizes = ?self.sizes, "constructed network");
        Ok(FeedForward::construct(self.sizes, weights, biases))
    }
}

/// Checks that `sizes` describe a usable network: at least two layers, none of them empty.
pub(crate) fn validate_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(Error::InvalidConfiguration(format!(
            "A network needs at least an input and an output layer, received {} layer sizes",
            sizes.len()
        )));
    }
    if let Some(i) = sizes.iter().position(|&s| s == 0) {
        return Err(Error::InvalidConfiguration(format!(
            "Layer {} has size 0, every layer needs at least one neuron",
            i
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::Constant;

    #[test]
    fn shapes() {
        let net = LinearBuilder::new(4)
            .layers(vec![3, 2])
            .initializer(Normal::seeded(0))
            .build()
            .unwrap();

        assert_eq!(net.sizes(), &[4, 3, 2]);
        let shapes: Vec<_> = net.weights().iter().map(|w| w.dim()).collect();
        assert_eq!(shapes, vec![(4, 3), (3, 2)]);
        let lens: Vec<_> = net.biases().iter().map(|b| b.len()).collect();
        assert_eq!(lens, vec![3, 2]);
    }

    #[test]
    fn initializer_is_used() {
        let net = LinearBuilder::new(2)
            .layer(2)
            .initializer(Constant(0.5))
            .build()
            .unwrap();
        assert!(net.weights()[0].iter().all(|&w| w == 0.5));
        assert!(net.biases()[0].iter().all(|&b| b == 0.5));
    }

    #[test]
    fn seeded_builds_match() {
        let a = LinearBuilder::from_sizes(&[3, 5, 2])
            .initializer(Normal::seeded(9))
            .build()
            .unwrap();
        let b = LinearBuilder::from_sizes(&[3, 5, 2])
            .initializer(Normal::seeded(9))
            .build()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_sizes() {
        assert!(matches!(
            LinearBuilder::new(3).build(),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            LinearBuilder::from_sizes(&[]).build(),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            LinearBuilder::from_sizes(&[3, 0, 2]).build(),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
