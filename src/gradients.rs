use ndarray::{Array1, Array2};

use crate::network::FeedForward;
use crate::Float;

/// Gradients of the cost with respect to every weight matrix and bias vector of a network.
/// Shapes mirror the network's parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradients {
    pub weights: Vec<Array2<Float>>,
    pub biases: Vec<Array1<Float>>,
}

impl Gradients {
    pub fn new(weights: Vec<Array2<Float>>, biases: Vec<Array1<Float>>) -> Self {
        Self { weights, biases }
    }

    /// Zeroed gradients shaped like the parameters of `net`.
    pub fn zeros_like(net: &FeedForward) -> Self {
        Self {
            weights: net.weights().iter().map(|w| Array2::zeros(w.dim())).collect(),
            biases: net.biases().iter().map(|b| Array1::zeros(b.len())).collect(),
        }
    }

    /// Adds `other` to self. Both must come from the same network.
    pub fn accumulate(&mut self, other: &Gradients) {
        assert_eq!(self.weights.len(), other.weights.len());
        for (acc, g) in self.weights.iter_mut().zip(&other.weights) {
            *acc += g;
        }
        for (acc, g) in self.biases.iter_mut().zip(&other.biases) {
            *acc += g;
        }
    }

    /// Sets every gradient to zero.
    pub fn reset(&mut self) {
        self.weights.iter_mut().for_each(|w| w.fill(0.));
        self.biases.iter_mut().for_each(|b| b.fill(0.));
    }

    /// Largest absolute gradient entry.
    pub fn max_abs(&self) -> Float {
        let w = self.weights.iter().flat_map(|w| w.iter());
        let b = self.biases.iter().flat_map(|b| b.iter());
        w.chain(b).fold(0., |m: Float, x| m.max(x.abs()))
    }

    /// Applies `param += k * grad` to every parameter of `net`.
    pub(crate) fn apply_to(&self, net: &mut FeedForward, k: Float) {
        for ((w, b), (dw, db)) in net
            .params_mut()
            .zip(self.weights.iter().zip(&self.biases))
        {
            w.scaled_add(k, dw);
            b.scaled_add(k, db);
        }
    }
}
