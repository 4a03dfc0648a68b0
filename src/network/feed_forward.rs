use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use anyhow::Context;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::construction::{validate_sizes, LinearBuilder};
use crate::a_funcs::sigmoid_array;
use crate::data::Example;
use crate::error::{Error, Result};
use crate::initializer::Initializer;
use crate::optimizer::{self, GradientDescent};
use crate::Float;

/// A fully connected network of sigmoid neurons.
///
/// Weight matrix `i` has shape `[sizes[i] × sizes[i + 1]]` and bias vector `i` has length
/// `sizes[i + 1]`, so a row vector of activations is propagated as `σ(a·W + b)`.
/// Shapes are fixed at construction and checked again when a network is loaded from a file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "NetworkUnvalidated", try_from = "NetworkUnvalidated")]
pub struct FeedForward {
    sizes: Vec<usize>,
    weights: Vec<Array2<Float>>,
    biases: Vec<Array1<Float>>,
}

impl FeedForward {
    /// Builds a network with the given layer sizes and standard normal parameters.
    pub fn new(sizes: &[usize]) -> Result<Self> {
        LinearBuilder::from_sizes(sizes).build()
    }

    /// Builds a network with the given layer sizes and parameters drawn from `init`.
    pub fn with_initializer<I: Initializer>(sizes: &[usize], init: I) -> Result<Self> {
        LinearBuilder::from_sizes(sizes).initializer(init).build()
    }

    /// Assembles a network from explicit parameters, checking that their shapes line up.
    pub fn from_parts(weights: Vec<Array2<Float>>, biases: Vec<Array1<Float>>) -> Result<Self> {
        if weights.is_empty() {
            return Err(Error::InvalidConfiguration(
                "A network needs at least one weight matrix".to_owned(),
            ));
        }
        Error::check_dim("bias vector count", weights.len(), biases.len())?;

        let mut sizes = vec![weights[0].nrows()];
        for (w, b) in weights.iter().zip(&biases) {
            Error::check_dim("weight matrix rows", *sizes.last().unwrap_or(&0), w.nrows())?;
            Error::check_dim("bias vector", w.ncols(), b.len())?;
            sizes.push(w.ncols());
        }
        validate_sizes(&sizes)?;

        Ok(Self::construct(sizes, weights, biases))
    }

    pub(crate) fn construct(
        sizes: Vec<usize>,
        weights: Vec<Array2<Float>>,
        biases: Vec<Array1<Float>>,
    ) -> Self {
        Self {
            sizes,
            weights,
            biases,
        }
    }

    /// Layer sizes, input first.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn weights(&self) -> &[Array2<Float>] {
        &self.weights
    }

    pub fn biases(&self) -> &[Array1<Float>] {
        &self.biases
    }

    /// Returns input size of the network
    pub fn in_size(&self) -> usize {
        self.sizes[0]
    }

    /// Return output size of the network
    pub fn out_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Mutable access to every weight matrix and bias vector at once, in layer order.
    pub(crate) fn params_mut(
        &mut self,
    ) -> impl Iterator<Item = (&mut Array2<Float>, &mut Array1<Float>)> {
        self.weights.iter_mut().zip(self.biases.iter_mut())
    }

    /// Propagates a single input vector through the network and returns the output activations.
    pub fn feedforward(&self, input: ArrayView1<Float>) -> Result<Array1<Float>> {
        Error::check_dim("input", self.in_size(), input.len())?;

        let mut a = input.to_owned();
        for (w, b) in self.weights.iter().zip(&self.biases) {
            a = sigmoid_array(&(a.dot(w) + b));
        }
        Ok(a)
    }

    /// Propagates a batch of inputs stacked as rows. Row `i` of the result is the output for row `i`.
    pub fn feedforward_batch(&self, inputs: ArrayView2<Float>) -> Result<Array2<Float>> {
        Error::check_dim("input", self.in_size(), inputs.ncols())?;

        let mut a = inputs.to_owned();
        for (w, b) in self.weights.iter().zip(&self.biases) {
            a = sigmoid_array(&(a.dot(w) + b));
        }
        Ok(a)
    }

    /// Sum of the squared entries of every weight matrix.
    pub fn weight_sq_sum(&self) -> Float {
        self.weights.iter().map(|w| w.iter().map(|x| x * x).sum::<Float>()).sum()
    }

    /// Performs one gradient descent step on the average gradient of `batch`.
    pub fn update_mini_batch(&mut self, batch: &[Example], learning_rate: Float) -> Result<()> {
        let alg = GradientDescent::new(learning_rate)?;
        optimizer::update_mini_batch(self, batch, &alg)
    }

    /// Writes the network to `path` as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let s = serde_json::to_string(self)?;
        fs::write(path, s)
            .with_context(|| format!("Failed to save network to {}", path.display()))
    }

    /// Reads a network written by [save](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("Failed to read network from {}", path.display()))?;
        let network = serde_json::from_str(&s)
            .with_context(|| format!("Failed to parse network from {}", path.display()))?;
        Ok(network)
    }
}

/// When deserializing, we first construct this object, validate that it's structure is correct and convert to FeedForward
#[derive(Serialize, Deserialize)]
struct NetworkUnvalidated {
    sizes: Vec<usize>,
    weights: Vec<Array2<Float>>,
    biases: Vec<Array1<Float>>,
}

impl From<FeedForward> for NetworkUnvalidated {
    fn from(net: FeedForward) -> Self {
        NetworkUnvalidated {
            sizes: net.sizes,
            weights: net.weights,
            biases: net.biases,
        }
    }
}

impl TryFrom<NetworkUnvalidated> for FeedForward {
    type Error = Error;

    fn try_from(value: NetworkUnvalidated) -> Result<Self> {
        let network = FeedForward::from_parts(value.weights, value.biases)?;
        if network.sizes != value.sizes {
            return Err(Error::InvalidConfiguration(format!(
                "Stored layer sizes {:?} don't match the parameter shapes {:?}",
                value.sizes, network.sizes
            )));
        }
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::{Constant, Normal};
    use crate::network::tests::check;
    use ndarray::{array, Axis};

    fn network() -> FeedForward {
        FeedForward::with_initializer(&[3, 5, 4, 2], Normal::seeded(1)).unwrap()
    }

    #[test]
    fn output_shape_and_range() {
        let net = network();
        let out = net.feedforward(array![0.3, -1.2, 4.0].view()).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|&a| a > 0. && a < 1.));
    }

    #[test]
    fn saturated_output_stays_in_range() {
        let net = FeedForward::with_initializer(&[2, 2], Constant(1e4)).unwrap();
        let out = net.feedforward(array![1e4, 1e4].view()).unwrap();
        assert!(out.iter().all(|&a| a > 0. && a < 1.));
        let out = net.feedforward(array![-1e4, -1e4].view()).unwrap();
        assert!(out.iter().all(|&a| a > 0. && a < 1.));
    }

    #[test]
    fn idempotent() {
        let net = network();
        let x = array![0.1, 0.2, 0.3];
        assert_eq!(
            net.feedforward(x.view()).unwrap(),
            net.feedforward(x.view()).unwrap()
        );
    }

    #[test]
    fn known_values() {
        // a single neuron with w = [1, 2], b = 0.5
        let net = FeedForward::from_parts(vec![array![[1.], [2.]]], vec![array![0.5]]).unwrap();
        let out = net.feedforward(array![0.25, -0.5].view()).unwrap();
        let expected = crate::a_funcs::sigmoid(0.25 - 1. + 0.5);
        check(&[expected], out.as_slice().unwrap(), 1e-12, "output");
    }

    #[test]
    fn batch_matches_single() {
        let net = network();
        let inputs = array![[0.1, 0.2, 0.3], [-1., 0., 1.], [5., -5., 0.5]];
        let batch = net.feedforward_batch(inputs.view()).unwrap();
        assert_eq!(batch.dim(), (3, 2));
        for (row, input) in batch.axis_iter(Axis(0)).zip(inputs.axis_iter(Axis(0))) {
            let single = net.feedforward(input).unwrap();
            check(
                single.as_slice().unwrap(),
                row.to_vec().as_slice(),
                1e-12,
                "batched output",
            );
        }
    }

    #[test]
    fn input_dimension_mismatch() {
        let net = network();
        assert_eq!(
            net.feedforward(array![1., 2.].view()),
            Err(Error::DimensionMismatch {
                what: "input",
                expected: 3,
                found: 2
            })
        );
        assert!(matches!(
            net.feedforward_batch(array![[1., 2., 3., 4.]].view()),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn from_parts_checks_shapes() {
        let ok = FeedForward::from_parts(
            vec![Array2::zeros((3, 2)), Array2::zeros((2, 1))],
            vec![Array1::zeros(2), Array1::zeros(1)],
        )
        .unwrap();
        assert_eq!(ok.sizes(), &[3, 2, 1]);
        assert_eq!(ok.in_size(), 3);
        assert_eq!(ok.out_size(), 1);

        // second matrix doesn't take 2 inputs
        assert!(matches!(
            FeedForward::from_parts(
                vec![Array2::zeros((3, 2)), Array2::zeros((4, 1))],
                vec![Array1::zeros(2), Array1::zeros(1)],
            ),
            Err(Error::DimensionMismatch { .. })
        ));
        // bias of the wrong length
        assert!(matches!(
            FeedForward::from_parts(vec![Array2::zeros((3, 2))], vec![Array1::zeros(3)]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            FeedForward::from_parts(vec![], vec![]),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn weight_sq_sum() {
        let net = FeedForward::with_initializer(&[2, 3, 1], Constant(2.)).unwrap();
        // 6 + 3 weights of value 2
        assert_eq!(net.weight_sq_sum(), 36.);
    }

    #[test]
    fn deserialize_rejects_inconsistent_sizes() {
        let net = network();
        let mut value = serde_json::to_value(&net).unwrap();
        value["sizes"] = serde_json::json!([3, 5, 4, 3]);
        assert!(serde_json::from_value::<FeedForward>(value).is_err());
    }
}
