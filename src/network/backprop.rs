use ndarray::{Array2, ArrayView2, Axis};

use super::FeedForward;
use crate::a_funcs::{sigmoid_array, sigmoid_prime_array};
use crate::data::Example;
use crate::error::{Error, Result};
use crate::gradients::Gradients;
use crate::Float;

/// Weighted inputs and activations recorded during a forward pass over a batch.
struct Trace {
    /// `z_l` for every layer transition.
    zs: Vec<Array2<Float>>,
    /// `a_l` for every layer, starting with the input.
    activations: Vec<Array2<Float>>,
}

impl FeedForward {
    fn trace(&self, inputs: ArrayView2<Float>) -> Trace {
        let mut zs = Vec::with_capacity(self.weights().len());
        let mut activations = Vec::with_capacity(self.sizes().len());

        let mut a = inputs.to_owned();
        for (w, b) in self.weights().iter().zip(self.biases()) {
            let z = a.dot(w) + b;
            let next = sigmoid_array(&z);
            activations.push(std::mem::replace(&mut a, next));
            zs.push(z);
        }
        activations.push(a);

        Trace { zs, activations }
    }

    /// Computes the gradient of the quadratic cost with respect to every weight and bias
    /// for a batch of inputs and targets stacked as rows.
    ///
    /// The gradients are summed over the rows of the batch, not averaged, so a batch of one
    /// and a batch of many produce gradients of the same shape.
    pub fn backpropagate(
        &self,
        inputs: ArrayView2<Float>,
        targets: ArrayView2<Float>,
    ) -> Result<Gradients> {
        Error::check_dim("input", self.in_size(), inputs.ncols())?;
        Error::check_dim("target", self.out_size(), targets.ncols())?;
        Error::check_dim("target rows", inputs.nrows(), targets.nrows())?;
        if inputs.nrows() == 0 {
            return Err(Error::InvalidInput(
                "Cannot backpropagate an empty batch".to_owned(),
            ));
        }

        let Trace { zs, activations } = self.trace(inputs);
        let layers = self.weights().len();

        let mut weights = Vec::with_capacity(layers);
        let mut biases = Vec::with_capacity(layers);

        // output error (a_L - y) ⊙ σ'(z_L)
        let mut delta = (&activations[layers] - &targets) * sigmoid_prime_array(&zs[layers - 1]);

        for l in (0..layers).rev() {
            weights.push(activations[l].t().dot(&delta));
            biases.push(delta.sum_axis(Axis(0)));
            if l > 0 {
                delta = delta.dot(&self.weights()[l].t()) * sigmoid_prime_array(&zs[l - 1]);
            }
        }

        weights.reverse();
        biases.reverse();
        Ok(Gradients::new(weights, biases))
    }

    /// Backpropagates a single example, encoding class-index labels as one-hot targets.
    pub fn backpropagate_example(&self, example: &Example) -> Result<Gradients> {
        let target = example.label.to_one_hot(self.out_size())?;
        self.backpropagate(
            example.input.view().insert_axis(Axis(0)),
            target.view().insert_axis(Axis(0)),
        )
    }
}
