use crate::error::{Error, Result};
use crate::gradients::Gradients;
use crate::network::FeedForward;
use crate::Float;

/// Gradient descent simply steps the weights based on their derivatives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientDescent {
    l_rate: Float,
}

impl GradientDescent {
    /// Fails if the learning rate is negative or not finite. A rate of zero is allowed.
    pub fn new(l_rate: Float) -> Result<Self> {
        if !l_rate.is_finite() || l_rate < 0. {
            return Err(Error::InvalidConfiguration(format!(
                "Learning rate must be a finite, non-negative number, received {}",
                l_rate
            )));
        }
        Ok(Self { l_rate })
    }

    pub fn l_rate(&self) -> Float {
        self.l_rate
    }

    /// Applies `param -= l_rate / batch_len * grad` to every parameter of `net`,
    /// where `grads` holds the gradients summed over a batch of `batch_len` examples.
    pub fn update_weights(&self, net: &mut FeedForward, grads: &Gradients, batch_len: usize) {
        assert!(batch_len > 0);
        let k = -self.l_rate / batch_len as Float;
        grads.apply_to(net, k);
    }
}
