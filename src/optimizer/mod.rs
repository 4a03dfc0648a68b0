pub use gradient_descent::GradientDescent;
pub mod gradient_descent;

use crate::data::Example;
use crate::error::{Error, Result};
use crate::gradients::Gradients;
use crate::network::FeedForward;

/// Performs one parameter update from a mini-batch.
///
/// The gradients of every example are summed into a zeroed accumulator and the average is
/// applied by `alg`. Every example is backpropagated before any parameter changes, so an
/// invalid example leaves the network untouched.
pub fn update_mini_batch(
    net: &mut FeedForward,
    batch: &[Example],
    alg: &GradientDescent,
) -> Result<()> {
    if batch.is_empty() {
        return Err(Error::InvalidInput(
            "Attempted to update the model with an empty mini-batch".to_owned(),
        ));
    }

    let mut grads = Gradients::zeros_like(net);
    for example in batch {
        grads.accumulate(&net.backpropagate_example(example)?);
    }

    alg.update_weights(net, &grads, batch.len());
    tracing::trace!(
        batch_len = batch.len(),
        max_grad = grads.max_abs(),
        "applied mini-batch update"
    );
    Ok(())
}
