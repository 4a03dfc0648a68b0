//! Classification counts and regularized cost over a dataset.

use crate::data::{argmax, Example, Label};
use crate::error::{Error, Result};
use crate::loss::LossFunc;
use crate::network::FeedForward;
use crate::Float;

impl FeedForward {
    /// Number of examples whose predicted class, the index of the largest output, equals the label.
    /// Every label must be a class index.
    pub fn evaluate(&self, data: &[Example]) -> Result<usize> {
        self.count_correct(data, |label| match label {
            Label::ClassIndex(i) => Ok(*i),
            Label::OneHot(_) => Err(Error::InvalidInput(
                "evaluate expects class index labels".to_owned(),
            )),
        })
    }

    /// Like [evaluate](Self::evaluate), but with `convert` set the labels must be one-hot
    /// vectors, which are reduced to a class index through argmax before comparing.
    pub fn accuracy(&self, data: &[Example], convert: bool) -> Result<usize> {
        if !convert {
            return self.evaluate(data);
        }
        let out_size = self.out_size();
        self.count_correct(data, |label| match label {
            Label::OneHot(v) => {
                Error::check_dim("one-hot label", out_size, v.len())?;
                Ok(argmax(v.view()))
            }
            Label::ClassIndex(_) => Err(Error::InvalidInput(
                "accuracy with conversion expects one-hot labels".to_owned(),
            )),
        })
    }

    fn count_correct<F>(&self, data: &[Example], mut class_of: F) -> Result<usize>
    where
        F: FnMut(&Label) -> Result<usize>,
    {
        let mut correct = 0;
        for example in data {
            let expected = class_of(&example.label)?;
            let output = self.feedforward(example.input.view())?;
            if argmax(output.view()) == expected {
                correct += 1;
            }
        }
        Ok(correct)
    }

    /// Average `cost` over `data` plus the L2 penalty `0.5 * (lambda / n) * Σ‖W‖²`.
    ///
    /// With `convert` set the labels must be class indices and are one-hot encoded first,
    /// otherwise they must already be one-hot vectors.
    pub fn total_cost<C>(
        &self,
        data: &[Example],
        lambda: Float,
        cost: &C,
        convert: bool,
    ) -> Result<Float>
    where
        C: LossFunc + ?Sized,
    {
        if data.is_empty() {
            return Err(Error::InvalidInput(
                "Cannot compute the cost of an empty dataset".to_owned(),
            ));
        }
        let n = data.len() as Float;
        let out_size = self.out_size();

        let mut total = 0.;
        for example in data {
            let target = match (&example.label, convert) {
                (Label::ClassIndex(_), true) | (Label::OneHot(_), false) => {
                    example.label.to_one_hot(out_size)?
                }
                (Label::OneHot(_), true) => {
                    return Err(Error::InvalidInput(
                        "Label is already one-hot, conversion was requested".to_owned(),
                    ))
                }
                (Label::ClassIndex(_), false) => {
                    return Err(Error::InvalidInput(
                        "Cost without conversion expects one-hot labels".to_owned(),
                    ))
                }
            };
            let output = self.feedforward(example.input.view())?;
            total += cost.eval(output.view(), target.view()) / n;
        }

        Ok(total + 0.5 * (lambda / n) * self.weight_sq_sum())
    }
}
