use crate::Float;
use ndarray::ArrayView1;
use std::fmt::Debug;

/// A cost function evaluated on a single output/target pair.
pub trait LossFunc: Debug {
    fn eval(&self, val: ArrayView1<Float>, target: ArrayView1<Float>) -> Float;
}

/// The quadratic cost `0.5 * ‖a - y‖²`. Its gradient with respect to the output is
/// `a - y`, which is the output error used by backpropagation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quadratic;

impl LossFunc for Quadratic {
    fn eval(&self, val: ArrayView1<Float>, target: ArrayView1<Float>) -> Float {
        assert_eq!(
            val.len(),
            target.len(),
            "Value vector must be the same length as target vector. val: {}, target: {}",
            val.len(),
            target.len()
        );

        let diff = &val - &target;
        0.5 * diff.dot(&diff)
    }
}

/// Binary cross-entropy summed over the outputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrossEntropy;

impl LossFunc for CrossEntropy {
    fn eval(&self, val: ArrayView1<Float>, target: ArrayView1<Float>) -> Float {
        assert_eq!(
            val.len(),
            target.len(),
            "Value vector must be the same length as target vector. val: {}, target: {}",
            val.len(),
            target.len()
        );

        val.iter()
            .zip(target)
            .map(|(&a, &y)| {
                let c = -y * a.ln() - (1. - y) * (1. - a).ln();
                // 0 * ln(0) terms
                if c.is_nan() {
                    0.
                } else {
                    c
                }
            })
            .sum()
    }
}
