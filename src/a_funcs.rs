use crate::Float;
use ndarray::{Array, Dimension};

/// Inputs are clamped to this magnitude before evaluating the sigmoid, which keeps
/// `exp` finite and the output strictly inside (0, 1).
pub const Z_LIMIT: Float = 30.;

/// The logistic function `1 / (1 + e^-x)`.
pub fn sigmoid(x: Float) -> Float {
    let x = x.clamp(-Z_LIMIT, Z_LIMIT);
    1. / (1. + (-x).exp())
}

/// Derivative of [sigmoid](self::sigmoid) with respect to its input.
pub fn sigmoid_prime(x: Float) -> Float {
    let s = sigmoid(x);
    s * (1. - s)
}

/// Elementwise sigmoid.
pub fn sigmoid_array<D: Dimension>(z: &Array<Float, D>) -> Array<Float, D> {
    z.mapv(sigmoid)
}

/// Elementwise sigmoid derivative.
pub fn sigmoid_prime_array<D: Dimension>(z: &Array<Float, D>) -> Array<Float, D> {
    z.mapv(sigmoid_prime)
}
