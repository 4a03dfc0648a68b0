//! A fully connected sigmoid network trained with mini-batch stochastic gradient descent.

pub mod a_funcs;
pub mod config;
pub mod data;
pub mod error;
pub mod gradients;
pub mod initializer;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod trainer;

pub use error::{Error, Result};

/// Scalar type of every parameter, activation and gradient.
pub type Float = f64;
