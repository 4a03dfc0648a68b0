#![allow(dead_code)]

use rusty_mlp::{data::Example, Float};

/// Two well separated clusters, class 0 around (0.2, 0.2) and class 1 around (0.8, 0.8).
pub fn clusters(n: usize) -> Vec<Example> {
    (0..n)
        .map(|i| {
            let class = i % 2;
            let centre = if class == 0 { 0.2 } else { 0.8 };
            let jitter = |k: usize| ((i * 7 + k * 13) % 11) as Float / 11. * 0.2 - 0.1;
            Example::class(vec![centre + jitter(0), centre + jitter(1)], class)
        })
        .collect()
}

pub fn assert_close(expected: Float, found: Float, tolerance: Float, what: &str) {
    assert!(
        (expected - found).abs() <= tolerance,
        "{}: expected {}, found {}",
        what,
        expected,
        found
    );
}
