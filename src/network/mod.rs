pub mod construction;
pub mod feed_forward;
mod backprop;

pub use self::construction::LinearBuilder;
pub use self::feed_forward::FeedForward;

#[cfg(test)]
pub(crate) mod tests {
    use crate::Float;

    /// Compares two arrays with the given error tolerance. Returns None if either of the arrays contains NaN.
    pub(crate) fn is_equal_ish(left: &[Float], right: &[Float], tolerance: Float) -> Option<bool> {
        assert_eq!(left.len(), right.len());
        let err = left
            .iter()
            .zip(right)
            .map(|(l, r)| Float::abs(l - r))
            .try_fold(0., |a: Float, b| a.partial_cmp(&b).map(|_| a.max(b)));
        err.map(|e| e < tolerance)
    }

    pub(crate) fn check(expected: &[Float], output: &[Float], tolerance: Float, id: &str) {
        let diag = || format!("expected: {:?}\nreceived: {:?}", expected, output);

        match is_equal_ish(expected, output, tolerance) {
            Some(true) => {}
            Some(false) => panic!("Evaluation produced incorrect {}.\n{}", id, diag()),
            None => panic!("Evaluation produced a NaN\n{}", diag()),
        }
    }
}
