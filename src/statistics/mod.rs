use thiserror::Error;

pub mod mean;
pub mod median;
pub mod mode;
pub mod standard_deviation;
pub mod variance;

#[derive(Debug, Error, Clone, Copy)]
#[error("Empty sequence")]
pub struct EmptySequenceError;

/// `count / total`, or `0.0` if `total` is zero.
#[must_use]
pub fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64
}
