use crate::statistics::variance::VarianceExt;

use super::EmptySequenceError;

pub trait StandardDeviationExt: Iterator {
    /// Population standard deviation.
    fn standard_deviation(self) -> Result<f64, EmptySequenceError>;
}
impl<T> StandardDeviationExt for T
where
    T: Iterator<Item = f64> + Clone,
{
    fn standard_deviation(self) -> Result<f64, EmptySequenceError> {
        Ok(self.variance()?.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_std_dev() {
        let examples = [10.0, 20.0, 30.0];
        let std_dev = examples.iter().copied().standard_deviation().unwrap();
        assert_abs_diff_eq!(std_dev, (200.0_f64 / 3.0).sqrt(), epsilon = 1e-12);

        let constant = core::iter::repeat(3.0).take(4);
        assert_eq!(constant.standard_deviation().unwrap(), 0.0);

        let empty: [f64; 0] = [];
        assert!(empty.iter().copied().standard_deviation().is_err());
    }
}
