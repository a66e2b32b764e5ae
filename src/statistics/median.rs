use num_traits::Float;

use super::EmptySequenceError;

pub trait MedianExt<F>: Iterator<Item = F> {
    /// The middle value, or the average of the two middle values if the
    /// count is even.
    fn median(self) -> Result<F, EmptySequenceError>;
}
impl<T, F> MedianExt<F> for T
where
    T: Iterator<Item = F>,
    F: Float,
{
    fn median(self) -> Result<F, EmptySequenceError> {
        let mut examples = self.collect::<Vec<F>>();
        if examples.is_empty() {
            return Err(EmptySequenceError);
        }
        examples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
        let mid = examples.len() / 2;
        if examples.len() % 2 == 1 {
            return Ok(examples[mid]);
        }
        let two = F::one() + F::one();
        Ok(examples[mid - 1] / two + examples[mid] / two)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        let odd = [3.0, 1.0, 2.0];
        assert_eq!(odd.iter().copied().median().unwrap(), 2.0);

        let even = [4.0_f32, 1.0, 3.0, 2.0];
        assert_eq!(even.iter().copied().median().unwrap(), 2.5);

        let empty: [f64; 0] = [];
        assert!(empty.iter().copied().median().is_err());
    }
}
