use getset::Getters;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    statistics::fraction,
    table::{Column, Table},
};

use super::{check_schema, Estimate, Transform};

/// Per-column scalar that decides whether a column is kept.
pub trait ColumnStatistic {
    fn compute(&self, column: &Column, n_rows: usize) -> f64;
}

/// Fraction of missing cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingFraction;
impl ColumnStatistic for MissingFraction {
    fn compute(&self, column: &Column, n_rows: usize) -> f64 {
        fraction(column.missing_count(), n_rows)
    }
}

/// Fraction of distinct present values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistinctFraction;
impl ColumnStatistic for DistinctFraction {
    fn compute(&self, column: &Column, n_rows: usize) -> f64 {
        fraction(column.distinct_count(), n_rows)
    }
}

/// Date columns whose cardinality says nothing about their usefulness.
pub const DEFAULT_CARDINALITY_EXCLUDE: [&str; 2] = ["incident_date", "policy_bind_date"];

/// Keeps a column iff it is excluded or its statistic is strictly below the
/// threshold.
#[derive(Debug, Clone)]
pub struct ColumnDroppingEstimator<S> {
    statistic: S,
    threshold: f64,
    exclude: Vec<String>,
}
impl<S> ColumnDroppingEstimator<S> {
    /// # Error
    ///
    /// Return [`Error::InvalidParameter`] if `threshold` is not in `[0, 1]`
    pub fn new(statistic: S, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidParameter(format!(
                "threshold must be in [0, 1], got {threshold}"
            )));
        }
        Ok(Self {
            statistic,
            threshold,
            exclude: vec![],
        })
    }

    #[must_use]
    pub fn with_exclude<I, N>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

pub type NanColumnsDropper = ColumnDroppingEstimator<MissingFraction>;
impl NanColumnsDropper {
    pub fn nan(threshold: f64) -> Result<Self> {
        Self::new(MissingFraction, threshold)
    }
}
impl Default for NanColumnsDropper {
    fn default() -> Self {
        Self {
            statistic: MissingFraction,
            threshold: 0.4,
            exclude: vec![],
        }
    }
}

pub type HighCardinalityDropper = ColumnDroppingEstimator<DistinctFraction>;
impl HighCardinalityDropper {
    /// Excludes [`DEFAULT_CARDINALITY_EXCLUDE`] unless replaced with
    /// [`ColumnDroppingEstimator::with_exclude`].
    pub fn cardinality(threshold: f64) -> Result<Self> {
        Ok(Self::new(DistinctFraction, threshold)?.with_exclude(DEFAULT_CARDINALITY_EXCLUDE))
    }
}
impl Default for HighCardinalityDropper {
    fn default() -> Self {
        Self {
            statistic: DistinctFraction,
            threshold: 0.9,
            exclude: vec![],
        }
        .with_exclude(DEFAULT_CARDINALITY_EXCLUDE)
    }
}

impl<S> Estimate for ColumnDroppingEstimator<S>
where
    S: ColumnStatistic,
{
    type Output = ColumnDropper;

    fn fit(&self, examples: &Table) -> Result<Self::Output> {
        let n_rows = examples.n_rows();
        let mut statistics = vec![];
        let mut retained_columns = vec![];
        let mut dropped_columns = vec![];
        for (name, column) in examples.iter() {
            let statistic = self.statistic.compute(column, n_rows);
            let excluded = self.exclude.iter().any(|x| x == name);
            if excluded || statistic < self.threshold {
                retained_columns.push(name.to_string());
            } else {
                dropped_columns.push(name.to_string());
            }
            statistics.push((name.to_string(), statistic));
        }
        debug!(
            threshold = self.threshold,
            ?dropped_columns,
            "fitted column dropper"
        );
        Ok(ColumnDropper {
            column_names: examples.column_names().to_vec(),
            retained_columns,
            dropped_columns,
            statistics,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ColumnDropper {
    column_names: Vec<String>,
    /// Kept columns in their original order.
    #[getset(get = "pub")]
    retained_columns: Vec<String>,
    #[getset(get = "pub")]
    dropped_columns: Vec<String>,
    /// Fit-time statistic of every column.
    #[getset(get = "pub")]
    statistics: Vec<(String, f64)>,
}
impl Transform for ColumnDropper {
    fn transform(&self, table: &Table) -> Result<Table> {
        check_schema(&self.column_names, table)?;
        table.select(&self.retained_columns)
    }

    fn feature_names_out(&self) -> &[String] {
        &self.retained_columns
    }
}
