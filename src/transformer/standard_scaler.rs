use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use strict_num::FiniteF64;
use tracing::debug;

use crate::{
    error::{Error, Result},
    statistics::{mean::MeanExt, standard_deviation::StandardDeviationExt},
    table::{Column, Table},
};

use super::{check_schema, Estimate, Transform};

#[derive(Debug, Clone, Copy)]
pub struct StandardScalingEstimator {
    with_mean: bool,
    with_std: bool,
}
impl StandardScalingEstimator {
    pub fn new(with_mean: bool, with_std: bool) -> Self {
        Self {
            with_mean,
            with_std,
        }
    }
}
impl Default for StandardScalingEstimator {
    fn default() -> Self {
        Self::new(true, true)
    }
}
impl Estimate for StandardScalingEstimator {
    type Output = StandardScaler;

    fn fit(&self, examples: &Table) -> Result<Self::Output> {
        let columns = examples
            .iter()
            .map(|(name, column)| -> Result<ColumnScaler> {
                let numbers = column.numbers(name)?.flatten();
                let empty = |_| Error::EmptyColumn(name.to_string());
                let mean = match self.with_mean {
                    true => numbers.clone().mean().map_err(empty)?,
                    false => 0.0,
                };
                let standard_deviation = match self.with_std {
                    true => numbers.standard_deviation().map_err(empty)?,
                    false => 1.0,
                };
                let scaler = ColumnScaler::new(mean, standard_deviation)
                    .ok_or_else(|| Error::InvalidParameter(format!("column `{name}` is not finite")))?;
                Ok(scaler)
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(?columns, "fitted standard scaler");
        Ok(StandardScaler {
            column_names: examples.column_names().to_vec(),
            columns,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, CopyGetters)]
/// Standardization of one column.
pub struct ColumnScaler {
    #[getset(get_copy = "pub")]
    mean: FiniteF64,
    /// `1` where the fit-time deviation was zero.
    #[getset(get_copy = "pub")]
    standard_deviation: FiniteF64,
}
impl ColumnScaler {
    /// # Option
    ///
    /// Return [`None`] if either statistic is not finite
    #[must_use]
    pub fn new(mean: f64, standard_deviation: f64) -> Option<Self> {
        let standard_deviation = match standard_deviation {
            x if x == 0.0 => 1.0,
            x => x,
        };
        Some(Self {
            mean: FiniteF64::new(mean)?,
            standard_deviation: FiniteF64::new(standard_deviation)?,
        })
    }

    #[must_use]
    pub fn scale(&self, x: f64) -> f64 {
        (x - self.mean.get()) / self.standard_deviation.get()
    }
}

/// Borrowed from `sklearn.preprocessing.StandardScaler`, keeping the column
/// names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct StandardScaler {
    #[getset(get = "pub")]
    column_names: Vec<String>,
    #[getset(get = "pub")]
    columns: Vec<ColumnScaler>,
}
impl Transform for StandardScaler {
    fn transform(&self, table: &Table) -> Result<Table> {
        check_schema(&self.column_names, table)?;
        let columns = table
            .iter()
            .zip(&self.columns)
            .map(|((name, column), scaler)| -> Result<(String, Column)> {
                let scaled = column
                    .numbers(name)?
                    .map(|x| x.map(|x| scaler.scale(x)))
                    .collect();
                Ok((name.to_string(), Column::Float(scaled)))
            })
            .collect::<Result<Vec<_>>>()?;
        Table::new(columns)
    }

    fn feature_names_out(&self) -> &[String] {
        &self.column_names
    }
}
