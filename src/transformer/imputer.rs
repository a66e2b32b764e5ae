use std::collections::HashSet;

use getset::Getters;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    statistics::{mean::MeanExt, median::MedianExt, mode::ModeExt},
    table::{Column, ColumnKind, Table, Value},
};

use super::{check_schema, Estimate, Transform};

/// Text cell written where the original text was present.
pub const DEFINED: &str = "defined";
/// Text cell written where the original text was missing.
pub const UNDEFINED: &str = "undefined";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    /// Most frequent value; ties go to the smallest value.
    #[serde(alias = "most_frequent")]
    Mode,
    Median,
    Mean,
}

/// Disjoint column groups, each imputed its own way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnGroups {
    #[serde(default)]
    pub categorical_columns: Vec<String>,
    #[serde(default)]
    pub numerical_columns: Vec<String>,
    #[serde(default)]
    pub text_columns: Vec<String>,
}
impl ColumnGroups {
    pub fn iter(&self) -> impl Iterator<Item = &String> + '_ {
        self.categorical_columns
            .iter()
            .chain(&self.numerical_columns)
            .chain(&self.text_columns)
    }

    /// Keeps only the columns `keep` accepts.
    #[must_use]
    pub fn retain(&self, keep: impl Fn(&str) -> bool) -> Self {
        let filter = |columns: &[String]| {
            columns
                .iter()
                .filter(|x| keep(x.as_str()))
                .cloned()
                .collect::<Vec<_>>()
        };
        Self {
            categorical_columns: filter(&self.categorical_columns),
            numerical_columns: filter(&self.numerical_columns),
            text_columns: filter(&self.text_columns),
        }
    }

    fn verify_disjoint(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in self.iter() {
            if !seen.insert(name) {
                return Err(Error::InvalidParameter(format!(
                    "column `{name}` is assigned to more than one group"
                )));
            }
        }
        Ok(())
    }
}

/// Fills missing categorical and numerical cells with values learned at fit
/// time and replaces text columns with a presence label.
#[derive(Debug, Clone)]
pub struct ImputingEstimator {
    groups: ColumnGroups,
    categorical_strategy: FillStrategy,
    numerical_strategy: FillStrategy,
}
impl ImputingEstimator {
    /// # Error
    ///
    /// Return [`Error::InvalidParameter`] if the groups overlap or the
    /// categorical strategy is not [`FillStrategy::Mode`]
    pub fn new(
        groups: ColumnGroups,
        categorical_strategy: FillStrategy,
        numerical_strategy: FillStrategy,
    ) -> Result<Self> {
        groups.verify_disjoint()?;
        if categorical_strategy != FillStrategy::Mode {
            return Err(Error::InvalidParameter(format!(
                "categorical columns only support the mode strategy, got {categorical_strategy:?}"
            )));
        }
        Ok(Self {
            groups,
            categorical_strategy,
            numerical_strategy,
        })
    }

    pub fn groups(&self) -> &ColumnGroups {
        &self.groups
    }
}
impl Estimate for ImputingEstimator {
    type Output = Imputer;

    fn fit(&self, examples: &Table) -> Result<Self::Output> {
        let fit_group = |columns: &[String], strategy: FillStrategy| {
            columns
                .iter()
                .map(|name| -> Result<(String, Value)> {
                    let column = examples.try_column(name)?;
                    let fill = fill_value(column, strategy, name)?;
                    Ok((name.clone(), fill))
                })
                .collect::<Result<Vec<_>>>()
        };
        let categorical_fill = fit_group(&self.groups.categorical_columns, self.categorical_strategy)?;
        let numerical_fill = fit_group(&self.groups.numerical_columns, self.numerical_strategy)?;
        for name in &self.groups.text_columns {
            examples.try_column(name)?;
        }
        debug!(?categorical_fill, ?numerical_fill, "fitted imputer");
        Ok(Imputer {
            column_names: examples.column_names().to_vec(),
            categorical_fill,
            numerical_fill,
            text_columns: self.groups.text_columns.clone(),
        })
    }
}

fn fill_value(column: &Column, strategy: FillStrategy, name: &str) -> Result<Value> {
    let empty = || Error::EmptyColumn(name.to_string());
    match strategy {
        FillStrategy::Mode => {
            let mode = match column {
                Column::Int(x) => x.iter().flatten().copied().mode_by(|a, b| a.cmp(b)).map(Value::Int),
                Column::Float(x) => x
                    .iter()
                    .flatten()
                    .filter(|x| !x.is_nan())
                    .map(|x| (x + 0.0).to_bits())
                    .mode_by(|a, b| f64::from_bits(*a).total_cmp(&f64::from_bits(*b)))
                    .map(|x| Value::Float(f64::from_bits(x))),
                Column::Text(x) => x
                    .iter()
                    .flatten()
                    .map(String::as_str)
                    .mode_by(|a, b| a.cmp(b))
                    .map(Value::from),
            };
            mode.ok_or_else(empty)
        }
        FillStrategy::Median => column
            .numbers(name)?
            .flatten()
            .median()
            .map(Value::Float)
            .map_err(|_| empty()),
        FillStrategy::Mean => column
            .numbers(name)?
            .flatten()
            .mean()
            .map(Value::Float)
            .map_err(|_| empty()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Imputer {
    #[getset(get = "pub")]
    column_names: Vec<String>,
    #[getset(get = "pub")]
    categorical_fill: Vec<(String, Value)>,
    #[getset(get = "pub")]
    numerical_fill: Vec<(String, Value)>,
    #[getset(get = "pub")]
    text_columns: Vec<String>,
}
impl Imputer {
    /// # Option
    ///
    /// Return [`None`] if `column` is neither categorical nor numerical
    pub fn fill_value(&self, column: &str) -> Option<&Value> {
        self.categorical_fill
            .iter()
            .chain(&self.numerical_fill)
            .find(|(name, _)| name == column)
            .map(|(_, fill)| fill)
    }
}
impl Transform for Imputer {
    fn transform(&self, table: &Table) -> Result<Table> {
        check_schema(&self.column_names, table)?;
        let mut imputed = table.clone();
        for (name, fill) in self.categorical_fill.iter().chain(&self.numerical_fill) {
            let column = table.try_column(name)?;
            let kind = match (column.kind(), fill) {
                (ColumnKind::Int, Value::Float(_)) => ColumnKind::Float,
                (kind, _) => kind,
            };
            let cells = column.cells().map(|x| x.or_else(|| Some(fill.clone())));
            imputed = imputed.with_column(name.as_str(), Column::from_cells(kind, cells, name)?)?;
        }
        for name in &self.text_columns {
            let column = table.try_column(name)?;
            let labels = column
                .cells()
                .map(|x| Some((if x.is_some() { DEFINED } else { UNDEFINED }).to_string()))
                .collect();
            imputed = imputed.with_column(name.as_str(), Column::Text(labels))?;
        }
        Ok(imputed)
    }

    fn feature_names_out(&self) -> &[String] {
        &self.column_names
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::transformer::TableExt;

    use super::*;

    fn groups(categorical: &[&str], numerical: &[&str], text: &[&str]) -> ColumnGroups {
        let owned = |x: &[&str]| x.iter().map(|x| x.to_string()).collect();
        ColumnGroups {
            categorical_columns: owned(categorical),
            numerical_columns: owned(numerical),
            text_columns: owned(text),
        }
    }

    #[test]
    fn test_categorical_mode() {
        let estimator =
            ImputingEstimator::new(groups(&["c"], &[], &[]), FillStrategy::Mode, FillStrategy::Mode)
                .unwrap();
        let examples = Table::new([(
            "c",
            Column::from(vec![Some("x"), Some("x"), Some("y"), None]),
        )])
        .unwrap();
        let imputer = examples.fit(&estimator).unwrap();
        assert_eq!(imputer.fill_value("c"), Some(&Value::from("x")));

        let table = Table::new([("c", Column::from(vec![Some("y"), None]))]).unwrap();
        let imputed = table.transform_by(&imputer).unwrap();
        assert_eq!(
            imputed.column("c").unwrap(),
            &Column::from(vec![Some("y"), Some("x")])
        );
    }

    #[test]
    fn test_numerical_median_promotes_int() {
        let estimator = ImputingEstimator::new(
            groups(&[], &["n"], &[]),
            FillStrategy::Mode,
            FillStrategy::Median,
        )
        .unwrap();
        let examples =
            Table::new([("n", Column::from(vec![Some(1_i64), Some(2), None, Some(10), Some(3)]))])
                .unwrap();
        let (imputer, imputed) = examples.fit_transform(&estimator).unwrap();
        assert_eq!(imputer.fill_value("n"), Some(&Value::Float(2.5)));
        assert_eq!(
            imputed.column("n").unwrap(),
            &Column::Float(vec![Some(1.0), Some(2.0), Some(2.5), Some(10.0), Some(3.0)])
        );
    }

    #[test]
    fn test_numerical_mode_and_mean() {
        let examples = Table::new([
            ("m", Column::from(vec![Some(2_i64), Some(2), Some(5), None])),
            ("f", Column::from(vec![Some(1.0_f64), None, Some(2.0), Some(6.0)])),
        ])
        .unwrap();
        let estimator = ImputingEstimator::new(
            groups(&[], &["m"], &[]),
            FillStrategy::Mode,
            FillStrategy::Mode,
        )
        .unwrap();
        let imputer = examples.fit(&estimator).unwrap();
        assert_eq!(imputer.fill_value("m"), Some(&Value::Int(2)));
        let imputed = examples.transform_by(&imputer).unwrap();
        assert_eq!(imputed.column("m").unwrap(), &Column::from(vec![2_i64, 2, 5, 2]));

        let estimator = ImputingEstimator::new(
            groups(&[], &["f"], &[]),
            FillStrategy::Mode,
            FillStrategy::Mean,
        )
        .unwrap();
        let imputer = examples.fit(&estimator).unwrap();
        let Some(Value::Float(mean)) = imputer.fill_value("f") else {
            panic!("mean must be a float");
        };
        assert_abs_diff_eq!(*mean, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_text_presence() {
        let estimator =
            ImputingEstimator::new(groups(&[], &[], &["t"]), FillStrategy::Mode, FillStrategy::Mode)
                .unwrap();
        let examples = Table::new([
            ("t", Column::from(vec![Some("hello"), None])),
            ("other", Column::from(vec![Some(1_i64), None])),
        ])
        .unwrap();
        let (_, imputed) = examples.fit_transform(&estimator).unwrap();
        assert_eq!(
            imputed.column("t").unwrap(),
            &Column::from(vec![DEFINED, UNDEFINED])
        );
        // Outside every group
        assert_eq!(imputed.column("other").unwrap(), examples.column("other").unwrap());
    }

    #[test]
    fn test_transform_is_deterministic() {
        let estimator = ImputingEstimator::new(
            groups(&["c"], &["n"], &["t"]),
            FillStrategy::Mode,
            FillStrategy::Median,
        )
        .unwrap();
        let examples = Table::new([
            ("c", Column::from(vec![Some("a"), None, Some("b")])),
            ("n", Column::from(vec![None, Some(1.0_f64), Some(3.0)])),
            ("t", Column::from(vec![None, Some("x"), None])),
        ])
        .unwrap();
        let imputer = examples.fit(&estimator).unwrap();
        let first = examples.transform_by(&imputer).unwrap();
        let second = examples.transform_by(&imputer).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.column("c").unwrap().missing_count(), 0);
        assert_eq!(first.column("n").unwrap().missing_count(), 0);
    }

    #[test]
    fn test_invalid_configuration() {
        let err = ImputingEstimator::new(
            groups(&["c"], &[], &[]),
            FillStrategy::Median,
            FillStrategy::Median,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let err = ImputingEstimator::new(
            groups(&["c"], &["c"], &[]),
            FillStrategy::Mode,
            FillStrategy::Median,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_fit_errors() {
        let examples = Table::new([
            ("c", Column::Text(vec![None, None])),
            ("t", Column::from(vec!["a", "b"])),
        ])
        .unwrap();
        let estimator =
            ImputingEstimator::new(groups(&["c"], &[], &[]), FillStrategy::Mode, FillStrategy::Mode)
                .unwrap();
        assert_eq!(
            examples.fit(&estimator).unwrap_err(),
            Error::EmptyColumn("c".to_string())
        );

        let estimator =
            ImputingEstimator::new(groups(&["z"], &[], &[]), FillStrategy::Mode, FillStrategy::Mode)
                .unwrap();
        assert_eq!(
            examples.fit(&estimator).unwrap_err(),
            Error::MissingColumn("z".to_string())
        );

        let estimator = ImputingEstimator::new(
            groups(&[], &["t"], &[]),
            FillStrategy::Mode,
            FillStrategy::Median,
        )
        .unwrap();
        assert_eq!(
            examples.fit(&estimator).unwrap_err(),
            Error::NonNumericColumn("t".to_string())
        );
    }
}
