//! The fixed preprocessing chain: drop, then impute, then scale and encode.

use getset::Getters;
use tracing::{info, warn};

use crate::{
    error::Result,
    pipeline::{FittedPipeline, Pipeline},
    table::Table,
    transformer::{
        column_dropper::{HighCardinalityDropper, NanColumnsDropper},
        column_selector::ColumnSelector,
        column_transformer::ColumnTransformer,
        date_coercion::DateCoercion,
        imputer::{ColumnGroups, FillStrategy, ImputingEstimator},
        one_hot_encoder::{HandleUnknown, OneHotEncodingEstimator},
        replacer::Replacer,
        standard_scaler::StandardScalingEstimator,
        Estimate, Transform,
    },
};

#[derive(Debug, Clone)]
pub struct PreprocessorEstimator {
    groups: ColumnGroups,
    categorical_strategy: FillStrategy,
    numerical_strategy: FillStrategy,
    handle_unknown: HandleUnknown,
    scaler: StandardScalingEstimator,
    replacer: Option<Replacer>,
    date_coercion: Option<DateCoercion>,
    nan_dropper: Option<NanColumnsDropper>,
    cardinality_dropper: Option<HighCardinalityDropper>,
}
impl PreprocessorEstimator {
    /// # Error
    ///
    /// Return [`crate::error::Error::InvalidParameter`] if the imputer would
    /// reject the groups or strategies
    pub fn new(
        groups: ColumnGroups,
        categorical_strategy: FillStrategy,
        numerical_strategy: FillStrategy,
        handle_unknown: HandleUnknown,
    ) -> Result<Self> {
        ImputingEstimator::new(groups.clone(), categorical_strategy, numerical_strategy)?;
        Ok(Self {
            groups,
            categorical_strategy,
            numerical_strategy,
            handle_unknown,
            scaler: StandardScalingEstimator::default(),
            replacer: None,
            date_coercion: None,
            nan_dropper: None,
            cardinality_dropper: None,
        })
    }

    #[must_use]
    pub fn with_scaler(mut self, scaler: StandardScalingEstimator) -> Self {
        self.scaler = scaler;
        self
    }

    #[must_use]
    pub fn with_replacer(mut self, replacer: Replacer) -> Self {
        self.replacer = Some(replacer);
        self
    }

    #[must_use]
    pub fn with_date_coercion(mut self, date_coercion: DateCoercion) -> Self {
        self.date_coercion = Some(date_coercion);
        self
    }

    #[must_use]
    pub fn with_nan_dropper(mut self, dropper: NanColumnsDropper) -> Self {
        self.nan_dropper = Some(dropper);
        self
    }

    #[must_use]
    pub fn with_cardinality_dropper(mut self, dropper: HighCardinalityDropper) -> Self {
        self.cardinality_dropper = Some(dropper);
        self
    }

    fn dropping_pipeline(&self) -> Pipeline {
        let mut pipeline =
            Pipeline::new().with_step("column_selector", ColumnSelector::new(self.groups.iter().cloned()));
        if let Some(replacer) = &self.replacer {
            pipeline = pipeline.with_step("replacer", replacer.clone());
        }
        if let Some(date_coercion) = &self.date_coercion {
            pipeline = pipeline.with_step("date_coercion", date_coercion.clone());
        }
        if let Some(dropper) = &self.nan_dropper {
            pipeline = pipeline.with_step("nan_dropper", dropper.clone());
        }
        if let Some(dropper) = &self.cardinality_dropper {
            pipeline = pipeline.with_step("cardinality_dropper", dropper.clone());
        }
        pipeline
    }

    fn encoding_pipeline(&self, groups: ColumnGroups) -> Result<Pipeline> {
        let mut column_transformer = ColumnTransformer::new();
        if !groups.numerical_columns.is_empty() {
            column_transformer = column_transformer.with_transformer(
                "numeric_scaler",
                self.scaler,
                groups.numerical_columns.iter().cloned(),
            );
        }
        let categorical = groups
            .categorical_columns
            .iter()
            .chain(&groups.text_columns)
            .cloned()
            .collect::<Vec<_>>();
        if !categorical.is_empty() {
            column_transformer = column_transformer.with_transformer(
                "categorical_encoder",
                OneHotEncodingEstimator::new(self.handle_unknown),
                categorical,
            );
        }
        let imputer = ImputingEstimator::new(groups, self.categorical_strategy, self.numerical_strategy)?;
        Ok(Pipeline::new()
            .with_step("column_imputer", imputer)
            .with_step("column_transformer", column_transformer))
    }
}
impl Estimate for PreprocessorEstimator {
    type Output = Preprocessor;

    fn fit(&self, examples: &Table) -> Result<Self::Output> {
        self.fit_transform(examples).map(|(fitted, _)| fitted)
    }

    fn fit_transform(&self, examples: &Table) -> Result<(Self::Output, Table)> {
        let (dropping, dropped) = self.dropping_pipeline().fit_transform(examples)?;
        let retained_columns = dropping.feature_names_out().to_vec();
        for name in self.groups.iter() {
            if !retained_columns.contains(name) {
                warn!(column = name.as_str(), "configured column dropped before imputation");
            }
        }
        let groups = self.groups.retain(|x| retained_columns.iter().any(|name| name == x));

        let (encoding, transformed) = self.encoding_pipeline(groups.clone())?.fit_transform(&dropped)?;
        info!(
            n_retained = retained_columns.len(),
            n_features = encoding.feature_names_out().len(),
            "fitted preprocessor"
        );
        let fitted = Preprocessor {
            dropping,
            encoding,
            retained_columns,
            groups,
        };
        Ok((fitted, transformed))
    }
}

/// Fitted preprocessing chain.
#[derive(Debug, Getters)]
pub struct Preprocessor {
    dropping: FittedPipeline,
    encoding: FittedPipeline,
    /// Configured columns that survived the droppers, in selection order.
    #[getset(get = "pub")]
    retained_columns: Vec<String>,
    /// Configured groups restricted to [`Preprocessor::retained_columns`].
    #[getset(get = "pub")]
    groups: ColumnGroups,
}
impl Preprocessor {
    /// Fitted steps of the dropping stage followed by those of the encoding
    /// stage.
    pub fn step_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.dropping.step_names().chain(self.encoding.step_names())
    }
}
impl Transform for Preprocessor {
    fn transform(&self, table: &Table) -> Result<Table> {
        let dropped = self.dropping.transform(table)?;
        self.encoding.transform(&dropped)
    }

    fn feature_names_out(&self) -> &[String] {
        self.encoding.feature_names_out()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        error::Error,
        table::{Column, Value},
        transformer::{replacer::Replacement, TableExt},
    };

    use super::*;

    fn groups() -> ColumnGroups {
        ColumnGroups {
            categorical_columns: vec!["policy_state".to_string(), "policy_number".to_string()],
            numerical_columns: vec!["age".to_string(), "mostly_missing".to_string()],
            text_columns: vec!["notes".to_string()],
        }
    }

    fn examples() -> Table {
        Table::new([
            (
                "policy_state",
                Column::from(vec![Some("OH"), Some("IN"), Some("OH"), Some("IL"), None]),
            ),
            ("policy_number", Column::from(vec![101_i64, 102, 103, 104, 105])),
            (
                "age",
                Column::from(vec![Some(30_i64), Some(40), None, Some(50), Some(40)]),
            ),
            (
                "mostly_missing",
                Column::from(vec![Some(1.0_f64), None, None, None, Some(2.0)]),
            ),
            (
                "notes",
                Column::from(vec![Some("x"), None, Some("y"), Some("z"), Some("w")]),
            ),
            ("fraud_reported", Column::from(vec!["Y", "N", "N", "Y", "N"])),
        ])
        .unwrap()
    }

    fn estimator() -> PreprocessorEstimator {
        PreprocessorEstimator::new(
            groups(),
            FillStrategy::Mode,
            FillStrategy::Median,
            HandleUnknown::Ignore,
        )
        .unwrap()
        .with_nan_dropper(NanColumnsDropper::default())
        .with_cardinality_dropper(HighCardinalityDropper::default())
    }

    #[test]
    fn test_fit_transform() {
        let (preprocessor, transformed) = examples().fit_transform(&estimator()).unwrap();
        assert_eq!(preprocessor.retained_columns(), &["policy_state", "age", "notes"]);
        assert_eq!(preprocessor.groups().numerical_columns, ["age"]);
        assert_eq!(
            transformed.column_names(),
            [
                "age",
                "policy_state_IL",
                "policy_state_IN",
                "policy_state_OH",
                "notes_defined",
                "notes_undefined",
            ]
        );
        assert_eq!(preprocessor.feature_names_out(), transformed.column_names());
        assert_eq!(
            transformed.column("policy_state_OH").unwrap(),
            &Column::from(vec![1_i64, 0, 1, 0, 1])
        );
        assert_eq!(
            transformed.column("notes_undefined").unwrap(),
            &Column::from(vec![0_i64, 1, 0, 0, 0])
        );
        let age = transformed.column("age").unwrap().numbers("age").unwrap();
        let std = 40.0_f64.sqrt();
        for (x, expected) in age.zip([-10.0 / std, 0.0, 0.0, 10.0 / std, 0.0]) {
            assert_abs_diff_eq!(x.unwrap(), expected, epsilon = 1e-12);
        }
        assert_eq!(
            preprocessor.step_names().collect::<Vec<_>>(),
            [
                "column_selector",
                "nan_dropper",
                "cardinality_dropper",
                "column_imputer",
                "column_transformer",
            ]
        );
    }

    #[test]
    fn test_transform_matches_fit_transform() {
        let examples = examples();
        let (preprocessor, transformed) = examples.fit_transform(&estimator()).unwrap();
        assert_eq!(examples.transform_by(&preprocessor).unwrap(), transformed);
    }

    #[test]
    fn test_unseen_category_is_ignored() {
        let preprocessor = examples().fit(&estimator()).unwrap();
        let test = Table::new([
            ("policy_state", Column::from(vec!["TX"])),
            ("policy_number", Column::from(vec![999_i64])),
            ("age", Column::from(vec![40_i64])),
            ("mostly_missing", Column::Float(vec![None])),
            ("notes", Column::Text(vec![None])),
        ])
        .unwrap();
        let transformed = test.transform_by(&preprocessor).unwrap();
        assert_eq!(transformed.column_names(), preprocessor.feature_names_out());
        for name in ["policy_state_IL", "policy_state_IN", "policy_state_OH"] {
            assert_eq!(transformed.column(name).unwrap(), &Column::from(vec![0_i64]));
        }
        assert_eq!(
            transformed.column("notes_undefined").unwrap(),
            &Column::from(vec![1_i64])
        );
    }

    #[test]
    fn test_unseen_category_is_an_error() {
        let estimator = PreprocessorEstimator::new(
            groups(),
            FillStrategy::Mode,
            FillStrategy::Median,
            HandleUnknown::Error,
        )
        .unwrap()
        .with_nan_dropper(NanColumnsDropper::default())
        .with_cardinality_dropper(HighCardinalityDropper::default());
        let preprocessor = examples().fit(&estimator).unwrap();
        let mut test = examples();
        test = test
            .with_column("policy_state", Column::from(vec!["TX", "OH", "OH", "OH", "OH"]))
            .unwrap();
        let err = test.transform_by(&preprocessor).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownCategory {
                column: "policy_state".to_string(),
                category: "TX".to_string(),
            }
        );
    }

    #[test]
    fn test_replacer_runs_before_droppers() {
        let replacer = Replacer::new([(
            "policy_state",
            vec![Replacement::new("IN", None), Replacement::new("IL", None)],
        )]);
        let (preprocessor, _) = examples()
            .fit_transform(&estimator().with_replacer(replacer))
            .unwrap();
        // three missing cells out of five
        assert!(!preprocessor
            .retained_columns()
            .contains(&"policy_state".to_string()));
        assert_eq!(
            preprocessor.feature_names_out(),
            ["age", "notes_defined", "notes_undefined"]
        );
    }

    #[test]
    fn test_dates_are_coerced_before_droppers() {
        let examples = Table::new([
            (
                "incident_date",
                Column::from(vec![Some("1970-01-02"), Some("1970-01-04"), None]),
            ),
            ("age", Column::from(vec![30_i64, 40, 40])),
        ])
        .unwrap();
        let estimator = PreprocessorEstimator::new(
            ColumnGroups {
                numerical_columns: vec!["incident_date".to_string(), "age".to_string()],
                ..Default::default()
            },
            FillStrategy::Mode,
            FillStrategy::Median,
            HandleUnknown::Ignore,
        )
        .unwrap()
        .with_scaler(StandardScalingEstimator::new(false, false))
        .with_date_coercion(DateCoercion::new(["incident_date"]))
        .with_cardinality_dropper(HighCardinalityDropper::default());
        let (preprocessor, transformed) = examples.fit_transform(&estimator).unwrap();
        assert_eq!(
            preprocessor.step_names().collect::<Vec<_>>(),
            [
                "column_selector",
                "date_coercion",
                "cardinality_dropper",
                "column_imputer",
                "column_transformer",
            ]
        );
        assert_eq!(transformed.column_names(), ["incident_date", "age"]);
        assert_eq!(
            transformed.column("incident_date").unwrap(),
            &Column::Float(vec![Some(1.0), Some(3.0), Some(2.0)])
        );
    }

    #[test]
    fn test_without_droppers() {
        let estimator = PreprocessorEstimator::new(
            ColumnGroups {
                numerical_columns: vec!["age".to_string()],
                ..Default::default()
            },
            FillStrategy::Mode,
            FillStrategy::Mode,
            HandleUnknown::Ignore,
        )
        .unwrap()
        .with_scaler(StandardScalingEstimator::new(false, false));
        let (_, transformed) = examples().fit_transform(&estimator).unwrap();
        assert_eq!(transformed.column_names(), ["age"]);
        assert_eq!(
            transformed.column("age").unwrap().get(2),
            Some(Value::Float(40.0))
        );
    }

    #[test]
    fn test_missing_configured_column() {
        let table = examples().drop_columns(&["notes"]);
        let err = table.fit(&estimator()).unwrap_err();
        assert_eq!(err, Error::MissingColumn("notes".to_string()));
    }
}
