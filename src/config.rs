//! Declarative description of the preprocessing chain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    preprocessor::PreprocessorEstimator,
    transformer::{
        column_dropper::{HighCardinalityDropper, NanColumnsDropper, DEFAULT_CARDINALITY_EXCLUDE},
        date_coercion::{DateCoercion, DEFAULT_DATE_FORMAT},
        imputer::{ColumnGroups, FillStrategy},
        one_hot_encoder::HandleUnknown,
        replacer::{Replacement, Replacer},
        standard_scaler::StandardScalingEstimator,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    pub target_column: String,
    pub train_columns_by_type: ColumnGroups,
    pub imputer: ImputerConfig,
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub scaler: ScalerConfig,
    #[serde(default)]
    pub nan_dropper: Option<NanDropperConfig>,
    #[serde(default)]
    pub cardinality_dropper: Option<CardinalityDropperConfig>,
    /// Column name to the substitutions applied before anything else.
    #[serde(default)]
    pub replace: BTreeMap<String, Vec<Replacement>>,
    /// Text columns parsed into days since 1970-01-01 before the droppers.
    #[serde(default)]
    pub date_columns: Vec<String>,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}
impl PreprocessingConfig {
    /// Every configured feature column followed by the target.
    pub fn input_columns(&self) -> Vec<String> {
        self.train_columns_by_type
            .iter()
            .chain(std::iter::once(&self.target_column))
            .cloned()
            .collect()
    }

    pub fn estimator(&self) -> Result<PreprocessorEstimator> {
        let mut estimator = PreprocessorEstimator::new(
            self.train_columns_by_type.clone(),
            self.imputer.categorical_mode,
            self.imputer.numerical_mode,
            self.encoder.handle_unknown,
        )?
        .with_scaler(StandardScalingEstimator::new(
            self.scaler.with_mean,
            self.scaler.with_std,
        ));
        if !self.replace.is_empty() {
            let replacer = Replacer::new(
                self.replace
                    .iter()
                    .map(|(column, replacements)| (column.as_str(), replacements.clone())),
            );
            estimator = estimator.with_replacer(replacer);
        }
        if !self.date_columns.is_empty() {
            let date_coercion =
                DateCoercion::new(self.date_columns.iter().cloned()).with_format(self.date_format.as_str());
            estimator = estimator.with_date_coercion(date_coercion);
        }
        if let Some(config) = &self.nan_dropper {
            estimator = estimator.with_nan_dropper(NanColumnsDropper::nan(config.threshold)?);
        }
        if let Some(config) = &self.cardinality_dropper {
            let dropper = HighCardinalityDropper::cardinality(config.threshold)?
                .with_exclude(config.exclude.iter().cloned());
            estimator = estimator.with_cardinality_dropper(dropper);
        }
        Ok(estimator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImputerConfig {
    pub categorical_mode: FillStrategy,
    pub numerical_mode: FillStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub handle_unknown: HandleUnknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalerConfig {
    pub with_mean: bool,
    pub with_std: bool,
}
impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NanDropperConfig {
    #[serde(default = "default_nan_threshold")]
    pub threshold: f64,
}
fn default_nan_threshold() -> f64 {
    0.4
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardinalityDropperConfig {
    #[serde(default = "default_cardinality_threshold")]
    pub threshold: f64,
    #[serde(default = "default_cardinality_exclude")]
    pub exclude: Vec<String>,
}
fn default_cardinality_threshold() -> f64 {
    0.9
}
fn default_cardinality_exclude() -> Vec<String> {
    DEFAULT_CARDINALITY_EXCLUDE.map(String::from).to_vec()
}
fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
