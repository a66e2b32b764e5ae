use tracing::debug;

use crate::{
    error::{Error, Result},
    table::Table,
};

use super::{first_duplicate, DynEstimate, Estimate, Transform};

/// Fits each estimator on its own column selection and places the outputs
/// side by side.
///
/// Columns that no estimator selects are dropped.
#[derive(Debug, Default)]
pub struct ColumnTransformer {
    transformers: Vec<(String, Box<dyn DynEstimate>, Vec<String>)>,
}
impl ColumnTransformer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_transformer<E, I, N>(mut self, name: impl Into<String>, estimator: E, columns: I) -> Self
    where
        E: DynEstimate + 'static,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let columns = columns.into_iter().map(Into::into).collect();
        self.transformers
            .push((name.into(), Box::new(estimator), columns));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}
impl Estimate for ColumnTransformer {
    type Output = FittedColumnTransformer;

    fn fit(&self, examples: &Table) -> Result<Self::Output> {
        let mut steps = vec![];
        let mut feature_names = vec![];
        for (name, estimator, columns) in &self.transformers {
            let selected = examples.select(columns)?;
            let fitted = estimator.fit_dyn(&selected)?;
            debug!(step = name.as_str(), n_features = fitted.feature_names_out().len(), "fitted column step");
            feature_names.extend(fitted.feature_names_out().iter().cloned());
            steps.push((name.clone(), fitted, columns.clone()));
        }
        if let Some(duplicate) = first_duplicate(&feature_names) {
            return Err(Error::DuplicateColumn(duplicate.to_string()));
        }
        Ok(FittedColumnTransformer {
            steps,
            feature_names,
        })
    }
}

#[derive(Debug)]
pub struct FittedColumnTransformer {
    steps: Vec<(String, Box<dyn Transform>, Vec<String>)>,
    feature_names: Vec<String>,
}
impl FittedColumnTransformer {
    /// # Option
    ///
    /// Return [`None`] if no step is called `name`
    pub fn step(&self, name: &str) -> Option<&dyn Transform> {
        self.steps
            .iter()
            .find(|(x, _, _)| x == name)
            .map(|(_, transformer, _)| transformer.as_ref())
    }
}
impl Transform for FittedColumnTransformer {
    fn transform(&self, table: &Table) -> Result<Table> {
        let outputs = self
            .steps
            .iter()
            .map(|(_, transformer, columns)| transformer.transform(&table.select(columns)?))
            .collect::<Result<Vec<_>>>()?;
        Table::hconcat(outputs)
    }

    fn feature_names_out(&self) -> &[String] {
        &self.feature_names
    }
}
