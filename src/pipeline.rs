//! Sequential chaining of estimators.

use tracing::info;

use crate::{
    error::Result,
    table::Table,
    transformer::{DynEstimate, Estimate, Transform},
};

/// Named steps, each fitted on the output of the previous one.
///
/// An empty pipeline passes tables through unchanged.
#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<(String, Box<dyn DynEstimate>)>,
}
impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_step<E>(mut self, name: impl Into<String>, estimator: E) -> Self
    where
        E: DynEstimate + 'static,
    {
        self.steps.push((name.into(), Box::new(estimator)));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
impl Estimate for Pipeline {
    type Output = FittedPipeline;

    fn fit(&self, examples: &Table) -> Result<Self::Output> {
        self.fit_transform(examples).map(|(fitted, _)| fitted)
    }

    fn fit_transform(&self, examples: &Table) -> Result<(Self::Output, Table)> {
        let mut steps = Vec::with_capacity(self.steps.len());
        let mut current = examples.clone();
        for (name, estimator) in &self.steps {
            info!(step = name.as_str(), "fitting step");
            let fitted = estimator.fit_dyn(&current)?;
            current = fitted.transform(&current)?;
            steps.push((name.clone(), fitted));
        }
        let feature_names = match steps.last() {
            Some((_, last)) => last.feature_names_out().to_vec(),
            None => examples.column_names().to_vec(),
        };
        let fitted = FittedPipeline {
            steps,
            feature_names,
        };
        Ok((fitted, current))
    }
}

#[derive(Debug)]
pub struct FittedPipeline {
    steps: Vec<(String, Box<dyn Transform>)>,
    feature_names: Vec<String>,
}
impl FittedPipeline {
    /// # Option
    ///
    /// Return [`None`] if no step is called `name`
    pub fn step(&self, name: &str) -> Option<&dyn Transform> {
        self.steps
            .iter()
            .find(|(x, _)| x == name)
            .map(|(_, transformer)| transformer.as_ref())
    }

    pub fn step_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().map(|(name, _)| name.as_str())
    }
}
impl Transform for FittedPipeline {
    fn transform(&self, table: &Table) -> Result<Table> {
        let mut current = table.clone();
        for (_, transformer) in &self.steps {
            current = transformer.transform(&current)?;
        }
        Ok(current)
    }

    fn feature_names_out(&self) -> &[String] {
        &self.feature_names
    }
}
