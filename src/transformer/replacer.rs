use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::Result,
    table::{Column, Table, Value},
};

use super::{Estimate, Transform};

/// One substitution; a missing `to` blanks the cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: Value,
    #[serde(default)]
    pub to: Option<Value>,
}
impl Replacement {
    pub fn new(from: impl Into<Value>, to: Option<Value>) -> Self {
        Self {
            from: from.into(),
            to,
        }
    }
}

/// Substitutes values in the mapped columns and leaves everything else
/// untouched.
///
/// Fitting learns nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Replacer {
    mapper: Vec<(String, Vec<Replacement>)>,
    #[serde(skip)]
    column_names: Vec<String>,
}
impl Replacer {
    pub fn new<I, N>(mapper: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<Replacement>)>,
        N: Into<String>,
    {
        Self {
            mapper: mapper
                .into_iter()
                .map(|(name, replacements)| (name.into(), replacements))
                .collect(),
            column_names: vec![],
        }
    }

    fn replace(replacements: &[Replacement], cell: Option<Value>) -> Option<Value> {
        let value = cell?;
        match replacements.iter().find(|x| x.from.matches(&value)) {
            Some(replacement) => replacement.to.clone(),
            None => Some(value),
        }
    }
}
impl Estimate for Replacer {
    type Output = Self;

    fn fit(&self, examples: &Table) -> Result<Self::Output> {
        Ok(Self {
            mapper: self.mapper.clone(),
            column_names: examples.column_names().to_vec(),
        })
    }
}
impl Transform for Replacer {
    fn transform(&self, table: &Table) -> Result<Table> {
        let mut replaced = table.clone();
        for (name, replacements) in &self.mapper {
            let column = table.try_column(name)?;
            let cells = column
                .cells()
                .map(|x| Self::replace(replacements, x));
            let column = Column::from_cells(column.kind(), cells, name)?;
            trace!(column = name.as_str(), "replaced values");
            replaced = replaced.with_column(name.as_str(), column)?;
        }
        Ok(replaced)
    }

    /// The fit-time columns; empty before fitting.
    fn feature_names_out(&self) -> &[String] {
        &self.column_names
    }
}
