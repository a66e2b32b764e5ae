use serde::{Deserialize, Serialize};

use crate::{error::Result, table::Table};

use super::{Estimate, Transform};

/// Keeps the listed columns, in the listed order.
///
/// Fitting learns nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelector {
    selected_columns: Vec<String>,
}
impl ColumnSelector {
    pub fn new<I, N>(selected_columns: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            selected_columns: selected_columns.into_iter().map(Into::into).collect(),
        }
    }
}
impl Estimate for ColumnSelector {
    type Output = Self;

    fn fit(&self, _examples: &Table) -> Result<Self::Output> {
        Ok(self.clone())
    }
}
impl Transform for ColumnSelector {
    fn transform(&self, table: &Table) -> Result<Table> {
        table.select(&self.selected_columns)
    }

    fn feature_names_out(&self) -> &[String] {
        &self.selected_columns
    }
}
