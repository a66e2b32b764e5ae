use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    table::{Column, Table, Value},
};

use super::{check_schema, first_duplicate, Estimate, Transform};

/// What to do with a category that was not seen at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Emit an all-zero block.
    Ignore,
    /// Fail with [`Error::UnknownCategory`].
    Error,
}

#[derive(Debug, Clone, Copy)]
pub struct OneHotEncodingEstimator {
    handle_unknown: HandleUnknown,
}
impl OneHotEncodingEstimator {
    pub fn new(handle_unknown: HandleUnknown) -> Self {
        Self { handle_unknown }
    }
}
impl Estimate for OneHotEncodingEstimator {
    type Output = OneHotEncoder;

    fn fit(&self, examples: &Table) -> Result<Self::Output> {
        let categories = examples
            .iter()
            .map(|(_, column)| categories(column))
            .collect::<Vec<_>>();
        let feature_names = examples
            .column_names()
            .iter()
            .zip(&categories)
            .flat_map(|(name, categories)| {
                categories
                    .iter()
                    .map(move |category| format!("{name}_{category}"))
            })
            .collect::<Vec<_>>();
        if let Some(duplicate) = first_duplicate(&feature_names) {
            return Err(Error::DuplicateColumn(duplicate.to_string()));
        }
        debug!(n_features = feature_names.len(), "fitted one-hot encoder");
        Ok(OneHotEncoder {
            column_names: examples.column_names().to_vec(),
            categories,
            feature_names,
            handle_unknown: self.handle_unknown,
        })
    }
}

/// Distinct present values, sorted.
fn categories(column: &Column) -> Vec<Value> {
    match column {
        Column::Int(x) => {
            let mut x = x.iter().flatten().copied().collect::<Vec<_>>();
            x.sort_unstable();
            x.dedup();
            x.into_iter().map(Value::Int).collect()
        }
        Column::Float(x) => {
            let mut x = x
                .iter()
                .flatten()
                .copied()
                .filter(|x| !x.is_nan())
                .map(|x| x + 0.0)
                .collect::<Vec<_>>();
            x.sort_unstable_by(f64::total_cmp);
            x.dedup();
            x.into_iter().map(Value::Float).collect()
        }
        Column::Text(x) => {
            let mut x = x.iter().flatten().cloned().collect::<Vec<_>>();
            x.sort_unstable();
            x.dedup();
            x.into_iter().map(Value::Text).collect()
        }
    }
}

/// One-hot encoding with deterministic `<column>_<category>` output names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct OneHotEncoder {
    #[getset(get = "pub")]
    column_names: Vec<String>,
    /// Fit-time categories of every column, in output order.
    #[getset(get = "pub")]
    categories: Vec<Vec<Value>>,
    feature_names: Vec<String>,
    #[getset(get_copy = "pub")]
    handle_unknown: HandleUnknown,
}
impl OneHotEncoder {
    fn encode_block(&self, name: &str, column: &Column, categories: &[Value]) -> Result<Vec<Column>> {
        let mut block = vec![vec![Some(0_i64); column.len()]; categories.len()];
        for (row, cell) in column.cells().enumerate() {
            let hot = cell
                .as_ref()
                .and_then(|x| categories.iter().position(|category| category.matches(x)));
            match (hot, self.handle_unknown) {
                (Some(i), _) => block[i][row] = Some(1),
                (None, HandleUnknown::Ignore) => (),
                (None, HandleUnknown::Error) => {
                    return Err(Error::UnknownCategory {
                        column: name.to_string(),
                        category: cell.map_or_else(|| "<missing>".to_string(), |x| x.to_string()),
                    })
                }
            }
        }
        Ok(block.into_iter().map(Column::Int).collect())
    }
}
impl Transform for OneHotEncoder {
    fn transform(&self, table: &Table) -> Result<Table> {
        check_schema(&self.column_names, table)?;
        let mut columns = Vec::with_capacity(self.feature_names.len());
        for ((name, column), categories) in table.iter().zip(&self.categories) {
            columns.extend(self.encode_block(name, column, categories)?);
        }
        Table::new(self.feature_names.iter().cloned().zip(columns))
    }

    fn feature_names_out(&self) -> &[String] {
        &self.feature_names
    }
}
