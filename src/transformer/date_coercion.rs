use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::{Error, Result},
    table::{Column, ColumnKind, Table, Value},
};

use super::{Estimate, Transform};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// `num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Parses text date columns into days since 1970-01-01.
///
/// Columns that are already integers are taken as day numbers. Fitting learns
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCoercion {
    date_columns: Vec<String>,
    format: String,
    #[serde(skip)]
    column_names: Vec<String>,
}
impl DateCoercion {
    pub fn new<I, N>(date_columns: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            date_columns: date_columns.into_iter().map(Into::into).collect(),
            format: DEFAULT_DATE_FORMAT.to_string(),
            column_names: vec![],
        }
    }

    /// `format` follows [`chrono::format::strftime`].
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn date_columns(&self) -> &[String] {
        &self.date_columns
    }

    fn coerce(&self, name: &str, cell: Option<Value>) -> Result<Option<i64>> {
        let incompatible = |value| Error::IncompatibleValue {
            column: name.to_string(),
            value,
            kind: ColumnKind::Int,
        };
        match cell {
            None => Ok(None),
            Some(Value::Int(days)) => Ok(Some(days)),
            Some(Value::Text(text)) => match NaiveDate::parse_from_str(text.trim(), &self.format) {
                Ok(date) => Ok(Some(i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE)),
                Err(_) => Err(incompatible(Value::Text(text))),
            },
            Some(value) => Err(incompatible(value)),
        }
    }
}
impl Estimate for DateCoercion {
    type Output = Self;

    fn fit(&self, examples: &Table) -> Result<Self::Output> {
        for name in &self.date_columns {
            examples.try_column(name)?;
        }
        Ok(Self {
            column_names: examples.column_names().to_vec(),
            ..self.clone()
        })
    }
}
impl Transform for DateCoercion {
    fn transform(&self, table: &Table) -> Result<Table> {
        let mut coerced = table.clone();
        for name in &self.date_columns {
            let days = table
                .try_column(name)?
                .cells()
                .map(|cell| self.coerce(name, cell))
                .collect::<Result<Vec<_>>>()?;
            trace!(column = name.as_str(), "coerced dates");
            coerced = coerced.with_column(name.as_str(), Column::Int(days))?;
        }
        Ok(coerced)
    }

    /// The fit-time columns; empty before fitting.
    fn feature_names_out(&self) -> &[String] {
        &self.column_names
    }
}
