//! Named, typed columns sharing one row count.

use core::{fmt, slice};
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A present cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}
impl Value {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(x) => Some(*x as f64),
            Value::Float(x) => Some(*x),
            Value::Text(_) => None,
        }
    }

    /// Like `==`, but numbers compare by value across `Int` and `Float`.
    #[must_use]
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(x) => write!(f, "{x}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(x) => f.write_str(x),
        }
    }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}
impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Int,
    Float,
    Text,
}

/// A typed vector of optional cells.
///
/// `None` marks a missing cell. A `NaN` float is read as missing as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}
impl Column {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Int(x) => x.len(),
            Column::Float(x) => x.len(),
            Column::Text(x) => x.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Int(_) => ColumnKind::Int,
            Column::Float(_) => ColumnKind::Float,
            Column::Text(_) => ColumnKind::Text,
        }
    }

    /// # Option
    ///
    /// Return [`None`] if the cell is missing or `row` is out of bounds
    #[must_use]
    pub fn get(&self, row: usize) -> Option<Value> {
        self.cells().nth(row).flatten()
    }

    pub fn cells(&self) -> Cells<'_> {
        match self {
            Column::Int(x) => Cells::Int(x.iter()),
            Column::Float(x) => Cells::Float(x.iter()),
            Column::Text(x) => Cells::Text(x.iter()),
        }
    }

    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.cells().filter(Option::is_none).count()
    }

    /// Number of distinct present values.
    #[must_use]
    pub fn distinct_count(&self) -> usize {
        match self {
            Column::Int(x) => x.iter().flatten().collect::<HashSet<_>>().len(),
            Column::Float(x) => x
                .iter()
                .flatten()
                .filter(|x| !x.is_nan())
                // `-0.0` and `0.0` are the same value
                .map(|x| (x + 0.0).to_bits())
                .collect::<HashSet<_>>()
                .len(),
            Column::Text(x) => x
                .iter()
                .flatten()
                .map(String::as_str)
                .collect::<HashSet<_>>()
                .len(),
        }
    }

    /// Numeric view of the column.
    ///
    /// `name` only labels the error.
    pub fn numbers(&self, name: &str) -> Result<Numbers<'_>> {
        match self {
            Column::Int(x) => Ok(Numbers::Int(x.iter())),
            Column::Float(x) => Ok(Numbers::Float(x.iter())),
            Column::Text(_) => Err(Error::NonNumericColumn(name.to_string())),
        }
    }

    /// Builds a column of `kind` from cells.
    ///
    /// An `Int` column receiving a `Float` is promoted to `Float`.
    /// `name` only labels the error.
    pub fn from_cells(
        kind: ColumnKind,
        cells: impl IntoIterator<Item = Option<Value>>,
        name: &str,
    ) -> Result<Self> {
        let cells = cells.into_iter().collect::<Vec<_>>();
        let kind = match kind {
            ColumnKind::Int if cells.iter().flatten().any(|x| matches!(x, Value::Float(_))) => {
                ColumnKind::Float
            }
            kind => kind,
        };
        let incompatible = |value: Value| Error::IncompatibleValue {
            column: name.to_string(),
            value,
            kind,
        };
        let column = match kind {
            ColumnKind::Int => Column::Int(
                cells
                    .into_iter()
                    .map(|x| match x {
                        None => Ok(None),
                        Some(Value::Int(x)) => Ok(Some(x)),
                        Some(x) => Err(incompatible(x)),
                    })
                    .collect::<Result<_>>()?,
            ),
            ColumnKind::Float => Column::Float(
                cells
                    .into_iter()
                    .map(|x| match x {
                        None => Ok(None),
                        Some(Value::Int(x)) => Ok(Some(x as f64)),
                        Some(Value::Float(x)) => Ok(Some(x).filter(|x| !x.is_nan())),
                        Some(x) => Err(incompatible(x)),
                    })
                    .collect::<Result<_>>()?,
            ),
            ColumnKind::Text => Column::Text(
                cells
                    .into_iter()
                    .map(|x| match x {
                        None => Ok(None),
                        Some(Value::Text(x)) => Ok(Some(x)),
                        Some(x) => Err(incompatible(x)),
                    })
                    .collect::<Result<_>>()?,
            ),
        };
        Ok(column)
    }
}
impl From<Vec<Option<i64>>> for Column {
    fn from(value: Vec<Option<i64>>) -> Self {
        Column::Int(value)
    }
}
impl From<Vec<i64>> for Column {
    fn from(value: Vec<i64>) -> Self {
        Column::Int(value.into_iter().map(Some).collect())
    }
}
impl From<Vec<Option<f64>>> for Column {
    fn from(value: Vec<Option<f64>>) -> Self {
        Column::Float(
            value
                .into_iter()
                .map(|x| x.filter(|x| !x.is_nan()))
                .collect(),
        )
    }
}
impl From<Vec<f64>> for Column {
    fn from(value: Vec<f64>) -> Self {
        value.into_iter().map(Some).collect::<Vec<_>>().into()
    }
}
impl From<Vec<Option<&str>>> for Column {
    fn from(value: Vec<Option<&str>>) -> Self {
        Column::Text(value.into_iter().map(|x| x.map(str::to_string)).collect())
    }
}
impl From<Vec<&str>> for Column {
    fn from(value: Vec<&str>) -> Self {
        Column::Text(value.into_iter().map(|x| Some(x.to_string())).collect())
    }
}
impl From<Vec<Option<String>>> for Column {
    fn from(value: Vec<Option<String>>) -> Self {
        Column::Text(value)
    }
}

#[derive(Debug, Clone)]
pub enum Cells<'a> {
    Int(slice::Iter<'a, Option<i64>>),
    Float(slice::Iter<'a, Option<f64>>),
    Text(slice::Iter<'a, Option<String>>),
}
impl Iterator for Cells<'_> {
    type Item = Option<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Cells::Int(x) => x.next().map(|x| x.map(Value::Int)),
            Cells::Float(x) => x
                .next()
                .map(|x| x.filter(|x| !x.is_nan()).map(Value::Float)),
            Cells::Text(x) => x.next().map(|x| x.clone().map(Value::Text)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Cells::Int(x) => x.size_hint(),
            Cells::Float(x) => x.size_hint(),
            Cells::Text(x) => x.size_hint(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Numbers<'a> {
    Int(slice::Iter<'a, Option<i64>>),
    Float(slice::Iter<'a, Option<f64>>),
}
impl Iterator for Numbers<'_> {
    type Item = Option<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Numbers::Int(x) => x.next().map(|x| x.map(|x| x as f64)),
            Numbers::Float(x) => x.next().map(|x| x.filter(|x| !x.is_nan())),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Numbers::Int(x) => x.size_hint(),
            Numbers::Float(x) => x.size_hint(),
        }
    }
}

/// An ordered collection of named columns with a shared row count.
///
/// Column names are unique. The column order is part of the identity of a
/// table: fitted transformers compare it against the one they were fitted on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}
impl Table {
    pub fn new<N: Into<String>>(columns: impl IntoIterator<Item = (N, Column)>) -> Result<Self> {
        let mut table = Self::empty();
        for (name, column) in columns {
            let name = name.into();
            if table.names.contains(&name) {
                return Err(Error::DuplicateColumn(name));
            }
            if let Some(first) = table.columns.first() {
                if first.len() != column.len() {
                    return Err(Error::LengthMismatch {
                        column: name,
                        expected: first.len(),
                        actual: column.len(),
                    });
                }
            }
            table.names.push(name);
            table.columns.push(column);
        }
        Ok(table)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A table without columns has no rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        let i = self.names.iter().position(|x| x == name)?;
        Some(&self.columns[i])
    }

    pub fn try_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// Projects the table onto `names`, in the order of `names`.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let columns = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.try_column(name).map(|x| (name, x.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(columns)
    }

    /// Removes the named columns that exist.
    #[must_use]
    pub fn drop_columns<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let (names, columns) = self
            .iter()
            .filter(|(name, _)| !names.iter().any(|x| x.as_ref() == *name))
            .map(|(name, column)| (name.to_string(), column.clone()))
            .unzip();
        Self { names, columns }
    }

    /// Replaces the column in place if the name exists; appends it otherwise.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        let expected = self.n_rows();
        if !self.columns.is_empty() && column.len() != expected {
            return Err(Error::LengthMismatch {
                column: name,
                expected,
                actual: column.len(),
            });
        }
        match self.names.iter().position(|x| *x == name) {
            Some(i) => self.columns[i] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
        Ok(self)
    }

    /// Places the columns of `tables` side by side.
    pub fn hconcat(tables: impl IntoIterator<Item = Table>) -> Result<Self> {
        Self::new(tables.into_iter().flat_map(Table::into_columns))
    }

    pub fn into_columns(self) -> impl Iterator<Item = (String, Column)> {
        self.names.into_iter().zip(self.columns)
    }
}
