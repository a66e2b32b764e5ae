use thiserror::Error;

use crate::table::{ColumnKind, Value};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Columns don't have same order/elements; valid order: {expected:?}, got: {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("Column `{0}` not found")]
    MissingColumn(String),
    #[error("Column `{0}` appears more than once")]
    DuplicateColumn(String),
    #[error("Column `{column}` has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("Unknown category `{category}` in column `{column}`")]
    UnknownCategory { column: String, category: String },
    #[error("Column `{0}` is not numeric")]
    NonNumericColumn(String),
    #[error("Value `{value}` does not fit column `{column}` of kind {kind:?}")]
    IncompatibleValue {
        column: String,
        value: Value,
        kind: ColumnKind,
    },
    #[error("Column `{0}` has no value to fit on")]
    EmptyColumn(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
