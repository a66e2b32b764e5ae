pub mod config;
pub mod error;
pub mod pipeline;
pub mod preprocessor;
pub mod statistics;
pub mod table;
pub mod transformer;

pub use error::{Error, Result};
pub use table::{Column, ColumnKind, Table, Value};
