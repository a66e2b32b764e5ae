//! Two-phase column-aware adapters.
//!
//! An estimator holds configuration only. Fitting it on a [`Table`] yields a
//! separate fitted transformer that owns everything learned from that table,
//! so a transformer can never be applied before it was fitted.

use std::collections::HashSet;

use crate::{
    error::{Error, Result},
    table::Table,
};

pub mod column_dropper;
pub mod column_selector;
pub mod column_transformer;
pub mod date_coercion;
pub mod imputer;
pub mod one_hot_encoder;
pub mod replacer;
pub mod standard_scaler;

pub trait Estimate {
    type Output: Transform;

    /// Fits a transformer from the examples,
    /// so that you can use this transformer to transform another table.
    fn fit(&self, examples: &Table) -> Result<Self::Output>;

    /// Fits a transformer from the examples and then transforms them.
    fn fit_transform(&self, examples: &Table) -> Result<(Self::Output, Table)> {
        let transformer = self.fit(examples)?;
        let transformed = transformer.transform(examples)?;
        Ok((transformer, transformed))
    }
}

pub trait Transform: core::fmt::Debug {
    fn transform(&self, table: &Table) -> Result<Table>;

    /// Names of the columns [`Transform::transform`] produces.
    fn feature_names_out(&self) -> &[String];
}
impl<T: Transform + ?Sized> Transform for Box<T> {
    fn transform(&self, table: &Table) -> Result<Table> {
        (**self).transform(table)
    }

    fn feature_names_out(&self) -> &[String] {
        (**self).feature_names_out()
    }
}

/// Object-safe form of [`Estimate`] so that steps of different types can share
/// one collection.
pub trait DynEstimate: core::fmt::Debug {
    fn fit_dyn(&self, examples: &Table) -> Result<Box<dyn Transform>>;
}
impl<E> DynEstimate for E
where
    E: Estimate + core::fmt::Debug,
    E::Output: 'static,
{
    fn fit_dyn(&self, examples: &Table) -> Result<Box<dyn Transform>> {
        let transformer = self.fit(examples)?;
        Ok(Box::new(transformer))
    }
}

pub trait TableExt {
    fn fit<E: Estimate>(&self, estimator: &E) -> Result<E::Output>;

    fn transform_by<T: Transform>(&self, transformer: &T) -> Result<Table>;

    fn fit_transform<E: Estimate>(&self, estimator: &E) -> Result<(E::Output, Table)>;
}
impl TableExt for Table {
    fn fit<E: Estimate>(&self, estimator: &E) -> Result<E::Output> {
        estimator.fit(self)
    }

    fn transform_by<T: Transform>(&self, transformer: &T) -> Result<Table> {
        transformer.transform(self)
    }

    fn fit_transform<E: Estimate>(&self, estimator: &E) -> Result<(E::Output, Table)> {
        estimator.fit_transform(self)
    }
}

/// Rejects a table whose columns differ from the fit-time columns in names or
/// order.
pub fn check_schema(expected: &[String], table: &Table) -> Result<()> {
    if table.column_names() == expected {
        return Ok(());
    }
    Err(Error::SchemaMismatch {
        expected: expected.to_vec(),
        actual: table.column_names().to_vec(),
    })
}

/// The first name that occurs twice.
pub(crate) fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(String::as_str)
        .find(|x| !seen.insert(*x))
}
