//! Conversion between polars frames and [`Table`]s.

use std::{fs::File, path::Path};

use anyhow::Context;
use frame_prep::{Column, ColumnKind, Table};
use polars::prelude::*;

pub fn read_csv(path: &Path) -> anyhow::Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("failed to open `{}`", path.display()))?
        .finish()
        .with_context(|| format!("failed to parse `{}`", path.display()))?;
    Ok(df)
}

pub fn write_csv(path: &Path, df: &mut DataFrame) -> anyhow::Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("failed to create `{}`", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    Ok(())
}

/// Integer columns stay integers, float columns stay floats with `NaN` read
/// as missing, and everything else is read as text.
pub fn to_table(df: &DataFrame) -> anyhow::Result<Table> {
    let columns = df
        .get_columns()
        .iter()
        .map(|series| -> anyhow::Result<(String, Column)> {
            let kind = if series.dtype().is_integer() {
                ColumnKind::Int
            } else if series.dtype().is_float() {
                ColumnKind::Float
            } else {
                ColumnKind::Text
            };
            Ok((series.name().to_string(), to_column(series, kind)?))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Table::new(columns)?)
}

/// Like [`to_table`], but columns that `schema` also has take its kinds.
///
/// A column whose type inference differs between files, such as one that is
/// empty in only one of them, still converts to the same kind.
pub fn to_table_like(df: &DataFrame, schema: &Table) -> anyhow::Result<Table> {
    let inferred = to_table(df)?;
    let columns = df
        .get_columns()
        .iter()
        .zip(inferred.iter())
        .map(|(series, (name, inferred))| -> anyhow::Result<(String, Column)> {
            let column = match schema.column(name) {
                Some(expected) if expected.kind() != inferred.kind() => to_column(series, expected.kind())
                    .with_context(|| {
                        format!("column `{name}` cannot be read as {:?}", expected.kind())
                    })?,
                _ => inferred.clone(),
            };
            Ok((name.to_string(), column))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Table::new(columns)?)
}

fn to_column(series: &Series, kind: ColumnKind) -> anyhow::Result<Column> {
    let column = match kind {
        ColumnKind::Int => {
            let series = series.strict_cast(&DataType::Int64)?;
            Column::Int(series.i64()?.into_iter().collect())
        }
        ColumnKind::Float => {
            let series = series.strict_cast(&DataType::Float64)?;
            Column::from(series.f64()?.into_iter().collect::<Vec<Option<f64>>>())
        }
        ColumnKind::Text => {
            let series = series.cast(&DataType::String)?;
            Column::Text(
                series
                    .str()?
                    .into_iter()
                    .map(|x| x.map(str::to_string))
                    .collect(),
            )
        }
    };
    Ok(column)
}

pub fn to_data_frame(table: &Table) -> anyhow::Result<DataFrame> {
    let series = table
        .iter()
        .map(|(name, column)| match column {
            Column::Int(x) => Series::new(name.into(), x.as_slice()),
            Column::Float(x) => Series::new(name.into(), x.as_slice()),
            Column::Text(x) => Series::new(name.into(), x.as_slice()),
        })
        .collect::<Vec<_>>();
    Ok(DataFrame::new(series)?)
}
