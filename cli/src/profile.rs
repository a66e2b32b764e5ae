use std::{fmt, path::PathBuf};

use clap::Args;
use frame_prep::{
    transformer::{
        column_dropper::{HighCardinalityDropper, NanColumnsDropper},
        TableExt,
    },
    Table,
};

use crate::frame::{read_csv, to_table};

#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    #[clap(long)]
    pub data: PathBuf,
    #[clap(long, default_value_t = 0.4)]
    pub nan_threshold: f64,
    #[clap(long, default_value_t = 0.9)]
    pub cardinality_threshold: f64,
}
impl ProfileArgs {
    pub fn run(self) -> anyhow::Result<()> {
        let table = to_table(&read_csv(&self.data)?)?;
        println!("column\tmissing\tdistinct\tverdict");
        for row in profile(&table, self.nan_threshold, self.cardinality_threshold)? {
            println!(
                "{}\t{:.3}\t{:.3}\t{}",
                row.column, row.missing, row.distinct, row.verdict
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    DropMissing,
    DropCardinality,
}
impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Keep => "keep",
            Verdict::DropMissing => "drop (missing)",
            Verdict::DropCardinality => "drop (cardinality)",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub column: String,
    pub missing: f64,
    pub distinct: f64,
    pub verdict: Verdict,
}

/// The statistics both droppers decide on, one row per column.
///
/// A column that both droppers remove is reported as missing.
pub fn profile(
    table: &Table,
    nan_threshold: f64,
    cardinality_threshold: f64,
) -> anyhow::Result<Vec<ColumnProfile>> {
    let nan = table.fit(&NanColumnsDropper::nan(nan_threshold)?)?;
    let cardinality = table.fit(&HighCardinalityDropper::cardinality(cardinality_threshold)?)?;
    let rows = nan
        .statistics()
        .iter()
        .zip(cardinality.statistics())
        .map(|((column, missing), (_, distinct))| {
            let verdict = if nan.dropped_columns().contains(column) {
                Verdict::DropMissing
            } else if cardinality.dropped_columns().contains(column) {
                Verdict::DropCardinality
            } else {
                Verdict::Keep
            };
            ColumnProfile {
                column: column.clone(),
                missing: *missing,
                distinct: *distinct,
                verdict,
            }
        })
        .collect();
    Ok(rows)
}
