use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use frame_prep::{
    config::PreprocessingConfig,
    transformer::{TableExt, Transform},
    Column, Table,
};
use tracing::info;

use crate::frame::{read_csv, to_data_frame, to_table, to_table_like, write_csv};

const SPLIT: &str = "{split}";

#[derive(Debug, Clone, Args)]
pub struct PreprocessArgs {
    /// YAML file describing the column groups and the adapters
    #[clap(long)]
    pub config: PathBuf,
    /// CSV path where `{split}` stands for `train` or `val`
    #[clap(long)]
    pub data: String,
    #[clap(long, default_value = ".")]
    pub output_dir: PathBuf,
}
impl PreprocessArgs {
    pub fn run(self) -> anyhow::Result<()> {
        let config = std::fs::read_to_string(&self.config)
            .with_context(|| format!("failed to read `{}`", self.config.display()))?;
        let config: PreprocessingConfig = serde_yaml::from_str(&config)
            .with_context(|| format!("invalid config `{}`", self.config.display()))?;
        let estimator = config.estimator()?;
        if !self.data.contains(SPLIT) {
            bail!("data path `{}` has no `{SPLIT}` placeholder", self.data);
        }

        info!("reading input data");
        let input_columns = config.input_columns();
        let train = read_split(&self.data, "train", &input_columns, None)?;
        let val = read_split(&self.data, "val", &input_columns, Some(&train))?;
        let (x_train, y_train) = split_target(&train, &config.target_column)?;
        let (x_val, y_val) = split_target(&val, &config.target_column)?;

        info!("fitting preprocessor");
        let (preprocessor, train) = x_train.fit_transform(&estimator)?;
        info!(
            retained = ?preprocessor.retained_columns(),
            n_features = preprocessor.feature_names_out().len(),
            "fitted preprocessor"
        );
        let val = x_val
            .transform_by(&preprocessor)
            .context("failed to transform the validation split")?;

        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("failed to create `{}`", self.output_dir.display()))?;
        for (split, features, target) in [("train", train, y_train), ("val", val, y_val)] {
            let table = features.with_column(config.target_column.as_str(), target)?;
            let path = self.output_dir.join(format!("{split}.csv"));
            write_csv(&path, &mut to_data_frame(&table)?)?;
            info!(path = %path.display(), n_rows = table.n_rows(), "wrote split");
        }
        Ok(())
    }
}

/// Column kinds follow `schema` where given.
fn read_split(
    data: &str,
    split: &str,
    input_columns: &[String],
    schema: Option<&Table>,
) -> anyhow::Result<Table> {
    let path = data.replace(SPLIT, split);
    let df = read_csv(Path::new(&path))?;
    let table = match schema {
        Some(schema) => to_table_like(&df, schema),
        None => to_table(&df),
    }
    .with_context(|| format!("failed to convert `{path}`"))?;
    table
        .select(input_columns)
        .with_context(|| format!("`{path}` lacks a configured column"))
}

fn split_target(table: &Table, target: &str) -> anyhow::Result<(Table, Column)> {
    let y = table.try_column(target)?.clone();
    let x = table.drop_columns(&[target]);
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write};

    use super::*;

    const CONFIG: &str = "
target_column: fraud_reported
train_columns_by_type:
  categorical_columns: [collision_type]
  numerical_columns: [total_claim_amount]
imputer:
  categorical_mode: most_frequent
  numerical_mode: median
encoder:
  handle_unknown: ignore
";

    fn write_lines(path: &Path, lines: &[&str]) {
        let mut file = File::create(path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
    }

    #[test]
    fn test_preprocess_splits() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yml");
        std::fs::write(&config, CONFIG).unwrap();
        write_lines(
            &dir.path().join("claims_train.csv"),
            &[
                "collision_type,total_claim_amount,unused,fraud_reported",
                "Rear,100,x,Y",
                ",300,x,N",
                "Rear,,x,N",
                "Side,200,x,N",
            ],
        );
        write_lines(
            &dir.path().join("claims_val.csv"),
            &[
                "collision_type,total_claim_amount,unused,fraud_reported",
                "Front,200,x,Y",
            ],
        );
        let output_dir = dir.path().join("out");
        let args = PreprocessArgs {
            config,
            data: dir.path().join("claims_{split}.csv").display().to_string(),
            output_dir: output_dir.clone(),
        };
        args.run().unwrap();

        let train = to_table(&read_csv(&output_dir.join("train.csv")).unwrap()).unwrap();
        assert_eq!(
            train.column_names(),
            [
                "total_claim_amount",
                "collision_type_Rear",
                "collision_type_Side",
                "fraud_reported",
            ]
        );
        assert_eq!(train.n_rows(), 4);
        let val = to_table(&read_csv(&output_dir.join("val.csv")).unwrap()).unwrap();
        assert_eq!(val.column_names(), train.column_names());
        assert_eq!(val.column("collision_type_Rear").unwrap(), &Column::Int(vec![Some(0)]));
        assert_eq!(val.column("collision_type_Side").unwrap(), &Column::Int(vec![Some(0)]));
    }

    #[test]
    fn test_empty_numeric_column_in_val() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yml");
        std::fs::write(
            &config,
            "
target_column: y
train_columns_by_type:
  categorical_columns: [c]
  numerical_columns: [n]
imputer:
  categorical_mode: most_frequent
  numerical_mode: median
encoder:
  handle_unknown: ignore
",
        )
        .unwrap();
        write_lines(
            &dir.path().join("train.csv"),
            &["c,n,y", "a,1,Y", "b,2,N", "a,,N"],
        );
        write_lines(&dir.path().join("val.csv"), &["c,n,y", "a,,Y", "b,,N"]);
        let output_dir = dir.path().join("out");
        let args = PreprocessArgs {
            config,
            data: dir.path().join("{split}.csv").display().to_string(),
            output_dir: output_dir.clone(),
        };
        args.run().unwrap();

        let val = to_table(&read_csv(&output_dir.join("val.csv")).unwrap()).unwrap();
        assert_eq!(val.column_names(), ["n", "c_a", "c_b", "y"]);
        // filled with the median 1.5, which is also the mean
        assert_eq!(val.column("n").unwrap(), &Column::Float(vec![Some(0.0), Some(0.0)]));
    }

    #[test]
    fn test_requires_split_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yml");
        std::fs::write(&config, CONFIG).unwrap();
        let args = PreprocessArgs {
            config,
            data: dir.path().join("claims.csv").display().to_string(),
            output_dir: dir.path().to_path_buf(),
        };
        assert!(args.run().is_err());
    }
}
