use clap::{Parser, Subcommand};
use preprocess::PreprocessArgs;
use profile::ProfileArgs;

pub mod frame;
pub mod preprocess;
pub mod profile;

#[derive(Debug, Clone, Parser)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}
impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        self.command.run()
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fit the preprocessor on the training split and transform both splits
    Preprocess(PreprocessArgs),
    /// Report the statistics the column droppers decide on
    Profile(ProfileArgs),
}
impl Command {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Preprocess(args) => args.run(),
            Command::Profile(args) => args.run(),
        }
    }
}
