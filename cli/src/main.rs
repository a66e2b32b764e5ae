use clap::Parser;
use frame_prep_cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frame_prep=info,frame_prep_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
