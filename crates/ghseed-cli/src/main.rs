mod commands;
mod ui;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ghseed",
    version,
    about = "Bootstrap a local project and its GitHub repository in one step"
)]
struct Cli {
    /// Log every git and gh command that is run
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    commands::run(cli.command)
}
