pub mod config;
pub mod init;
pub mod orgs;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Command {
    /// Create a project directory, commit a README and push it to a new GitHub repository
    Init(init::InitArgs),
    /// Show or change default organization and visibility
    Config(config::ConfigArgs),
    /// List organizations you can create repositories under
    Orgs,
}

pub fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Init(args) => init::run(args),
        Command::Config(args) => config::run(args),
        Command::Orgs => orgs::run(),
    }
}
