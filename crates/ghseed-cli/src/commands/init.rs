use clap::Args;
use console::style;
use ghseed_core::config::Preferences;
use ghseed_core::process::ProcessRunner;
use ghseed_host::GhCli;
use ghseed_provision::{InitOptions, Workflow};

use crate::ui::{SpinnerProgress, TerminalPrompt};

#[derive(Args)]
pub struct InitArgs {
    /// Project name, used for the directory and the GitHub repository
    name: String,
    /// Create a public repository
    #[arg(long, conflicts_with = "private")]
    public: bool,
    /// Create a private repository
    #[arg(long)]
    private: bool,
    /// Set up the current directory instead of creating ./<name>
    #[arg(long)]
    here: bool,
    /// With --here, continue even if a git repository or README already exists
    #[arg(long)]
    force: bool,
    /// Create the repository under this organization instead of your account
    #[arg(long)]
    org: Option<String>,
}

impl InitArgs {
    fn into_options(self) -> InitOptions {
        let public = if self.public {
            Some(true)
        } else if self.private {
            Some(false)
        } else {
            None
        };
        InitOptions {
            name: self.name,
            public,
            org: self.org,
            here: self.here,
            force: self.force,
        }
    }
}

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    let prefs = Preferences::load();
    let cwd = std::env::current_dir()?;

    let runner = ProcessRunner;
    let gh = GhCli::new(runner);
    let progress = SpinnerProgress::new();
    let prompt = TerminalPrompt::new(&progress);

    let mut workflow = Workflow::new(&runner, &gh, &progress, &prompt);
    if let Some(home) = dirs::home_dir() {
        workflow = workflow.with_ssh_config(&ghseed_ssh::default_config_path(&home), &home);
    }

    let outcome = workflow.run(&args.into_options(), &prefs, &cwd)?;

    println!();
    println!("{} Repository ready", style("✓").green().bold());
    println!("  Remote:  {}", style(&outcome.remote_url).cyan());
    println!("  Local:   {}", outcome.local_path.display());
    if let Some(identity) = &outcome.identity {
        println!("  SSH identity: {identity}");
    }
    Ok(())
}
