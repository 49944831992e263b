use std::path::Path;

use clap::Args;
use ghseed_core::config::Preferences;
use ghseed_core::error::GhseedError;
use ghseed_core::models::Visibility;

/// `--org` value that clears the default organization.
const PERSONAL: &str = "personal";

#[derive(Args)]
pub struct ConfigArgs {
    /// Show current preferences (the default when nothing is set)
    #[arg(long)]
    show: bool,
    /// Default organization, or "personal" for your own account
    #[arg(long)]
    org: Option<String>,
    /// Default visibility: public or private
    #[arg(long)]
    visibility: Option<String>,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let path = Preferences::config_path()?;
    let changed = args.org.is_some() || args.visibility.is_some();
    let prefs = apply(&path, args.org.as_deref(), args.visibility.as_deref())?;
    if changed {
        println!("Preferences saved.");
    }
    show(&path, &prefs);
    Ok(())
}

/// Apply the requested updates and save. Nothing is written when no field is
/// given or when the visibility value is invalid.
fn apply(
    path: &Path,
    org: Option<&str>,
    visibility: Option<&str>,
) -> Result<Preferences, GhseedError> {
    let mut prefs = Preferences::load_from(path);
    if org.is_none() && visibility.is_none() {
        return Ok(prefs);
    }

    let visibility = visibility.map(str::parse::<Visibility>).transpose()?;

    if let Some(org) = org {
        prefs.default_org = if org == PERSONAL {
            None
        } else {
            Some(org.to_string())
        };
    }
    if let Some(visibility) = visibility {
        prefs.default_visibility = visibility;
    }

    prefs.save_to(path)?;
    Ok(prefs)
}

fn show(path: &Path, prefs: &Preferences) {
    let state = if path.exists() { "exists" } else { "not created yet" };
    println!("Config file:         {} ({state})", path.display());
    println!(
        "Default org:         {}",
        prefs.default_org.as_deref().unwrap_or("(personal account)")
    );
    println!("Default visibility:  {}", prefs.default_visibility);
}
