use comfy_table::{Cell, Color, Table};
use ghseed_core::config::Preferences;
use ghseed_core::process::ProcessRunner;
use ghseed_host::{GhCli, HostProvider};

pub fn run() -> anyhow::Result<()> {
    let gh = GhCli::new(ProcessRunner);
    if !gh.is_installed() {
        anyhow::bail!("GitHub CLI (gh) is not installed; see https://cli.github.com");
    }
    if !gh.is_authenticated() {
        anyhow::bail!("gh is not authenticated; run `gh auth login`");
    }

    let user = gh.current_username()?;
    let orgs = gh.list_orgs()?;
    let default_org = Preferences::load().default_org;

    let mut table = Table::new();
    table.set_header(vec!["OWNER", "KIND", "DEFAULT"]);

    let default_cell = |is_default: bool| {
        if is_default {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("")
        }
    };

    table.add_row(vec![
        Cell::new(&user).fg(Color::Cyan),
        Cell::new("personal"),
        default_cell(default_org.is_none()),
    ]);
    for org in &orgs {
        table.add_row(vec![
            Cell::new(org),
            Cell::new("organization"),
            default_cell(default_org.as_deref() == Some(org.as_str())),
        ]);
    }

    println!("{table}");
    if orgs.is_empty() {
        println!("You are not a member of any organization.");
    } else {
        println!("Use `ghseed config --org <name>` to change the default.");
    }
    Ok(())
}
