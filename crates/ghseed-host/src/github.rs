use std::cell::OnceCell;

use serde::Deserialize;

use ghseed_core::error::GhseedError;
use ghseed_core::models::Visibility;
use ghseed_core::naming::RepoName;
use ghseed_core::process::{CommandOutput, CommandRunner, CommandSpec};

use crate::{ssh_remote_url, HostProvider};

#[derive(Debug, Deserialize)]
struct GhOrg {
    login: String,
}

/// [`HostProvider`] backed by the GitHub CLI (`gh`).
pub struct GhCli<R: CommandRunner> {
    runner: R,
    username: OnceCell<String>,
}

impl<R: CommandRunner> GhCli<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            username: OnceCell::new(),
        }
    }

    fn gh(&self, args: &[&str]) -> Result<CommandOutput, GhseedError> {
        self.runner.run(&CommandSpec::new("gh", args.iter().copied()))
    }

    /// Run a `gh` command, returning stdout or an error carrying stderr.
    fn gh_ok(&self, args: &[&str]) -> Result<String, GhseedError> {
        let out = self.gh(args)?;
        if !out.success() {
            return Err(GhseedError::ProviderCommandFailed {
                command: args.join(" "),
                stderr: out.stderr.trim().to_string(),
            });
        }
        Ok(out.stdout)
    }

    /// `org/name`, or `<username>/name` when no org is given.
    fn full_name(&self, name: &RepoName, org: Option<&RepoName>) -> Result<String, GhseedError> {
        let owner = match org {
            Some(org) => org.to_string(),
            None => self.current_username()?,
        };
        Ok(format!("{owner}/{name}"))
    }
}

impl<R: CommandRunner> HostProvider for GhCli<R> {
    fn is_installed(&self) -> bool {
        match self.gh(&["--version"]) {
            Ok(out) => out.success(),
            Err(e) => {
                tracing::debug!("gh not available: {e}");
                false
            }
        }
    }

    fn is_authenticated(&self) -> bool {
        self.gh(&["auth", "status"])
            .map(|out| out.success())
            .unwrap_or(false)
    }

    fn current_username(&self) -> Result<String, GhseedError> {
        if let Some(user) = self.username.get() {
            return Ok(user.clone());
        }
        let login = self.gh_ok(&["api", "user", "--jq", ".login"])?.trim().to_string();
        if login.is_empty() {
            return Err(GhseedError::ProviderCommandFailed {
                command: "api user".to_string(),
                stderr: "empty login in response".to_string(),
            });
        }
        tracing::debug!("authenticated as {login}");
        let _ = self.username.set(login.clone());
        Ok(login)
    }

    fn repo_exists(&self, name: &RepoName, org: Option<&RepoName>) -> Result<bool, GhseedError> {
        let full_name = self.full_name(name, org)?;
        let out = self.gh(&["repo", "view", &full_name])?;
        Ok(out.success())
    }

    fn create_repo(
        &self,
        name: &RepoName,
        visibility: Visibility,
        org: Option<&RepoName>,
    ) -> Result<String, GhseedError> {
        let full_name = self.full_name(name, org)?;
        // No --source/--push: the caller adds the remote and pushes itself.
        self.gh_ok(&["repo", "create", &full_name, visibility.gh_flag()])?;
        tracing::info!("created {visibility} repository {full_name}");
        Ok(ssh_remote_url(&full_name))
    }

    fn list_orgs(&self) -> Result<Vec<String>, GhseedError> {
        let stdout = self.gh_ok(&["api", "user/orgs"])?;
        let orgs: Vec<GhOrg> =
            serde_json::from_str(&stdout).map_err(|e| GhseedError::ProviderCommandFailed {
                command: "api user/orgs".to_string(),
                stderr: format!("unexpected response: {e}"),
            })?;
        Ok(orgs.into_iter().map(|o| o.login).collect())
    }
}
