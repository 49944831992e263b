pub mod github;

use ghseed_core::error::GhseedError;
use ghseed_core::models::Visibility;
use ghseed_core::naming::RepoName;

pub use ghseed_core::GITHUB_HOST;
pub use github::GhCli;

/// SSH remote prefix; remote URLs take the form `git@github.com:owner/name.git`.
pub const SSH_REMOTE_PREFIX: &str = "git@github.com";

/// Remote URL for a repository full name (`owner/name`).
pub fn ssh_remote_url(full_name: &str) -> String {
    format!("{SSH_REMOTE_PREFIX}:{full_name}.git")
}

/// Operations on the hosting provider needed to bootstrap a repository.
///
/// Check-style operations report a boolean; only action-style operations
/// surface provider failures as errors.
pub trait HostProvider {
    /// Whether the provider CLI can be run at all.
    fn is_installed(&self) -> bool;

    /// Whether the provider CLI has a logged-in account.
    fn is_authenticated(&self) -> bool;

    /// Login of the authenticated account.
    fn current_username(&self) -> Result<String, GhseedError>;

    /// Whether `org/name` (or `<user>/name` without an org) already exists.
    fn repo_exists(&self, name: &RepoName, org: Option<&RepoName>) -> Result<bool, GhseedError>;

    /// Create an empty remote repository and return its SSH remote URL.
    fn create_repo(
        &self,
        name: &RepoName,
        visibility: Visibility,
        org: Option<&RepoName>,
    ) -> Result<String, GhseedError>;

    /// Logins of the organizations the account belongs to.
    fn list_orgs(&self) -> Result<Vec<String>, GhseedError>;
}
