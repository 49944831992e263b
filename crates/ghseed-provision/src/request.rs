use std::path::{Path, PathBuf};

use ghseed_core::config::Preferences;
use ghseed_core::error::GhseedError;
use ghseed_core::models::Visibility;
use ghseed_core::naming::{self, RepoName};

/// Raw `init` arguments as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub name: String,
    /// `Some(true)` for `--public`, `Some(false)` for `--private`.
    pub public: Option<bool>,
    pub org: Option<String>,
    pub here: bool,
    pub force: bool,
}

/// Everything the workflow needs, resolved once from [`InitOptions`] and
/// [`Preferences`]. Not modified after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub name: RepoName,
    pub visibility: Visibility,
    /// `None` creates the repository under the personal account.
    pub org: Option<RepoName>,
    pub target_dir: PathBuf,
    pub use_current_dir: bool,
    pub force: bool,
}

impl ProvisionRequest {
    /// Validate names and merge flags over preferences. Explicit flags win;
    /// absent flags fall back to the stored defaults.
    pub fn resolve(
        opts: &InitOptions,
        prefs: &Preferences,
        cwd: &Path,
    ) -> Result<Self, GhseedError> {
        let name = naming::validate(&opts.name)?;
        let org = opts
            .org
            .as_deref()
            .or(prefs.default_org.as_deref())
            .map(naming::validate)
            .transpose()?;
        let visibility = opts
            .public
            .map(Visibility::from_public_flag)
            .unwrap_or(prefs.default_visibility);
        let target_dir = if opts.here {
            cwd.to_path_buf()
        } else {
            cwd.join(name.as_str())
        };

        Ok(Self {
            name,
            visibility,
            org,
            target_dir,
            use_current_dir: opts.here,
            force: opts.force,
        })
    }

    /// `org/name`, or `name` alone for the personal account.
    pub fn display_name(&self) -> String {
        match &self.org {
            Some(org) => format!("{org}/{}", self.name),
            None => self.name.to_string(),
        }
    }
}
