use std::path::{Path, PathBuf};

use ghseed_core::GITHUB_HOST;

/// A GitHub-related `Host` block from the SSH client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshIdentity {
    /// Friendly name: the alias suffix for `github.com-<suffix>`, `default`
    /// for a bare `github.com`, otherwise the alias itself.
    pub name: String,
    pub identity_file: Option<PathBuf>,
}

/// Host block being accumulated while parsing.
struct HostBlock {
    alias: String,
    hostname_matches: bool,
    identity_file: Option<PathBuf>,
}

impl HostBlock {
    fn new(alias: &str) -> Self {
        Self {
            alias: alias.to_string(),
            hostname_matches: false,
            identity_file: None,
        }
    }

    fn is_github(&self) -> bool {
        self.hostname_matches || self.alias.contains(GITHUB_HOST)
    }

    fn into_identity(self) -> SshIdentity {
        let name = if self.alias == GITHUB_HOST {
            "default".to_string()
        } else if let Some(suffix) = self
            .alias
            .strip_prefix(GITHUB_HOST)
            .and_then(|rest| rest.strip_prefix('-'))
            .filter(|suffix| !suffix.is_empty())
        {
            suffix.to_string()
        } else {
            self.alias
        };
        SshIdentity {
            name,
            identity_file: self.identity_file,
        }
    }
}

/// Split `Keyword value` or `Keyword=value` into a lowercased keyword and
/// the raw value.
fn split_directive(line: &str) -> Option<(String, &str)> {
    let idx = line.find(|c: char| c.is_whitespace() || c == '=')?;
    let (keyword, rest) = line.split_at(idx);
    let value = rest
        .trim_start()
        .strip_prefix('=')
        .unwrap_or(rest.trim_start())
        .trim();
    Some((keyword.to_ascii_lowercase(), value))
}

fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    let path = path.trim_matches('"');
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

fn flush(block: Option<HostBlock>, out: &mut Vec<SshIdentity>) {
    if let Some(block) = block.filter(HostBlock::is_github) {
        out.push(block.into_identity());
    }
}

/// Extract GitHub-related host blocks from SSH config text, in file order.
pub fn parse_identities(content: &str, home: &Path) -> Vec<SshIdentity> {
    let mut identities = Vec::new();
    let mut current: Option<HostBlock> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((keyword, value)) = split_directive(trimmed) else {
            continue;
        };
        match keyword.as_str() {
            "host" => {
                flush(current.take(), &mut identities);
                let alias = value.split_whitespace().next().unwrap_or("");
                current = Some(HostBlock::new(alias));
            }
            "match" => flush(current.take(), &mut identities),
            "hostname" => {
                if let Some(block) = current.as_mut() {
                    if value == GITHUB_HOST {
                        block.hostname_matches = true;
                    }
                }
            }
            "identityfile" => {
                if let Some(block) = current.as_mut() {
                    block.identity_file = Some(expand_tilde(value, home));
                }
            }
            _ => {}
        }
    }
    flush(current, &mut identities);

    identities
}

/// Read the SSH config at `config_path`. A missing or unreadable file yields
/// no identities.
pub fn list_identities(config_path: &Path, home: &Path) -> Vec<SshIdentity> {
    if !config_path.exists() {
        return Vec::new();
    }
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_identities(&content, home),
        Err(e) => {
            tracing::warn!("could not read {}: {e}", config_path.display());
            Vec::new()
        }
    }
}

/// Location of the user's SSH client configuration under `home`.
pub fn default_config_path(home: &Path) -> PathBuf {
    home.join(".ssh").join("config")
}
