use std::path::Path;

use ghseed_core::error::GhseedError;
use ghseed_core::process::{CommandRunner, CommandSpec};

/// Run a git command in the given directory, returning an error if it fails.
fn git_ok(runner: &dyn CommandRunner, dir: &Path, args: &[&str]) -> Result<String, GhseedError> {
    git_ok_with(runner, CommandSpec::new("git", args.iter().copied()).current_dir(dir))
}

fn git_ok_with(runner: &dyn CommandRunner, spec: CommandSpec) -> Result<String, GhseedError> {
    let out = runner.run(&spec)?;
    if !out.success() {
        return Err(GhseedError::VcsCommandFailed {
            command: spec.args_line(),
            stderr: out.stderr.trim().to_string(),
        });
    }
    Ok(out.stdout)
}

/// Whether `dir` already contains a `.git` directory or file.
pub fn is_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Initialize a new repository.
pub fn init(runner: &dyn CommandRunner, dir: &Path) -> Result<(), GhseedError> {
    git_ok(runner, dir, &["init"])?;
    Ok(())
}

/// Rename the current branch, which may still be unborn.
pub fn rename_branch(runner: &dyn CommandRunner, dir: &Path, branch: &str) -> Result<(), GhseedError> {
    git_ok(runner, dir, &["branch", "-M", branch])?;
    Ok(())
}

/// Stage every change in the working tree.
pub fn add_all(runner: &dyn CommandRunner, dir: &Path) -> Result<(), GhseedError> {
    git_ok(runner, dir, &["add", "-A"])?;
    Ok(())
}

pub fn commit(runner: &dyn CommandRunner, dir: &Path, message: &str) -> Result<(), GhseedError> {
    git_ok(runner, dir, &["commit", "-m", message])?;
    Ok(())
}

/// Add a remote. Fails if a remote with that name already exists.
pub fn remote_add(runner: &dyn CommandRunner, dir: &Path, name: &str, url: &str) -> Result<(), GhseedError> {
    git_ok(runner, dir, &["remote", "add", name, url])?;
    Ok(())
}

/// Push a branch and set it as upstream. With an identity file, ssh is told
/// to offer only that key.
pub fn push_upstream(
    runner: &dyn CommandRunner,
    dir: &Path,
    remote: &str,
    branch: &str,
    identity_file: Option<&Path>,
) -> Result<(), GhseedError> {
    let mut spec = CommandSpec::new("git", ["push", "-u", remote, branch]).current_dir(dir);
    if let Some(key) = identity_file {
        spec = spec.env("GIT_SSH_COMMAND", ssh_command(key));
    }
    git_ok_with(runner, spec)?;
    Ok(())
}

/// `GIT_SSH_COMMAND` value pinning ssh to a single key.
pub fn ssh_command(identity_file: &Path) -> String {
    let quoted = identity_file.to_string_lossy().replace('\'', r"'\''");
    format!("ssh -i '{quoted}' -o IdentitiesOnly=yes")
}
