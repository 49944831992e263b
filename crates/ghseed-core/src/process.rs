use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::GhseedError;

/// An external command to run: program, arguments, working directory and
/// any extra environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: &str, value: impl Into<String>) -> Self {
        self.env.push((key.to_string(), value.into()));
        self
    }

    /// Arguments joined with spaces, for messages and logs.
    pub fn args_line(&self) -> String {
        self.args.join(" ")
    }
}

/// Result of running an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands. Implemented by [`ProcessRunner`] and, in tests,
/// by a scripted fake.
pub trait CommandRunner {
    /// Run the command and capture its output. Only a failure to start the
    /// process is an error; a non-zero exit is reported in the output.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, GhseedError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, GhseedError> {
        (**self).run(spec)
    }
}

/// Runs commands as real child processes, blocking until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, GhseedError> {
        tracing::debug!("running {} {}", spec.program, spec.args_line());

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|e| GhseedError::Spawn {
            program: spec.program.clone(),
            message: e.to_string(),
        })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_builder() {
        let spec = CommandSpec::new("git", ["push", "-u", "origin", "main"])
            .current_dir(Path::new("/tmp/project"))
            .env("GIT_SSH_COMMAND", "ssh -i key");
        assert_eq!(spec.args_line(), "push -u origin main");
        assert_eq!(spec.cwd.as_deref(), Some(Path::new("/tmp/project")));
        assert_eq!(spec.env.len(), 1);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let spec = CommandSpec::new("ghseed-no-such-program", Vec::<String>::new());
        let err = ProcessRunner.run(&spec).unwrap_err();
        assert!(matches!(err, GhseedError::Spawn { .. }));
    }

    #[test]
    fn test_signal_exit_is_not_success() {
        let out = CommandOutput {
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(!out.success());
    }
}
