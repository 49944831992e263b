//! The `init` provisioning workflow.
//!
//! A linear sequence of steps. Each step reports its transition to the
//! [`Progress`] sink; the first failure stops the run and is returned as a
//! [`WorkflowError`] naming the step. Completed side effects (a created
//! directory, a commit, a remote repository) are left in place.

use std::path::{Path, PathBuf};

use ghseed_core::config::Preferences;
use ghseed_core::error::GhseedError;
use ghseed_core::process::CommandRunner;
use ghseed_host::HostProvider;
use ghseed_ssh::SshIdentity;

use crate::git_ops;
use crate::progress::{IdentityPrompt, Progress, Step};
use crate::request::{InitOptions, ProvisionRequest};

pub const DEFAULT_BRANCH: &str = "main";
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";
pub const README_FILE: &str = "README.md";
pub const REMOTE_NAME: &str = "origin";

/// A workflow failure together with the step it happened in.
#[derive(Debug, thiserror::Error)]
#[error("{step} failed")]
pub struct WorkflowError {
    pub step: Step,
    #[source]
    pub source: GhseedError,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOutcome {
    pub remote_url: String,
    pub local_path: PathBuf,
    /// Friendly name of the SSH identity whose key was forced for the push.
    pub identity: Option<String>,
}

struct SshConfigSource {
    path: PathBuf,
    home: PathBuf,
}

pub struct Workflow<'a> {
    runner: &'a dyn CommandRunner,
    provider: &'a dyn HostProvider,
    progress: &'a dyn Progress,
    prompt: &'a dyn IdentityPrompt,
    ssh_config: Option<SshConfigSource>,
}

impl<'a> Workflow<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        provider: &'a dyn HostProvider,
        progress: &'a dyn Progress,
        prompt: &'a dyn IdentityPrompt,
    ) -> Self {
        Self {
            runner,
            provider,
            progress,
            prompt,
            ssh_config: None,
        }
    }

    /// Read push identities from this SSH config, expanding `~` to `home`.
    /// Without it no identity override is ever used.
    pub fn with_ssh_config(mut self, path: &Path, home: &Path) -> Self {
        self.ssh_config = Some(SshConfigSource {
            path: path.to_path_buf(),
            home: home.to_path_buf(),
        });
        self
    }

    fn step<T>(
        &self,
        step: Step,
        f: impl FnOnce() -> Result<(T, String), GhseedError>,
    ) -> Result<T, WorkflowError> {
        self.progress.start(step);
        match f() {
            Ok((value, detail)) => {
                tracing::info!("{step}: {detail}");
                self.progress.succeed(step, &detail);
                Ok(value)
            }
            Err(source) => {
                self.progress.fail(step, &source);
                Err(WorkflowError { step, source })
            }
        }
    }

    fn task(
        &self,
        step: Step,
        f: impl FnOnce() -> Result<String, GhseedError>,
    ) -> Result<(), WorkflowError> {
        self.step(step, || f().map(|detail| ((), detail)))
    }

    pub fn run(
        &self,
        opts: &InitOptions,
        prefs: &Preferences,
        cwd: &Path,
    ) -> Result<ProvisionOutcome, WorkflowError> {
        let req = self.step(Step::ValidateInputs, || {
            let req = ProvisionRequest::resolve(opts, prefs, cwd)?;
            let detail = format!("{} ({})", req.display_name(), req.visibility);
            Ok((req, detail))
        })?;
        let dir = req.target_dir.as_path();

        self.task(Step::Preflight, || self.preflight(&req))?;

        if req.use_current_dir {
            self.task(Step::SafetyChecks, || check_reuse(&req))?;
            self.progress.skip(Step::CreateDirectory, "using current directory");
        } else {
            self.task(Step::CreateDirectory, || create_directory(dir))?;
        }

        self.task(Step::WriteReadme, || write_readme(&req))?;
        self.task(Step::InitRepository, || self.init_repository(dir))?;
        self.task(Step::InitialCommit, || {
            git_ops::add_all(self.runner, dir)?;
            git_ops::commit(self.runner, dir, INITIAL_COMMIT_MESSAGE)?;
            Ok(format!("committed \"{INITIAL_COMMIT_MESSAGE}\""))
        })?;

        let remote_url = self.step(Step::CreateRemote, || {
            let url = self
                .provider
                .create_repo(&req.name, req.visibility, req.org.as_ref())?;
            let detail = format!("{} repository at {url}", req.visibility);
            Ok((url, detail))
        })?;

        self.task(Step::AttachRemote, || {
            git_ops::remote_add(self.runner, dir, REMOTE_NAME, &remote_url)?;
            Ok(format!("{REMOTE_NAME} -> {remote_url}"))
        })?;

        let identities = self.identities();
        let identity = if identities.is_empty() {
            self.progress
                .skip(Step::SelectIdentity, "no GitHub SSH identities configured");
            None
        } else {
            Some(self.step(Step::SelectIdentity, || self.select_identity(identities))?)
        };

        self.task(Step::Push, || {
            let key = identity.as_ref().and_then(|id| id.identity_file.as_deref());
            git_ops::push_upstream(self.runner, dir, REMOTE_NAME, DEFAULT_BRANCH, key)?;
            Ok(format!("pushed {DEFAULT_BRANCH} to {REMOTE_NAME}"))
        })?;

        Ok(ProvisionOutcome {
            remote_url,
            local_path: req.target_dir.clone(),
            identity: identity
                .filter(|id| id.identity_file.is_some())
                .map(|id| id.name),
        })
    }

    fn preflight(&self, req: &ProvisionRequest) -> Result<String, GhseedError> {
        if !self.provider.is_installed() {
            return Err(GhseedError::PreflightFailed {
                message: "GitHub CLI (gh) is not installed; see https://cli.github.com".into(),
            });
        }
        if !self.provider.is_authenticated() {
            return Err(GhseedError::PreflightFailed {
                message: "gh is not authenticated; run `gh auth login`".into(),
            });
        }
        // Not reserved: a repository created between this check and
        // CreateRemote makes the creation step fail instead.
        if self.provider.repo_exists(&req.name, req.org.as_ref())? {
            return Err(GhseedError::PreflightFailed {
                message: format!("repository {} already exists on GitHub", req.display_name()),
            });
        }
        Ok("gh ready, repository name available".into())
    }

    fn init_repository(&self, dir: &Path) -> Result<String, GhseedError> {
        let existed = git_ops::is_repo(dir);
        if !existed {
            git_ops::init(self.runner, dir)?;
        }
        git_ops::rename_branch(self.runner, dir, DEFAULT_BRANCH)?;
        Ok(if existed {
            format!("existing repository, branch renamed to {DEFAULT_BRANCH}")
        } else {
            format!("initialized on {DEFAULT_BRANCH}")
        })
    }

    fn identities(&self) -> Vec<SshIdentity> {
        match &self.ssh_config {
            Some(src) => ghseed_ssh::list_identities(&src.path, &src.home),
            None => Vec::new(),
        }
    }

    fn select_identity(
        &self,
        identities: Vec<SshIdentity>,
    ) -> Result<(SshIdentity, String), GhseedError> {
        let index = if identities.len() == 1 {
            0
        } else {
            self.prompt.choose(&identities)?
        };
        let chosen = identities
            .into_iter()
            .nth(index)
            .ok_or_else(|| GhseedError::PromptCancelled {
                message: format!("no identity number {}", index + 1),
            })?;
        let detail = format!("using {}", chosen.name);
        Ok((chosen, detail))
    }
}

fn check_reuse(req: &ProvisionRequest) -> Result<String, GhseedError> {
    let dir = &req.target_dir;
    if req.force {
        return Ok("--force given, existing repository and README may be reused".into());
    }
    if git_ops::is_repo(dir) {
        return Err(GhseedError::UnsafeReuse {
            path: dir.clone(),
            message: "directory is already a git repository (use --force to continue)".into(),
        });
    }
    if dir.join(README_FILE).exists() {
        return Err(GhseedError::UnsafeReuse {
            path: dir.clone(),
            message: format!("{README_FILE} already exists (use --force to overwrite it)"),
        });
    }
    Ok("directory is clean".into())
}

fn create_directory(dir: &Path) -> Result<String, GhseedError> {
    if dir.exists() {
        return Err(GhseedError::Filesystem {
            path: dir.to_path_buf(),
            message: "already exists".into(),
        });
    }
    std::fs::create_dir(dir).map_err(|e| GhseedError::filesystem(dir, &e))?;
    Ok(dir.display().to_string())
}

fn write_readme(req: &ProvisionRequest) -> Result<String, GhseedError> {
    let path = req.target_dir.join(README_FILE);
    std::fs::write(&path, format!("# {}\n", req.name))
        .map_err(|e| GhseedError::filesystem(&path, &e))?;
    Ok(path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use ghseed_core::models::Visibility;
    use ghseed_core::test_support::ScriptedRunner;
    use ghseed_host::GhCli;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Start(Step),
        Succeed(Step),
        Fail(Step),
        Skip(Step),
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: RefCell<Vec<Event>>,
    }

    impl Progress for RecordingProgress {
        fn start(&self, step: Step) {
            self.events.borrow_mut().push(Event::Start(step));
        }
        fn succeed(&self, step: Step, _detail: &str) {
            self.events.borrow_mut().push(Event::Succeed(step));
        }
        fn fail(&self, step: Step, _error: &GhseedError) {
            self.events.borrow_mut().push(Event::Fail(step));
        }
        fn skip(&self, step: Step, _reason: &str) {
            self.events.borrow_mut().push(Event::Skip(step));
        }
    }

    /// Answers with a fixed index; `None` simulates the user cancelling.
    struct FixedPrompt {
        answer: Option<usize>,
        asked: Cell<bool>,
    }

    impl FixedPrompt {
        fn new(answer: Option<usize>) -> Self {
            Self {
                answer,
                asked: Cell::new(false),
            }
        }
    }

    impl IdentityPrompt for FixedPrompt {
        fn choose(&self, _identities: &[SshIdentity]) -> Result<usize, GhseedError> {
            self.asked.set(true);
            self.answer.ok_or_else(|| GhseedError::PromptCancelled {
                message: "interrupted".into(),
            })
        }
    }

    struct Harness {
        runner: ScriptedRunner,
        progress: RecordingProgress,
        prompt: FixedPrompt,
        root: tempfile::TempDir,
    }

    impl Harness {
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            std::fs::create_dir(root.path().join("work")).unwrap();
            Self {
                runner: ScriptedRunner::new(),
                progress: RecordingProgress::default(),
                prompt: FixedPrompt::new(Some(0)),
                root,
            }
        }

        fn cwd(&self) -> PathBuf {
            self.root.path().join("work")
        }

        fn ssh_config(&self, content: &str) {
            std::fs::write(self.root.path().join("ssh_config"), content).unwrap();
        }

        fn run(&self, opts: InitOptions, prefs: &Preferences) -> Result<ProvisionOutcome, WorkflowError> {
            let gh = GhCli::new(&self.runner);
            Workflow::new(&self.runner, &gh, &self.progress, &self.prompt)
                .with_ssh_config(&self.root.path().join("ssh_config"), self.root.path())
                .run(&opts, prefs, &self.cwd())
        }

        /// gh installed, authenticated as octocat, name free.
        fn script_preflight(&self) {
            self.runner
                .push_stdout("gh version 2.40.0\n")
                .push_success()
                .push_stdout("octocat\n")
                .push_failure("GraphQL: Could not resolve to a Repository");
        }

        fn script_successes(&self, n: usize) {
            for _ in 0..n {
                self.runner.push_success();
            }
        }

        fn events(&self) -> Vec<Event> {
            self.progress.events.borrow().clone()
        }
    }

    fn opts(name: &str) -> InitOptions {
        InitOptions {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_directory_happy_path() {
        let h = Harness::new();
        h.script_preflight();
        // init, branch, add, commit, create, remote add, push
        h.script_successes(7);

        let outcome = h.run(opts("widget"), &Preferences::default()).unwrap();

        let target = h.cwd().join("widget");
        assert_eq!(outcome.remote_url, "git@github.com:octocat/widget.git");
        assert_eq!(outcome.local_path, target);
        assert_eq!(outcome.identity, None);
        assert_eq!(
            std::fs::read_to_string(target.join("README.md")).unwrap(),
            "# widget\n"
        );
        assert_eq!(
            h.runner.command_lines(),
            vec![
                "gh --version",
                "gh auth status",
                "gh api user --jq .login",
                "gh repo view octocat/widget",
                "git init",
                "git branch -M main",
                "git add -A",
                "git commit -m Initial commit",
                "gh repo create octocat/widget --private",
                "git remote add origin git@github.com:octocat/widget.git",
                "git push -u origin main",
            ]
        );
        let git_calls: Vec<_> = h
            .runner
            .invocations()
            .into_iter()
            .filter(|c| c.program == "git")
            .collect();
        assert!(git_calls.iter().all(|c| c.cwd.as_deref() == Some(target.as_path())));
        assert!(git_calls.iter().all(|c| c.env.is_empty()));
    }

    #[test]
    fn test_progress_events_in_order() {
        let h = Harness::new();
        h.script_preflight();
        h.script_successes(7);
        h.run(opts("widget"), &Preferences::default()).unwrap();

        use Event::*;
        assert_eq!(
            h.events(),
            vec![
                Start(Step::ValidateInputs),
                Succeed(Step::ValidateInputs),
                Start(Step::Preflight),
                Succeed(Step::Preflight),
                Start(Step::CreateDirectory),
                Succeed(Step::CreateDirectory),
                Start(Step::WriteReadme),
                Succeed(Step::WriteReadme),
                Start(Step::InitRepository),
                Succeed(Step::InitRepository),
                Start(Step::InitialCommit),
                Succeed(Step::InitialCommit),
                Start(Step::CreateRemote),
                Succeed(Step::CreateRemote),
                Start(Step::AttachRemote),
                Succeed(Step::AttachRemote),
                Skip(Step::SelectIdentity),
                Start(Step::Push),
                Succeed(Step::Push),
            ]
        );
    }

    #[test]
    fn test_failed_commit_halts_and_keeps_prior_effects() {
        let h = Harness::new();
        h.script_preflight();
        h.script_successes(3);
        h.runner.push_failure("Author identity unknown\n");

        let err = h.run(opts("widget"), &Preferences::default()).unwrap_err();

        assert_eq!(err.step, Step::InitialCommit);
        assert!(matches!(err.source, GhseedError::VcsCommandFailed { .. }));
        assert!(err.source.to_string().contains("Author identity unknown"));
        assert_eq!(err.to_string(), "initial commit failed");
        // nothing after the commit ran
        assert_eq!(h.runner.invocations().len(), 8);
        assert!(h.cwd().join("widget").join("README.md").exists());
        assert_eq!(h.events().last(), Some(&Event::Fail(Step::InitialCommit)));
    }

    #[test]
    fn test_failed_push_keeps_remote_and_local_state() {
        let h = Harness::new();
        h.script_preflight();
        // init, branch, add, commit, create, remote add
        h.script_successes(6);
        h.runner.push_failure("Permission denied (publickey).\n");

        let err = h.run(opts("widget"), &Preferences::default()).unwrap_err();

        assert_eq!(err.step, Step::Push);
        assert!(matches!(err.source, GhseedError::VcsCommandFailed { .. }));
        assert!(err.source.to_string().contains("Permission denied"));
        assert_eq!(h.runner.remaining(), 0);
        let lines = h.runner.command_lines();
        assert!(lines.contains(&"gh repo create octocat/widget --private".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("git push -u origin main"));
        assert_eq!(
            std::fs::read_to_string(h.cwd().join("widget").join("README.md")).unwrap(),
            "# widget\n"
        );
        assert_eq!(h.events().last(), Some(&Event::Fail(Step::Push)));
    }

    #[test]
    fn test_invalid_name_runs_nothing() {
        let h = Harness::new();
        let err = h.run(opts("../escape"), &Preferences::default()).unwrap_err();
        assert_eq!(err.step, Step::ValidateInputs);
        assert!(matches!(err.source, GhseedError::InvalidName { .. }));
        assert!(h.runner.invocations().is_empty());
    }

    #[test]
    fn test_unauthenticated_aborts_before_filesystem() {
        let h = Harness::new();
        h.runner
            .push_stdout("gh version 2.40.0\n")
            .push_failure("You are not logged into any GitHub hosts");

        let err = h.run(opts("widget"), &Preferences::default()).unwrap_err();

        assert_eq!(err.step, Step::Preflight);
        assert!(matches!(err.source, GhseedError::PreflightFailed { .. }));
        assert!(!h.cwd().join("widget").exists());
    }

    #[test]
    fn test_existing_remote_repo_is_preflight_failure() {
        let h = Harness::new();
        h.runner
            .push_stdout("gh version 2.40.0\n")
            .push_success()
            .push_stdout("octocat\n")
            .push_stdout("name: octocat/widget\n");

        let err = h.run(opts("widget"), &Preferences::default()).unwrap_err();

        assert_eq!(err.step, Step::Preflight);
        assert!(err.source.to_string().contains("already exists"));
        assert!(!h.cwd().join("widget").exists());
    }

    #[test]
    fn test_existing_target_directory_fails() {
        let h = Harness::new();
        std::fs::create_dir(h.cwd().join("widget")).unwrap();
        h.script_preflight();

        let err = h.run(opts("widget"), &Preferences::default()).unwrap_err();

        assert_eq!(err.step, Step::CreateDirectory);
        assert!(matches!(err.source, GhseedError::Filesystem { .. }));
        assert_eq!(h.runner.remaining(), 0);
        assert_eq!(h.runner.invocations().len(), 4);
    }

    #[test]
    fn test_reuse_of_existing_repo_without_force_is_unsafe() {
        let h = Harness::new();
        std::fs::create_dir(h.cwd().join(".git")).unwrap();
        h.script_preflight();

        let mut o = opts("widget");
        o.here = true;
        let err = h.run(o, &Preferences::default()).unwrap_err();

        assert_eq!(err.step, Step::SafetyChecks);
        assert!(matches!(err.source, GhseedError::UnsafeReuse { .. }));
        assert!(!h.cwd().join("README.md").exists());
        assert_eq!(h.runner.invocations().len(), 4);
    }

    #[test]
    fn test_reuse_with_existing_readme_without_force_is_unsafe() {
        let h = Harness::new();
        std::fs::write(h.cwd().join("README.md"), "keep me\n").unwrap();
        h.script_preflight();

        let mut o = opts("widget");
        o.here = true;
        let err = h.run(o, &Preferences::default()).unwrap_err();

        assert!(matches!(err.source, GhseedError::UnsafeReuse { .. }));
        assert_eq!(
            std::fs::read_to_string(h.cwd().join("README.md")).unwrap(),
            "keep me\n"
        );
    }

    #[test]
    fn test_forced_reuse_skips_init_and_overwrites_readme() {
        let h = Harness::new();
        std::fs::create_dir(h.cwd().join(".git")).unwrap();
        std::fs::write(h.cwd().join("README.md"), "old\n").unwrap();
        h.script_preflight();
        // branch, add, commit, create, remote add, push
        h.script_successes(6);

        let mut o = opts("widget");
        o.here = true;
        o.force = true;
        let outcome = h.run(o, &Preferences::default()).unwrap();

        assert_eq!(outcome.local_path, h.cwd());
        assert_eq!(
            std::fs::read_to_string(h.cwd().join("README.md")).unwrap(),
            "# widget\n"
        );
        let lines = h.runner.command_lines();
        assert!(!lines.contains(&"git init".to_string()));
        assert_eq!(lines[4], "git branch -M main");
        assert!(h.events().contains(&Event::Skip(Step::CreateDirectory)));
    }

    #[test]
    fn test_org_and_visibility_from_preferences() {
        let h = Harness::new();
        h.runner
            .push_stdout("gh version 2.40.0\n")
            .push_success()
            .push_failure("not found");
        h.script_successes(7);
        let prefs = Preferences {
            default_org: Some("acme".to_string()),
            default_visibility: Visibility::Public,
        };

        let outcome = h.run(opts("widget"), &prefs).unwrap();

        assert_eq!(outcome.remote_url, "git@github.com:acme/widget.git");
        let lines = h.runner.command_lines();
        assert_eq!(lines[2], "gh repo view acme/widget");
        assert!(lines.contains(&"gh repo create acme/widget --public".to_string()));
    }

    #[test]
    fn test_single_identity_used_without_prompt() {
        let h = Harness::new();
        h.ssh_config("Host github.com-work\n  IdentityFile ~/.ssh/work\n");
        h.script_preflight();
        h.script_successes(7);

        let outcome = h.run(opts("widget"), &Preferences::default()).unwrap();

        assert_eq!(outcome.identity.as_deref(), Some("work"));
        assert!(!h.prompt.asked.get());
        let push = h.runner.invocations().pop().unwrap();
        let key = h.root.path().join(".ssh").join("work");
        assert_eq!(
            push.env,
            vec![(
                "GIT_SSH_COMMAND".to_string(),
                git_ops::ssh_command(&key)
            )]
        );
    }

    #[test]
    fn test_identity_without_key_pushes_without_override() {
        let h = Harness::new();
        h.ssh_config("Host github.com-work\n  User git\n");
        h.script_preflight();
        h.script_successes(7);

        let outcome = h.run(opts("widget"), &Preferences::default()).unwrap();

        assert_eq!(outcome.identity, None);
        assert!(h.events().contains(&Event::Succeed(Step::SelectIdentity)));
        let push = h.runner.invocations().pop().unwrap();
        assert!(push.env.is_empty());
    }

    #[test]
    fn test_multiple_identities_prompt_for_choice() {
        let mut h = Harness::new();
        h.prompt = FixedPrompt::new(Some(1));
        h.ssh_config(
            "Host github.com\n  IdentityFile ~/.ssh/personal\nHost github.com-work\n  IdentityFile ~/.ssh/work\n",
        );
        h.script_preflight();
        h.script_successes(7);

        let outcome = h.run(opts("widget"), &Preferences::default()).unwrap();

        assert!(h.prompt.asked.get());
        assert_eq!(outcome.identity.as_deref(), Some("work"));
    }

    #[test]
    fn test_cancelled_prompt_aborts_before_push() {
        let mut h = Harness::new();
        h.prompt = FixedPrompt::new(None);
        h.ssh_config("Host github.com-a\nHost github.com-b\n");
        h.script_preflight();
        // init, branch, add, commit, create, remote add
        h.script_successes(6);

        let err = h.run(opts("widget"), &Preferences::default()).unwrap_err();

        assert_eq!(err.step, Step::SelectIdentity);
        assert!(matches!(err.source, GhseedError::PromptCancelled { .. }));
        let lines = h.runner.command_lines();
        assert!(lines.last().unwrap().starts_with("git remote add"));
    }

    #[test]
    fn test_out_of_range_choice_is_cancellation() {
        let mut h = Harness::new();
        h.prompt = FixedPrompt::new(Some(5));
        h.ssh_config("Host github.com-a\nHost github.com-b\n");
        h.script_preflight();
        h.script_successes(6);

        let err = h.run(opts("widget"), &Preferences::default()).unwrap_err();
        assert_eq!(err.step, Step::SelectIdentity);
    }
}
