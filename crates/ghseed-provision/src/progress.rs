use ghseed_core::error::GhseedError;
use ghseed_ssh::SshIdentity;

/// Steps of the provisioning workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    ValidateInputs,
    Preflight,
    SafetyChecks,
    CreateDirectory,
    WriteReadme,
    InitRepository,
    InitialCommit,
    CreateRemote,
    AttachRemote,
    SelectIdentity,
    Push,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Step::ValidateInputs => "validate inputs",
            Step::Preflight => "preflight checks",
            Step::SafetyChecks => "check current directory",
            Step::CreateDirectory => "create directory",
            Step::WriteReadme => "write README",
            Step::InitRepository => "initialize git repository",
            Step::InitialCommit => "initial commit",
            Step::CreateRemote => "create GitHub repository",
            Step::AttachRemote => "add remote",
            Step::SelectIdentity => "select SSH identity",
            Step::Push => "push",
        };
        f.write_str(label)
    }
}

/// Receives step transitions as the workflow runs.
pub trait Progress {
    fn start(&self, step: Step);
    fn succeed(&self, step: Step, detail: &str);
    fn fail(&self, step: Step, error: &GhseedError);
    /// The step does not apply to this run.
    fn skip(&self, step: Step, reason: &str);
}

/// Asks the user which of several SSH identities to push with.
pub trait IdentityPrompt {
    /// Index into `identities`. Cancellation must be an error, never a
    /// silent default.
    fn choose(&self, identities: &[SshIdentity]) -> Result<usize, GhseedError>;
}
