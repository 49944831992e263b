pub mod git_ops;
pub mod progress;
pub mod request;
pub mod workflow;

pub use progress::{IdentityPrompt, Progress, Step};
pub use request::{InitOptions, ProvisionRequest};
pub use workflow::{ProvisionOutcome, Workflow, WorkflowError};
