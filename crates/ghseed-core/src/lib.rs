pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod process;

/// Canonical hostname of the hosting provider.
pub const GITHUB_HOST: &str = "github.com";

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
