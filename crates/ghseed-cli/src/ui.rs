use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::time::Duration;

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use ghseed_core::error::GhseedError;
use ghseed_provision::{IdentityPrompt, Progress, Step};
use ghseed_ssh::SshIdentity;

/// Shows a spinner for the running step and a ✓/✗ line once it settles.
pub struct SpinnerProgress {
    current: RefCell<Option<ProgressBar>>,
    style: ProgressStyle,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        Self {
            current: RefCell::new(None),
            style,
        }
    }

    /// Hide the spinner while `f` runs, e.g. to read from the terminal.
    pub fn suspend<T>(&self, f: impl FnOnce() -> T) -> T {
        match self.current.borrow().as_ref() {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }

    fn settle(&self, line: String) {
        if let Some(pb) = self.current.borrow_mut().take() {
            pb.finish_and_clear();
        }
        eprintln!("{line}");
    }
}

impl Progress for SpinnerProgress {
    fn start(&self, step: Step) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(self.style.clone());
        pb.set_message(format!("{step}..."));
        pb.enable_steady_tick(Duration::from_millis(80));
        if let Some(previous) = self.current.replace(Some(pb)) {
            previous.finish_and_clear();
        }
    }

    fn succeed(&self, step: Step, detail: &str) {
        self.settle(format!(
            "{} {step} {}",
            style("✓").green(),
            style(detail).dim()
        ));
    }

    fn fail(&self, step: Step, error: &GhseedError) {
        self.settle(format!("{} {step}: {error}", style("✗").red().bold()));
    }

    fn skip(&self, step: Step, reason: &str) {
        eprintln!("{}", style(format!("- {step} skipped ({reason})")).dim());
    }
}

/// Numbered choice among SSH identities. The menu goes to the terminal's
/// stderr and the answer is read from stdin.
pub struct TerminalPrompt<'a> {
    progress: &'a SpinnerProgress,
}

impl<'a> TerminalPrompt<'a> {
    pub fn new(progress: &'a SpinnerProgress) -> Self {
        Self { progress }
    }
}

impl IdentityPrompt for TerminalPrompt<'_> {
    fn choose(&self, identities: &[SshIdentity]) -> Result<usize, GhseedError> {
        self.progress.suspend(|| {
            let stdin = std::io::stdin();
            ask(identities, &mut stdin.lock(), &mut Term::stderr())
        })
    }
}

fn cancelled(e: std::io::Error) -> GhseedError {
    GhseedError::PromptCancelled {
        message: e.to_string(),
    }
}

/// Ask until `input` yields a number in range. An empty line or end of
/// input cancels.
fn ask(
    identities: &[SshIdentity],
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<usize, GhseedError> {
    writeln!(output, "Several GitHub SSH identities are configured:").map_err(cancelled)?;
    for (i, id) in identities.iter().enumerate() {
        let key = id
            .identity_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "no IdentityFile".to_string());
        writeln!(output, "  {}) {} ({key})", i + 1, style(&id.name).cyan()).map_err(cancelled)?;
    }

    let count = identities.len();
    loop {
        write!(output, "Push with which identity? [1-{count}]: ").map_err(cancelled)?;
        output.flush().map_err(cancelled)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(cancelled)? == 0 {
            return Err(GhseedError::PromptCancelled {
                message: "end of input, no identity selected".to_string(),
            });
        }
        let answer = line.trim();
        if answer.is_empty() {
            return Err(GhseedError::PromptCancelled {
                message: "no identity selected".to_string(),
            });
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Ok(n - 1),
            _ => writeln!(output, "Enter a number from 1 to {count}.").map_err(cancelled)?,
        }
    }
}
