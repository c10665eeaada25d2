//! Coverage profile generation
//!
//! Runs `go test -coverprofile=<profile> ./...` and blocks until the test
//! suite finishes. The runner's output is passed straight through.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{AdvisorError, Result};

/// Package pattern handed to the runner.
pub const ALL_PACKAGES: &str = "./...";

#[derive(Debug, Clone)]
pub struct ProfileGenerator {
    program: String,
    profile: PathBuf,
}

impl ProfileGenerator {
    pub fn new(program: impl Into<String>, profile: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            profile: profile.into(),
        }
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "test".to_string(),
            format!("-coverprofile={}", self.profile.display()),
            ALL_PACKAGES.to_string(),
        ]
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the test suite. Any non-zero exit aborts the analysis.
    pub fn generate(&self) -> Result<()> {
        let program = which::which(&self.program).map_err(|source| AdvisorError::RunnerNotFound {
            program: self.program.clone(),
            source,
        })?;
        let command = self.command_line();
        debug!(runner = %program.display(), "resolved test runner");
        info!("Running {}", command);

        let status = Command::new(&program)
            .args(self.args())
            .status()
            .map_err(|source| AdvisorError::RunnerSpawn {
                command: command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(AdvisorError::RunnerFailed { command, status });
        }

        Ok(())
    }
}
