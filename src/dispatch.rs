// Command dispatcher
// Runs a ParsedCommand against the hash engines and reports through a Reporter

use std::io;

use crate::cli::{self, ParsedCommand};
use crate::hash::{Algorithm, BatchEngine, HashComputer, VerifyEngine};
use crate::output::Reporter;

/// Overall result of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every file hashed, or the verification matched
    Success,
    /// A file failed, or the verification did not match
    Failure,
    /// The command itself was malformed
    UsageError,
}

impl RunStatus {
    /// Process exit code for this status
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failure => 1,
            RunStatus::UsageError => 2,
        }
    }
}

/// Routes commands to the batch and verification engines
pub struct Dispatcher {
    computer: HashComputer,
    parallel: bool,
    fallback: Algorithm,
}

impl Dispatcher {
    pub fn new(computer: HashComputer) -> Self {
        Self {
            computer,
            parallel: false,
            fallback: Algorithm::Sha256,
        }
    }

    /// Hash batch files in parallel
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Algorithm for file-vs-file verification without an explicit one
    pub fn with_fallback(mut self, fallback: Algorithm) -> Self {
        self.fallback = fallback;
        self
    }

    /// Execute `command`, report everything, and return the overall status
    pub fn dispatch<R: Reporter>(&self, command: ParsedCommand, reporter: &mut R) -> io::Result<RunStatus> {
        let status = match command {
            ParsedCommand::DigestBatch { algorithm, files } => {
                let engine = BatchEngine::new(self.computer.clone()).with_parallel(self.parallel);
                let outcomes = engine.hash_files(&files, algorithm);

                let mut status = RunStatus::Success;
                for outcome in &outcomes {
                    match &outcome.result {
                        Ok(result) => reporter.digest(result)?,
                        Err(e) => {
                            reporter.file_error(&outcome.path, e)?;
                            status = RunStatus::Failure;
                        }
                    }
                }
                status
            }
            ParsedCommand::Verify {
                token_a,
                token_b,
                algorithm,
            } => {
                let engine = VerifyEngine::new(self.computer.clone()).with_fallback(self.fallback);
                let outcome = engine.verify(&token_a, &token_b, algorithm);
                reporter.comparison(&outcome)?;
                if outcome.is_match() {
                    RunStatus::Success
                } else {
                    RunStatus::Failure
                }
            }
            ParsedCommand::Help => {
                reporter.message(&cli::help_text())?;
                RunStatus::Success
            }
            ParsedCommand::Usage => {
                reporter.message(&cli::usage_text())?;
                RunStatus::Success
            }
            ParsedCommand::Version => {
                reporter.message(&cli::version_text())?;
                RunStatus::Success
            }
            ParsedCommand::Invalid(error) => {
                tracing::debug!("rejected command: {}", error.summary());
                reporter.usage_error(&error)?;
                if error.is_usage_error() {
                    RunStatus::UsageError
                } else {
                    RunStatus::Failure
                }
            }
        };

        reporter.finish()?;
        Ok(status)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(HashComputer::new())
    }
}
