// Batch digest module
// Hashes a list of files under one algorithm, isolating per-file failures

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::error::HashUtilityError;
use super::hash::{Algorithm, HashComputer, HashResult};

/// Outcome for one input of a batch
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<HashResult, HashUtilityError>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary counts for a finished batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BatchStats {
    pub files_processed: usize,
    pub files_failed: usize,
}

impl BatchStats {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let files_failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        Self {
            files_processed: outcomes.len() - files_failed,
            files_failed,
        }
    }
}

/// Engine for hashing many files with one algorithm
pub struct BatchEngine {
    computer: HashComputer,
    parallel: bool,
}

impl BatchEngine {
    /// Create a new sequential BatchEngine
    pub fn new(computer: HashComputer) -> Self {
        Self {
            computer,
            parallel: false,
        }
    }

    /// Enable or disable parallel hashing across files
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Hash every path, returning one outcome per input in input order
    ///
    /// A failing file never stops the others from being hashed.
    pub fn hash_files(&self, paths: &[PathBuf], algorithm: Algorithm) -> Vec<FileOutcome> {
        let outcomes: Vec<FileOutcome> = if self.parallel {
            // indexed collect keeps input order
            paths
                .par_iter()
                .map(|path| self.hash_one(path, algorithm))
                .collect()
        } else {
            paths.iter().map(|path| self.hash_one(path, algorithm)).collect()
        };

        let stats = BatchStats::from_outcomes(&outcomes);
        tracing::info!(
            "{} batch finished: {} hashed, {} failed",
            algorithm,
            stats.files_processed,
            stats.files_failed
        );

        outcomes
    }

    fn hash_one(&self, path: &Path, algorithm: Algorithm) -> FileOutcome {
        let result = self.computer.compute_hash(path, algorithm);
        if let Err(e) = &result {
            tracing::warn!("failed to hash {}: {}", path.display(), e.summary());
        }

        FileOutcome {
            path: path.to_path_buf(),
            result,
        }
    }
}
