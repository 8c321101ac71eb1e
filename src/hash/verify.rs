// Verification module
// Compares two tokens, each either a file path or a literal hex digest

use std::path::{Path, PathBuf};

use super::error::HashUtilityError;
use super::hash::{Algorithm, HashComputer};

/// A raw argument after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationToken {
    /// A path whose digest must be computed
    FileTarget(PathBuf),
    /// A digest given on the command line, lowercased
    LiteralDigest { digest: String, algorithm: Algorithm },
}

impl VerificationToken {
    /// Classify a raw argument
    ///
    /// The trimmed value is a literal digest iff it is all hex and its length
    /// is the hex length of a supported algorithm. Lengths are resolved in
    /// canonical algorithm order. Everything else is treated as a path.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        let is_hex = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_hexdigit());

        match Algorithm::from_hex_length(trimmed.len()) {
            Some(algorithm) if is_hex => VerificationToken::LiteralDigest {
                digest: trimmed.to_ascii_lowercase(),
                algorithm,
            },
            _ => VerificationToken::FileTarget(PathBuf::from(raw)),
        }
    }

    /// Algorithm implied by a literal digest
    pub fn implied_algorithm(&self) -> Option<Algorithm> {
        match self {
            VerificationToken::LiteralDigest { algorithm, .. } => Some(*algorithm),
            VerificationToken::FileTarget(_) => None,
        }
    }
}

/// Both sides of a finished comparison
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ComparisonDetail {
    pub algorithm: Algorithm,
    pub left: String,
    pub right: String,
}

/// Verdict of a single verification
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ComparisonOutcome {
    Match(ComparisonDetail),
    Mismatch(ComparisonDetail),
    Error { reason: String },
}

impl ComparisonOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, ComparisonOutcome::Match(_))
    }

    fn error(reason: impl Into<String>) -> Self {
        ComparisonOutcome::Error {
            reason: reason.into(),
        }
    }

    fn from_digests(algorithm: Algorithm, left: String, right: String) -> Self {
        let detail = ComparisonDetail {
            algorithm,
            left: left.to_ascii_lowercase(),
            right: right.to_ascii_lowercase(),
        };
        if detail.left == detail.right {
            ComparisonOutcome::Match(detail)
        } else {
            ComparisonOutcome::Mismatch(detail)
        }
    }
}

/// Engine for checksum verification between two tokens
pub struct VerifyEngine {
    computer: HashComputer,
    fallback: Algorithm,
}

impl VerifyEngine {
    /// Create a new VerifyEngine; file-vs-file comparisons default to SHA256
    pub fn new(computer: HashComputer) -> Self {
        Self {
            computer,
            fallback: Algorithm::Sha256,
        }
    }

    /// Algorithm for file-vs-file comparisons when none is given explicitly
    pub fn with_fallback(mut self, fallback: Algorithm) -> Self {
        self.fallback = fallback;
        self
    }

    /// Compare two raw tokens
    ///
    /// `explicit` is the algorithm named on the command line, if any. It
    /// decides file-vs-file comparisons and must agree with any literal digest.
    pub fn verify(&self, token_a: &str, token_b: &str, explicit: Option<Algorithm>) -> ComparisonOutcome {
        let left = VerificationToken::classify(token_a);
        let right = VerificationToken::classify(token_b);
        tracing::debug!("verifying {:?} against {:?}", left, right);

        for (token, raw) in [(&left, token_a), (&right, token_b)] {
            if let VerificationToken::FileTarget(path) = token {
                if !is_regular_file(path) {
                    return ComparisonOutcome::error(format!("file not found: {}", raw));
                }
            }
        }

        let algorithm = match self.resolve_algorithm(&left, &right, explicit) {
            Ok(algorithm) => algorithm,
            Err(e) => return ComparisonOutcome::error(e.summary()),
        };

        let left_digest = match self.digest_of(&left, algorithm) {
            Ok(digest) => digest,
            Err(e) => return ComparisonOutcome::error(e.summary()),
        };
        let right_digest = match self.digest_of(&right, algorithm) {
            Ok(digest) => digest,
            Err(e) => return ComparisonOutcome::error(e.summary()),
        };

        ComparisonOutcome::from_digests(algorithm, left_digest, right_digest)
    }

    /// Pick the single algorithm both sides are compared under
    fn resolve_algorithm(
        &self,
        left: &VerificationToken,
        right: &VerificationToken,
        explicit: Option<Algorithm>,
    ) -> Result<Algorithm, HashUtilityError> {
        match (left.implied_algorithm(), right.implied_algorithm()) {
            (Some(a), Some(b)) if a != b => Err(HashUtilityError::AmbiguousComparison {
                reason: "incompatible digest lengths".to_string(),
            }),
            (Some(implied), _) | (_, Some(implied)) => match explicit {
                Some(named) if named != implied => Err(HashUtilityError::AmbiguousComparison {
                    reason: format!(
                        "a {} digest cannot be checked with {}",
                        implied, named
                    ),
                }),
                _ => Ok(implied),
            },
            (None, None) => Ok(explicit.unwrap_or(self.fallback)),
        }
    }

    fn digest_of(&self, token: &VerificationToken, algorithm: Algorithm) -> Result<String, HashUtilityError> {
        match token {
            VerificationToken::LiteralDigest { digest, .. } => Ok(digest.clone()),
            VerificationToken::FileTarget(path) => {
                Ok(self.computer.compute_hash(path, algorithm)?.hash)
            }
        }
    }
}

impl Default for VerifyEngine {
    fn default() -> Self {
        Self::new(HashComputer::new())
    }
}

fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

// Tests live in tests/hash/verify_tests.rs
