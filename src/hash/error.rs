// Centralized error handling module
// Error kinds for digesting, verification, CLI routing and configuration

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for hsh
/// Carries the path and operation involved so messages stay actionable
#[derive(Debug)]
pub enum HashUtilityError {
    /// File system errors with context
    FileNotFound { path: PathBuf },
    PermissionDenied { path: PathBuf, operation: String },
    IoError { path: Option<PathBuf>, operation: String, source: io::Error },

    /// Hash computation errors
    UnsupportedAlgorithm { algorithm: String },

    /// Verification errors
    AmbiguousComparison { reason: String },

    /// CLI errors
    InvalidArguments { message: String },
    MissingRequiredArgument { argument: String },

    /// Configuration errors
    ConfigError { path: Option<PathBuf>, reason: String },
}

impl fmt::Display for HashUtilityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            // File system errors
            HashUtilityError::FileNotFound { path } => {
                writeln!(f, "File not found: {}", path.display())?;
                write!(f, "Suggestion: Check that the path exists and is a regular file")
            }
            HashUtilityError::PermissionDenied { path, operation } => {
                writeln!(f, "Permission denied while {} file: {}", operation, path.display())?;
                write!(f, "Suggestion: Check file permissions or run with appropriate privileges")
            }
            HashUtilityError::IoError { path, operation, source } => {
                if let Some(p) = path {
                    writeln!(f, "I/O error while {} file {}: {}", operation, p.display(), source)?;
                } else {
                    writeln!(f, "I/O error while {}: {}", operation, source)?;
                }
                write!(f, "Suggestion: Check that the device is readable and retry")
            }

            // Hash computation errors
            HashUtilityError::UnsupportedAlgorithm { algorithm } => {
                writeln!(f, "Unsupported hash algorithm: {}", algorithm)?;
                write!(f, "Suggestion: Use one of md5, sha1, sha224, sha256, sha384, sha512")
            }

            // Verification errors
            HashUtilityError::AmbiguousComparison { reason } => {
                writeln!(f, "Cannot compare: {}", reason)?;
                write!(f, "Suggestion: Supply digests of the same algorithm, or name the algorithm with 'check <algorithm>'")
            }

            // CLI errors
            HashUtilityError::InvalidArguments { message } => {
                writeln!(f, "Invalid arguments: {}", message)?;
                write!(f, "Suggestion: Run with --help to see usage information")
            }
            HashUtilityError::MissingRequiredArgument { argument } => {
                writeln!(f, "Missing required argument: {}", argument)?;
                write!(f, "Suggestion: Run with --help to see required arguments")
            }

            // Configuration errors
            HashUtilityError::ConfigError { path, reason } => {
                if let Some(p) = path {
                    writeln!(f, "Invalid configuration in {}: {}", p.display(), reason)?;
                } else {
                    writeln!(f, "Invalid configuration: {}", reason)?;
                }
                write!(f, "Suggestion: Fix or remove the configuration file")
            }
        }
    }
}

impl std::error::Error for HashUtilityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HashUtilityError::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl HashUtilityError {
    /// Create an error from an io::Error with context about the operation and optional path
    pub fn from_io_error(err: io::Error, operation: &str, path: Option<PathBuf>) -> Self {
        match (err.kind(), path) {
            (io::ErrorKind::NotFound, Some(p)) => HashUtilityError::FileNotFound { path: p },
            (io::ErrorKind::PermissionDenied, Some(p)) => HashUtilityError::PermissionDenied {
                path: p,
                operation: operation.to_string(),
            },
            (_, path) => HashUtilityError::IoError {
                path,
                operation: operation.to_string(),
                source: err,
            },
        }
    }

    /// First line of the message, without the suggestion
    pub fn summary(&self) -> String {
        self.to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Whether this error stems from the shape of the command rather than from a file
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            HashUtilityError::UnsupportedAlgorithm { .. }
                | HashUtilityError::InvalidArguments { .. }
                | HashUtilityError::MissingRequiredArgument { .. }
        )
    }
}

// Default From implementation for io::Error (without context)
impl From<io::Error> for HashUtilityError {
    fn from(err: io::Error) -> Self {
        HashUtilityError::from_io_error(err, "unknown operation", None)
    }
}
