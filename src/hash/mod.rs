// Hash core
// Algorithm registry, streaming digests, batch hashing and checksum verification

pub mod batch;
pub mod error;
pub mod hash;
pub mod verify;

// Re-export commonly used types for convenience
pub use batch::{BatchEngine, BatchStats, FileOutcome};
pub use error::HashUtilityError;
pub use hash::{Algorithm, AlgorithmInfo, HashComputer, HashRegistry, HashResult, Hasher};
pub use verify::{ComparisonDetail, ComparisonOutcome, VerificationToken, VerifyEngine};
