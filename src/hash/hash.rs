// Hash computation module
// Provides the algorithm registry and streaming digest computation

use std::fmt;
use std::fs::File;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::HashUtilityError;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

/// Trait for incremental hash state
pub trait Hasher: Send {
    /// Update the hasher with new data
    fn update(&mut self, data: &[u8]);

    /// Finalize the hash and return the result
    fn finalize(self: Box<Self>) -> Vec<u8>;

    /// Get the output size in bytes
    fn output_size(&self) -> usize;
}

// Every supported algorithm implements the RustCrypto `Digest` trait, so one
// wrapper covers all of them.
pub struct DigestHasher<D>(D);

impl<D: Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        Digest::finalize(self.0).to_vec()
    }

    fn output_size(&self) -> usize {
        <D as Digest>::output_size()
    }
}

/// Supported digest algorithms, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl Algorithm {
    /// All algorithms in canonical order. Length-based disambiguation
    /// prefers earlier entries.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
    ];

    /// Display name, e.g. `SHA256`
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha1 => "SHA1",
            Algorithm::Sha224 => "SHA224",
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha384 => "SHA384",
            Algorithm::Sha512 => "SHA512",
        }
    }

    pub fn output_bits(self) -> usize {
        match self {
            Algorithm::Md5 => 128,
            Algorithm::Sha1 => 160,
            Algorithm::Sha224 => 224,
            Algorithm::Sha256 => 256,
            Algorithm::Sha384 => 384,
            Algorithm::Sha512 => 512,
        }
    }

    /// Number of hex characters in a digest of this algorithm
    pub fn hex_length(self) -> usize {
        self.output_bits() / 4
    }

    /// Algorithm whose digests have exactly `len` hex characters
    pub fn from_hex_length(len: usize) -> Option<Algorithm> {
        Self::ALL.into_iter().find(|alg| alg.hex_length() == len)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = HashUtilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashRegistry::lookup(s)
    }
}

/// Information about a hash algorithm
#[derive(Debug, Clone, serde::Serialize)]
pub struct AlgorithmInfo {
    pub name: String,
    pub output_bits: usize,
    pub hex_length: usize,
}

/// Registry for hash algorithms
pub struct HashRegistry;

impl HashRegistry {
    /// Resolve an algorithm name, ignoring case
    pub fn lookup(name: &str) -> Result<Algorithm, HashUtilityError> {
        match name.trim().to_lowercase().as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha1" | "sha-1" => Ok(Algorithm::Sha1),
            "sha224" | "sha-224" => Ok(Algorithm::Sha224),
            "sha256" | "sha-256" => Ok(Algorithm::Sha256),
            "sha384" | "sha-384" => Ok(Algorithm::Sha384),
            "sha512" | "sha-512" => Ok(Algorithm::Sha512),
            _ => Err(HashUtilityError::UnsupportedAlgorithm {
                algorithm: name.to_string(),
            }),
        }
    }

    /// Whether `name` refers to a known algorithm
    pub fn is_algorithm(name: &str) -> bool {
        Self::lookup(name).is_ok()
    }

    /// Get a fresh hasher instance for the specified algorithm
    pub fn new_hasher(algorithm: Algorithm) -> Box<dyn Hasher> {
        match algorithm {
            Algorithm::Md5 => Box::new(DigestHasher(Md5::new())),
            Algorithm::Sha1 => Box::new(DigestHasher(Sha1::new())),
            Algorithm::Sha224 => Box::new(DigestHasher(Sha224::new())),
            Algorithm::Sha256 => Box::new(DigestHasher(Sha256::new())),
            Algorithm::Sha384 => Box::new(DigestHasher(Sha384::new())),
            Algorithm::Sha512 => Box::new(DigestHasher(Sha512::new())),
        }
    }

    /// List all available hash algorithms
    pub fn list_algorithms() -> Vec<AlgorithmInfo> {
        Algorithm::ALL
            .iter()
            .map(|alg| AlgorithmInfo {
                name: alg.name().to_string(),
                output_bits: alg.output_bits(),
                hex_length: alg.hex_length(),
            })
            .collect()
    }
}

/// Result of a hash computation
#[derive(Debug, Clone, serde::Serialize)]
pub struct HashResult {
    pub algorithm: Algorithm,
    pub hash: String, // lowercase hex
    pub file_path: PathBuf,
}

/// Path that stands for standard input in batch mode
pub const STDIN_PATH: &str = "-";

/// Default read buffer (1MB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Largest accepted read buffer (64MB); every parallel worker holds one
pub const MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

// Constants for progress bar
const PROGRESS_BAR_THRESHOLD: u64 = 1024 * 1024 * 1024; // 1GB
const PROGRESS_UPDATE_INTERVAL_MS: u64 = 100;

/// Hash computer with streaming I/O
#[derive(Debug, Clone)]
pub struct HashComputer {
    buffer_size: usize,
    show_progress: bool,
}

impl HashComputer {
    /// Create a new HashComputer with the default buffer size
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            show_progress: false,
        }
    }

    /// Create a new HashComputer with custom buffer size, clamped to `1..=MAX_BUFFER_SIZE`
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.clamp(1, MAX_BUFFER_SIZE),
            show_progress: false,
        }
    }

    /// Show a progress bar for large files when stdout is a terminal
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Compute hash from text string
    pub fn compute_hash_text(&self, text: &str, algorithm: Algorithm) -> HashResult {
        let mut hasher = HashRegistry::new_hasher(algorithm);
        hasher.update(text.as_bytes());

        HashResult {
            algorithm,
            hash: bytes_to_hex(&hasher.finalize()),
            file_path: PathBuf::from("<text>"),
        }
    }

    /// Compute hash of everything readable from `reader`
    pub fn compute_hash_reader<R: Read>(
        &self,
        reader: R,
        algorithm: Algorithm,
    ) -> Result<String, HashUtilityError> {
        let mut hasher = HashRegistry::new_hasher(algorithm);
        self.stream(&mut hasher, reader, "reading", None)?;
        Ok(bytes_to_hex(&hasher.finalize()))
    }

    /// Compute hash for a single file using streaming I/O
    ///
    /// `-` reads standard input. Anything else must be an existing regular file.
    pub fn compute_hash(
        &self,
        path: &Path,
        algorithm: Algorithm,
    ) -> Result<HashResult, HashUtilityError> {
        tracing::debug!("hashing {} with {}", path.display(), algorithm);

        let hash = if path.as_os_str() == STDIN_PATH {
            let stdin = std::io::stdin();
            let mut hasher = HashRegistry::new_hasher(algorithm);
            self.stream(&mut hasher, stdin.lock(), "reading from stdin", None)?;
            bytes_to_hex(&hasher.finalize())
        } else {
            let file = open_regular_file(path)?;
            let file_size = file
                .metadata()
                .map_err(|e| {
                    HashUtilityError::from_io_error(e, "reading metadata of", Some(path.to_path_buf()))
                })?
                .len();

            let should_show_progress = self.show_progress
                && file_size > PROGRESS_BAR_THRESHOLD
                && std::io::stdout().is_terminal();

            let mut hasher = HashRegistry::new_hasher(algorithm);
            if should_show_progress {
                self.stream_with_progress(&mut hasher, file, path, file_size)?;
            } else {
                self.stream(&mut hasher, file, "reading", Some(path))?;
            }
            bytes_to_hex(&hasher.finalize())
        };

        Ok(HashResult {
            algorithm,
            hash,
            file_path: path.to_path_buf(),
        })
    }

    /// Feed `reader` into `hasher` one buffer at a time
    fn stream<R: Read>(
        &self,
        hasher: &mut Box<dyn Hasher>,
        mut reader: R,
        operation: &str,
        path: Option<&Path>,
    ) -> Result<(), HashUtilityError> {
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_error(e, operation, path)),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(())
    }

    /// Same as `stream`, drawing a progress bar while reading
    fn stream_with_progress(
        &self,
        hasher: &mut Box<dyn Hasher>,
        mut file: File,
        path: &Path,
        file_size: u64,
    ) -> Result<(), HashUtilityError> {
        use indicatif::{ProgressBar, ProgressStyle};
        use std::time::{Duration, Instant};

        let pb = ProgressBar::new(file_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(format!("Hashing: {}", path.display()));

        let mut buffer = vec![0u8; self.buffer_size];
        let mut bytes_processed = 0u64;
        let mut last_update = Instant::now();
        let update_interval = Duration::from_millis(PROGRESS_UPDATE_INTERVAL_MS);

        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(read_error(e, "reading", Some(path)));
                }
            };
            hasher.update(&buffer[..bytes_read]);
            bytes_processed += bytes_read as u64;

            let now = Instant::now();
            if now.duration_since(last_update) >= update_interval {
                pb.set_position(bytes_processed);
                last_update = now;
            }
        }

        pb.finish_and_clear();

        Ok(())
    }
}

impl Default for HashComputer {
    fn default() -> Self {
        Self::new()
    }
}

/// Open `path` for reading, rejecting anything that is not a regular file
pub fn open_regular_file(path: &Path) -> Result<File, HashUtilityError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| HashUtilityError::from_io_error(e, "opening", Some(path.to_path_buf())))?;
    if !metadata.is_file() {
        return Err(HashUtilityError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    File::open(path).map_err(|e| HashUtilityError::from_io_error(e, "opening", Some(path.to_path_buf())))
}

fn read_error(err: std::io::Error, operation: &str, path: Option<&Path>) -> HashUtilityError {
    HashUtilityError::from_io_error(err, operation, path.map(Path::to_path_buf))
}

/// Convert bytes to lowercase hexadecimal string
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// Tests live in tests/hash/hash_tests.rs
