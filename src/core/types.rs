//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ObjectId`] - Content address of a blob or commit (hex SHA-256)
//! - [`BranchName`] - Validated branch name (tracking refs nest as `remote/branch`)
//! - [`RemoteName`] - Validated remote name (a single path component)
//! - [`FileName`] - Validated working-copy file name
//! - [`UtcTimestamp`] - RFC3339 timestamp
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use graftwork::core::types::{BranchName, ObjectId};
//!
//! let branch = BranchName::new("feature/my-branch").unwrap();
//! let id = ObjectId::hash_of(b"hello");
//! assert_eq!(id.as_str().len(), 64);
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(ObjectId::new("not-a-sha").is_err());
//! # let _ = branch;
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::paths::REPO_DIR_NAME;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid remote name: {0}")]
    InvalidRemoteName(String),

    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),
}

/// Content address of a stored object.
///
/// Ids are the lowercase hex encoding of a SHA-256 digest. Blobs are keyed by
/// the digest of their bytes, commits by the digest of their canonical
/// serialization.
///
/// # Example
///
/// ```
/// use graftwork::core::types::ObjectId;
///
/// let a = ObjectId::hash_of(b"1");
/// let b = ObjectId::hash_of(b"1");
/// assert_eq!(a, b);
/// assert_eq!(a.short(7).len(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Length of a full id in hex characters.
    pub const HEX_LEN: usize = 64;

    /// Create a new validated object id.
    ///
    /// The id is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidObjectId` if the string is not 64 hex characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into().to_ascii_lowercase();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Compute the id of a byte sequence.
    pub fn hash_of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get an abbreviated form of the id.
    ///
    /// Returns the first `len` characters, or the full id if `len` exceeds it.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    fn validate(id: &str) -> Result<(), TypeError> {
        if id.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidObjectId(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidObjectId(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated branch name.
///
/// Branch names map directly onto files under `branches/`, so the rules keep
/// them safe as relative paths:
/// - Cannot be empty, `HEAD`, or `@`
/// - Cannot start with `.`, `-` or `/`, or end with `/` or `.lock`
/// - Cannot contain `..`, `//`, `@{`, whitespace, control characters,
///   or any of `~ ^ : \ ? * [`
///
/// A single `/` is how tracking refs are spelled (`origin/master`).
///
/// # Example
///
/// ```
/// use graftwork::core::types::BranchName;
///
/// let name = BranchName::new("origin/master").unwrap();
/// assert_eq!(name.as_str(), "origin/master");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new(".hidden").is_err());
/// assert!(BranchName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates the rules above.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Create a branch name for a user-created branch.
    ///
    /// User branches are a single path component; `/` is reserved for
    /// tracking refs.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name is invalid or
    /// contains `/`.
    pub fn local(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.contains('/') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain '/'".into(),
            ));
        }
        Self::new(name)
    }

    /// Name of the local ref that tracks `branch` on `remote`.
    pub fn tracking(remote: &RemoteName, branch: &BranchName) -> Self {
        // Both halves are already validated, and a remote name has no '/'.
        Self(format!("{}/{}", remote.as_str(), branch.as_str()))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let invalid = |msg: &str| Err(TypeError::InvalidBranchName(msg.to_string()));

        if name.is_empty() {
            return invalid("branch name cannot be empty");
        }
        if name == "@" || name == "HEAD" {
            return invalid("branch name is reserved");
        }
        if name.starts_with('.') || name.starts_with('-') || name.starts_with('/') {
            return invalid("branch name cannot start with '.', '-' or '/'");
        }
        if name.ends_with('/') || name.ends_with(".lock") {
            return invalid("branch name cannot end with '/' or '.lock'");
        }
        if name.contains("..") || name.contains("//") || name.contains("@{") {
            return invalid("branch name cannot contain '..', '//' or '@{'");
        }

        const INVALID_CHARS: [char; 7] = ['~', '^', ':', '\\', '?', '*', '['];
        for c in name.chars() {
            if INVALID_CHARS.contains(&c) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{c}'"
                )));
            }
            if c.is_whitespace() || c.is_ascii_control() {
                return invalid("branch name cannot contain whitespace or control characters");
            }
        }

        for component in name.split('/') {
            if component.starts_with('.') || component.ends_with(".lock") {
                return invalid("path component cannot start with '.' or end with '.lock'");
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated remote name.
///
/// Remote names follow the branch name rules and additionally may not
/// contain `/`, since they become the first component of tracking refs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteName(String);

impl RemoteName {
    /// Create a new validated remote name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.contains('/') {
            return Err(TypeError::InvalidRemoteName(
                "remote name cannot contain '/'".into(),
            ));
        }
        BranchName::validate(&name).map_err(|e| match e {
            TypeError::InvalidBranchName(msg) => {
                TypeError::InvalidRemoteName(msg.replace("branch", "remote"))
            }
            other => other,
        })?;
        Ok(Self(name))
    }

    /// Get the remote name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RemoteName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RemoteName> for String {
    fn from(name: RemoteName) -> Self {
        name.0
    }
}

impl std::fmt::Display for RemoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated working-copy file name.
///
/// The working copy is flat, so a file name is one plain path component. It
/// cannot be `.` or `..`, and cannot name the repository directory.
///
/// # Example
///
/// ```
/// use graftwork::core::types::FileName;
///
/// assert!(FileName::new("notes.txt").is_ok());
/// assert!(FileName::new(".graft").is_err());
/// assert!(FileName::new(".graft/HEAD").is_err());
/// assert!(FileName::new("../outside.txt").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileName(String);

impl FileName {
    /// Create a new validated file name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidFileName` if the name is empty, `.`, `..`,
    /// the repository directory's name, or contains a path separator or NUL.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let invalid = |msg: &str| Err(TypeError::InvalidFileName(msg.to_string()));

        if name.is_empty() {
            return invalid("file name cannot be empty");
        }
        if name == "." || name == ".." {
            return invalid("file name cannot be '.' or '..'");
        }
        if name == REPO_DIR_NAME {
            return invalid("file name is reserved");
        }
        if name.contains(['/', '\\', '\0']) {
            return invalid("file name cannot contain a path separator or NUL");
        }
        Ok(Self(name))
    }

    /// Get the file name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A UTC timestamp in RFC3339 format.
///
/// # Example
///
/// ```
/// use graftwork::core::types::UtcTimestamp;
///
/// let epoch = UtcTimestamp::epoch();
/// assert_eq!(epoch.to_string(), "1970-01-01T00:00:00+00:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// The Unix epoch, used as the root commit's timestamp.
    pub fn epoch() -> Self {
        Self(chrono::DateTime::<chrono::Utc>::default())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
