//! Error taxonomy shared by the symbol stores, the marker reader and the merge engine.
//!
//! | Kind | Meaning | Typical handling |
//! |------|---------|------------------|
//! | `NotFound` | type, marker or property does not exist | swallowed during discovery |
//! | `DuplicateMember` | member copy collides with an existing member | counted as ignored |
//! | `Malformed` | undecodable type file or ill-typed marker property | logged, treated as absent |
//! | `Io` | reading or writing a type file failed | logged per target |

use std::path::Path;

/// Structured error for compiled-type loading and mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeaveError {
    /// A referenced type, marker or property does not exist.
    NotFound {
        /// Qualified name (or `marker.property`) that was looked up
        name: String,
    },

    /// A member with the same identity is already declared on the owner.
    DuplicateMember {
        /// Qualified name of the type receiving the member
        owner: String,
        /// Member identity (name, or name plus descriptor)
        member: String,
    },

    /// Content exists but cannot be interpreted.
    Malformed {
        /// What was being read (file path, `marker.property`, ...)
        context: String,
        /// Why it was rejected
        reason: String,
    },

    /// Filesystem access failed.
    Io {
        /// Path that was being read or written
        path: String,
        /// Underlying error message
        reason: String,
    },
}

impl WeaveError {
    pub fn not_found(name: impl Into<String>) -> Self {
        WeaveError::NotFound { name: name.into() }
    }

    pub fn duplicate(owner: impl Into<String>, member: impl Into<String>) -> Self {
        WeaveError::DuplicateMember {
            owner: owner.into(),
            member: member.into(),
        }
    }

    pub fn malformed(context: impl Into<String>, reason: impl ToString) -> Self {
        WeaveError::Malformed {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        WeaveError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WeaveError::NotFound { .. })
    }

    pub fn is_duplicate_member(&self) -> bool {
        matches!(self, WeaveError::DuplicateMember { .. })
    }

    /// Short kind label used in structured log fields and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            WeaveError::NotFound { .. } => "not_found",
            WeaveError::DuplicateMember { .. } => "duplicate_member",
            WeaveError::Malformed { .. } => "malformed",
            WeaveError::Io { .. } => "io",
        }
    }
}

impl std::fmt::Display for WeaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeaveError::NotFound { name } => write!(f, "NotFound: {}", name),
            WeaveError::DuplicateMember { owner, member } => {
                write!(f, "DuplicateMember: {} already declares {}", owner, member)
            }
            WeaveError::Malformed { context, reason } => {
                write!(f, "Malformed {}: {}", context, reason)
            }
            WeaveError::Io { path, reason } => write!(f, "IOFailure at {}: {}", path, reason),
        }
    }
}

impl std::error::Error for WeaveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_kind() {
        let err = WeaveError::duplicate("def.lib.A", "foo");
        assert_eq!(err.to_string(), "DuplicateMember: def.lib.A already declares foo");
        assert!(err.is_duplicate_member());
        assert_eq!(err.kind(), "duplicate_member");

        let err = WeaveError::not_found("def.lib.B");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "NotFound: def.lib.B");
    }
}
