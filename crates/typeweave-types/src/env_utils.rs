//! Environment variable parsing utilities.
//!
//! Replaces the repeated
//!
//! ```ignore
//! std::env::var("VAR_NAME").ok().filter(|v| !v.trim().is_empty())
//! ```
//!
//! pattern used when the CLI overlays configuration from the environment.
//!
//! # Example
//!
//! ```
//! use typeweave_types::env_utils::{env_bool, env_list, env_string};
//!
//! let strict: bool = env_bool("TYPEWEAVE_STRICT");
//! let namespace: Option<String> = env_string("TYPEWEAVE_NAMESPACE");
//! let unions: Vec<String> = env_list("TYPEWEAVE_BUILTIN_UNIONS");
//! ```

/// Read a non-blank environment variable, trimmed.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check if an environment variable is set to a truthy value.
///
/// `"1"`, `"true"`, `"yes"` and `"on"` (case-insensitive) are truthy.
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Parse a comma-separated environment variable into a vector.
///
/// Blank items are dropped; an unset variable yields an empty vector.
pub fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .ok()
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_string_skips_blank() {
        std::env::set_var("TYPEWEAVE_TEST_BLANK", "   ");
        assert_eq!(env_string("TYPEWEAVE_TEST_BLANK"), None);
        std::env::set_var("TYPEWEAVE_TEST_BLANK", " def ");
        assert_eq!(env_string("TYPEWEAVE_TEST_BLANK").as_deref(), Some("def"));
        std::env::remove_var("TYPEWEAVE_TEST_BLANK");
    }

    #[test]
    fn test_env_bool() {
        std::env::set_var("TYPEWEAVE_TEST_BOOL_ON", "On");
        std::env::set_var("TYPEWEAVE_TEST_BOOL_OFF", "0");
        assert!(env_bool("TYPEWEAVE_TEST_BOOL_ON"));
        assert!(!env_bool("TYPEWEAVE_TEST_BOOL_OFF"));
        assert!(!env_bool("TYPEWEAVE_NONEXISTENT_2"));
        std::env::remove_var("TYPEWEAVE_TEST_BOOL_ON");
        std::env::remove_var("TYPEWEAVE_TEST_BOOL_OFF");
    }

    #[test]
    fn test_env_list() {
        std::env::set_var("TYPEWEAVE_TEST_LIST", "a.B, ,c.D");
        assert_eq!(env_list("TYPEWEAVE_TEST_LIST"), vec!["a.B", "c.D"]);
        assert!(env_list("TYPEWEAVE_NONEXISTENT_3").is_empty());
        std::env::remove_var("TYPEWEAVE_TEST_LIST");
    }
}
