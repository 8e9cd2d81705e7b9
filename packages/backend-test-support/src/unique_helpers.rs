//! Test helpers for generating unique test data
//!
//! This module provides utilities to help generate unique test data using ULIDs
//! to ensure test isolation and avoid conflicts between test runs.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("clip");
/// let id2 = unique_str("clip");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("clip-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique idempotency key.
///
/// Keys stay well under the 128 character limit enforced on commands.
///
/// ```
/// use backend_test_support::unique_helpers::unique_idempotency_key;
///
/// let key = unique_idempotency_key();
/// assert!(key.starts_with("idem-"));
/// assert!(key.len() <= 128);
/// ```
pub fn unique_idempotency_key() -> String {
    unique_str("idem")
}

/// Generate a unique clip reference that looks like an uploaded video URL.
pub fn unique_clip_ref() -> String {
    format!("https://clips.example.test/{}.mp4", Ulid::new())
}
