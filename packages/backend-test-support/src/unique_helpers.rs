//! Unique test data, so tests sharing a store never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new())
}

/// Lowercase `{prefix}-{ulid}@example.test`, already in normalized form.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let a = unique_email("writer");
/// assert_ne!(a, unique_email("writer"));
/// assert!(a.starts_with("writer-"));
/// assert_eq!(a, a.to_lowercase());
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.test", Ulid::new()).to_lowercase()
}
