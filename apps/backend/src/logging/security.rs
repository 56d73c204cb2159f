//! Structured security events.
//!
//! Each event carries a stable `event` name so operators can alert on it
//! without parsing messages. Emails always go through `Redacted`.

use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A password login was rejected.
pub fn login_failed(reason: &str, email: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email.unwrap_or("")),
        reason,
        "Authentication failure"
    );
}

/// An authenticated subject tried to mutate a resource it does not own.
pub fn access_denied(subject: &str, resource: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_ACCESS_DENIED",
        %trace_id,
        subject,
        resource,
        "Ownership check failed"
    );
}

/// The external identity flow was aborted.
pub fn oauth_failed(stage: &str, reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_OAUTH_FAILED",
        %trace_id,
        stage,
        reason = %Redacted(reason),
        "External login failure"
    );
}
