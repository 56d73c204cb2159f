//! External identity (OAuth 2.0 authorization-code) flow.
//!
//! [`IdentityProvider`] is the seam to the provider's endpoints; the bridge
//! owns the state check and the mapping to a local account.

pub mod bridge;
pub mod google;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

use super::ExternalFlowError;

pub use bridge::{AuthorizationRequest, ExternalIdentityBridge, ExternalLogin};
pub use google::GoogleProvider;

/// Cookie holding the state issued by `login-google` until the callback.
pub const STATE_COOKIE: &str = "quill_oauth_state";

/// Profile returned by the provider's userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    pub email: String,
    pub name: Option<String>,
    /// Userinfo body as received, forwarded to the client as `userDetail`.
    pub raw: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Consent URL the user agent is redirected to.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for a provider access token.
    async fn exchange_code(&self, code: &str) -> Result<String, ExternalFlowError>;

    async fn fetch_profile(&self, access_token: &str) -> Result<ExternalProfile, ExternalFlowError>;
}

/// 256 bits from the OS generator, base64url without padding.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
