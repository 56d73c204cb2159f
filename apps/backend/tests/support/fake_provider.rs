use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quill_backend::auth::oauth::{ExternalProfile, IdentityProvider};
use quill_backend::ExternalFlowError;

/// Scripted identity provider that counts outbound calls.
#[derive(Default)]
pub struct FakeProvider {
    pub email: String,
    pub name: Option<String>,
    pub fail_profile: bool,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn for_email(email: &str) -> Self {
        Self {
            email: email.to_string(),
            name: Some("Gee Writer".to_string()),
            ..Default::default()
        }
    }

    pub fn failing_profile(email: &str) -> Self {
        Self {
            fail_profile: true,
            ..Self::for_email(email)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn raw_profile(&self) -> String {
        serde_json::json!({ "email": self.email, "name": self.name }).to_string()
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://idp.test/authorize?response_type=code&state={state}")
    }

    async fn exchange_code(&self, code: &str) -> Result<String, ExternalFlowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("access-{code}"))
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<ExternalProfile, ExternalFlowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_profile {
            return Err(ExternalFlowError::ProfileFetchFailed("userinfo returned 401".into()));
        }
        Ok(ExternalProfile {
            email: self.email.clone(),
            name: self.name.clone(),
            raw: self.raw_profile(),
        })
    }
}
