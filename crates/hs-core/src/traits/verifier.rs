//! Credential verifier trait

use async_trait::async_trait;

use crate::types::Credentials;

/// Authority that decides whether a credential pair is valid
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns true only when the authority positively accepted the pair.
    /// Any transport or protocol problem counts as rejection.
    async fn verify(&self, credentials: &Credentials) -> bool;
}
