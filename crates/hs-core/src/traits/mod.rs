//! Core trait definitions

mod store;
mod verifier;

pub use store::UserStore;
pub use verifier::CredentialVerifier;
