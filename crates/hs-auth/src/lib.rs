//! hs-auth: Remote login delegation for hypr-sso
//!
//! Verifies the admin login against a remote endpoint and provisions the
//! matching local administrator on first success. The [`LoginHandler`] is
//! the single entry point a host login pipeline calls into.

pub mod login;
pub mod provision;
pub mod remote;

pub use login::{HostError, HostOutcome, LoginFailure, LoginHandler};
pub use provision::UserProvisioner;
pub use remote::{RemoteAuthenticator, RemoteReply, Verification};
