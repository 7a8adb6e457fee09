//! Port resolving bearer tokens to callers.
//!
//! Tokens are minted by the external identity service. Adapters only ever
//! see and store the SHA-256 fingerprint produced by [`token_fingerprint`].

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised while verifying a token.
    pub enum TokenVerifierError {
        /// Backing store could not be reached.
        Connection { message: String } => "token store connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } => "token lookup failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Resolve `token` to the user it was issued to.
    ///
    /// Returns `Ok(None)` for unknown, revoked or expired tokens.
    async fn verify(&self, token: &str) -> Result<Option<UserId>, TokenVerifierError>;
}

/// Lowercase hex SHA-256 fingerprint of a bearer token.
///
/// # Examples
/// ```
/// use greencare::domain::ports::token_fingerprint;
///
/// let fingerprint = token_fingerprint("secret");
/// assert_eq!(fingerprint.len(), 64);
/// assert_eq!(fingerprint, token_fingerprint("secret"));
/// ```
pub fn token_fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
