//! Port for signing and verifying bearer tokens.

use crate::domain::Claims;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codecs.
    pub enum TokenCodecError {
        /// The token was well formed but its `exp` has passed.
        Expired => "token has expired",
        /// Signature, structure or claims are invalid.
        Invalid { message: String } => "token is invalid: {message}",
        /// A token could not be produced.
        Encoding { message: String } => "token could not be issued: {message}",
    }
}

/// Issues and verifies signed claims.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign `claims` into a compact token.
    fn issue(&self, claims: &Claims) -> Result<String, TokenCodecError>;

    /// Verify signature and expiry, returning the claims.
    fn decode(&self, token: &str) -> Result<Claims, TokenCodecError>;
}
