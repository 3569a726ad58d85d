//! Credential hashing and bearer token adapters.

mod argon2_hasher;
mod jwt_codec;

pub use argon2_hasher::Argon2Hasher;
pub use jwt_codec::JwtCodec;
