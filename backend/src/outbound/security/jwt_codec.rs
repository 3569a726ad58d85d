//! HS256 bearer tokens via `jsonwebtoken`.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use zeroize::Zeroizing;

use crate::domain::Claims;
use crate::domain::ports::{TokenCodec, TokenCodecError};

/// Signs and verifies tokens with a shared secret.
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec").finish_non_exhaustive()
    }
}

impl JwtCodec {
    /// Build a codec from the signing secret. Expiry is checked without
    /// leeway.
    pub fn new(secret: &Zeroizing<Vec<u8>>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenCodec for JwtCodec {
    fn issue(&self, claims: &Claims) -> Result<String, TokenCodecError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|err| TokenCodecError::encoding(err.to_string()))
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenCodecError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenCodecError::expired(),
                _ => TokenCodecError::invalid(err.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn codec() -> JwtCodec {
        JwtCodec::new(&Zeroizing::new(b"test-signing-secret".to_vec()))
    }

    fn claims(offset: TimeDelta) -> Claims {
        Claims {
            user: "ada".to_owned(),
            admin: true,
            exp: (Utc::now() + offset).timestamp(),
        }
    }

    #[rstest]
    fn issued_tokens_decode_to_their_claims(codec: JwtCodec) {
        let original = claims(TimeDelta::minutes(30));
        let token = codec.issue(&original).expect("issue");

        assert_eq!(codec.decode(&token).expect("decode"), original);
    }

    #[rstest]
    fn expired_tokens_are_distinguished(codec: JwtCodec) {
        let token = codec.issue(&claims(TimeDelta::minutes(-5))).expect("issue");

        assert_eq!(codec.decode(&token), Err(TokenCodecError::expired()));
    }

    #[rstest]
    fn tokens_signed_elsewhere_are_invalid(codec: JwtCodec) {
        let other = JwtCodec::new(&Zeroizing::new(b"another-secret".to_vec()));
        let token = other.issue(&claims(TimeDelta::minutes(30))).expect("issue");

        assert!(matches!(
            codec.decode(&token),
            Err(TokenCodecError::Invalid { .. })
        ));
        assert!(matches!(
            codec.decode("not.a.token"),
            Err(TokenCodecError::Invalid { .. })
        ));
    }
}
