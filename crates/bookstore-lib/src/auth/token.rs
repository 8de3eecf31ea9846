// ============================
// bookstore-lib/src/auth/token.rs
// ============================
//! Signed session token codec.
//!
//! Tokens are HS256 JWTs carrying exactly two claims: the account id
//! (`userId`) and the expiry (`exp`, Unix seconds). The codec never reads a
//! global clock — `now` is always passed in, which keeps expiry behavior
//! testable and keeps verification a pure computation.
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userId")]
    user_id: i64,
    exp: i64,
}

/// Internal verification failure. Callers collapse all three into one
/// externally visible rejection; the distinction exists for logging.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token structure could not be parsed")]
    Malformed,
    #[error("token signature or algorithm rejected")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Issues and verifies session tokens with a symmetric secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        // Only HS256 is accepted on decode. A token announcing any other
        // algorithm fails verification outright.
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller-supplied clock.
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Issue a token for `user_id`, expiring `ttl` after `now`.
    pub fn issue(&self, user_id: i64, now: DateTime<Utc>) -> anyhow::Result<String> {
        let claims = Claims {
            user_id,
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify a token at time `now` and return the embedded account id.
    /// A token is valid for `issue_time <= now < issue_time + ttl`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<i64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-signing-secret";
    const TTL: u64 = 3600;

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, TTL)
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let codec = codec();
        let now = Utc::now();

        let token = codec.issue(42, now).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec.verify(&token, now).unwrap(), 42);

        // Verifying twice yields the same identity; no state mutates.
        assert_eq!(codec.verify(&token, now).unwrap(), 42);
    }

    #[test]
    fn test_expiry_boundaries() {
        let codec = codec();
        let issued = Utc::now();
        let token = codec.issue(1, issued).unwrap();

        // Valid right up to (but not including) issued + ttl.
        let almost = issued + Duration::seconds(TTL as i64 - 1);
        assert_eq!(codec.verify(&token, almost).unwrap(), 1);

        // Exactly at expiry it is already invalid.
        let at_expiry = issued + Duration::seconds(TTL as i64);
        assert_eq!(codec.verify(&token, at_expiry), Err(TokenError::Expired));

        let later = issued + Duration::seconds(TTL as i64 + 600);
        assert_eq!(codec.verify(&token, later), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let codec = codec();
        let now = Utc::now();
        let token = codec.issue(7, now).unwrap();

        // Flip one character in the signature segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let sig = parts[2].clone();
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        parts[2] = format!("{}{}", flipped, &sig[1..]);
        let tampered = parts.join(".");

        assert_eq!(
            codec.verify(&tampered, now),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_tampered_claims_are_rejected() {
        let codec = codec();
        let now = Utc::now();
        let token = codec.issue(7, now).unwrap();

        // Re-encode the claims segment with a different user id but keep
        // the original signature.
        let parts: Vec<&str> = token.split('.').collect();
        let other = codec.issue(8, now).unwrap();
        let other_claims = other.split('.').nth(1).unwrap();
        let forged = format!("{}.{}.{}", parts[0], other_claims, parts[2]);

        assert_eq!(codec.verify(&forged, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let ours = codec();
        let theirs = TokenCodec::new(b"a-different-secret", TTL);
        let now = Utc::now();

        let token = theirs.issue(7, now).unwrap();
        assert_eq!(ours.verify(&token, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_unexpected_algorithm_is_rejected() {
        // Same secret, but signed with HS384: verification must fail on the
        // algorithm, not fall through to the signature check.
        let now = Utc::now();
        let claims = Claims {
            user_id: 7,
            exp: (now + Duration::seconds(3600)).timestamp(),
        };
        let hs384 = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec().verify(&hs384, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_garbage_tokens_are_malformed() {
        let codec = codec();
        let now = Utc::now();

        assert_eq!(codec.verify("", now), Err(TokenError::Malformed));
        assert_eq!(codec.verify("not-a-jwt", now), Err(TokenError::Malformed));
        assert_eq!(
            codec.verify("onlytwo.segments", now),
            Err(TokenError::Malformed)
        );
    }
}
