//! HS256 session tokens.
//!
//! A token is a compact JWT whose claims carry the session id. Decoding checks
//! the signature before anything in the claims is trusted, then the issuer,
//! then the expiry.

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const ISSUER: &str = "InVision";
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
/// 256 bits.
pub const MIN_SECRET_BYTES: usize = 32;

const ALG: &str = "HS256";
const TYP: &str = "JWT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    #[serde(rename = "iss")]
    pub issuer: String,
    pub session_id: String,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl SessionClaims {
    #[must_use]
    pub fn new(session_id: impl Into<String>, now: i64) -> Self {
        Self {
            issuer: ISSUER.to_string(),
            session_id: session_id.into(),
            issued_at: now,
            expires_at: now.saturating_add(TOKEN_TTL_SECONDS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct TokenHeader {
    alg: String,
    typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kid: Option<String>,
}

impl TokenHeader {
    fn hs256(kid: Option<String>) -> Self {
        Self {
            alg: ALG.to_string(),
            typ: TYP.to_string(),
            kid,
        }
    }
}

/// Reasons a presented token is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("invalid issuer")]
    WrongIssuer,
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("signing secret must be at least {MIN_SECRET_BYTES} bytes")]
    WeakSecret,
    #[error("invalid signing key")]
    InvalidKey,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
}

/// Signs and verifies session tokens with a shared secret.
///
/// The codec is immutable after construction and safe to share across tasks.
#[derive(Clone)]
pub struct TokenCodec {
    mac: HmacSha256,
    key_id: Option<String>,
}

impl TokenCodec {
    /// Build a codec from the injected signing secret.
    ///
    /// `key_id` is written to the token header and must match on decode, so a
    /// rotated key rejects tokens signed under the previous id.
    ///
    /// # Errors
    /// Returns [`SigningError::WeakSecret`] if the secret is shorter than
    /// [`MIN_SECRET_BYTES`].
    pub fn new(secret: &SecretString, key_id: Option<String>) -> Result<Self, SigningError> {
        let secret = secret.expose_secret().as_bytes();
        if secret.len() < MIN_SECRET_BYTES {
            return Err(SigningError::WeakSecret);
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| SigningError::InvalidKey)?;

        Ok(Self { mac, key_id })
    }

    /// Sign fresh claims for `session_id` issued at `now` (Unix seconds).
    ///
    /// # Errors
    /// Returns an error if the header or claims cannot be serialized.
    pub fn encode(&self, session_id: &str, now: i64) -> Result<String, SigningError> {
        self.sign(&SessionClaims::new(session_id, now))
    }

    /// Sign an explicit claim set.
    ///
    /// # Errors
    /// Returns an error if the header or claims cannot be serialized.
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, SigningError> {
        let header = TokenHeader::hs256(self.key_id.clone());
        let signing_input = format!("{}.{}", b64e_json(&header)?, b64e_json(claims)?);

        let mut mac = self.mac.clone();
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{signing_input}.{}",
            Base64UrlUnpadded::encode_string(&signature)
        ))
    }

    /// Verify `token` and return its claims if it is still valid at `now`.
    ///
    /// # Errors
    /// - [`Error::Malformed`] if the token is not three base64url JSON segments,
    /// - [`Error::BadSignature`] if the algorithm, key id or signature do not match,
    /// - [`Error::WrongIssuer`] if the issuer is not [`ISSUER`],
    /// - [`Error::Expired`] if `now` is at or past the expiry.
    pub fn decode(&self, token: &str, now: i64) -> Result<SessionClaims, Error> {
        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(Error::Malformed)?;
        let claims_b64 = parts.next().ok_or(Error::Malformed)?;
        let signature_b64 = parts.next().ok_or(Error::Malformed)?;
        if parts.next().is_some() {
            return Err(Error::Malformed);
        }

        let header: TokenHeader = b64d_json(header_b64)?;
        if header.alg != ALG || header.kid != self.key_id {
            return Err(Error::BadSignature);
        }

        let signature =
            Base64UrlUnpadded::decode_vec(signature_b64).map_err(|_| Error::BadSignature)?;
        let mut mac = self.mac.clone();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| Error::BadSignature)?;

        let claims: SessionClaims = b64d_json(claims_b64)?;
        if claims.issuer != ISSUER {
            return Err(Error::WrongIssuer);
        }
        if now >= claims.expires_at {
            return Err(Error::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("key", &"***")
            .field("key_id", &self.key_id)
            .finish()
    }
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, SigningError> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    let bytes = Base64UrlUnpadded::decode_vec(s).map_err(|_| Error::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| Error::Malformed)
}
