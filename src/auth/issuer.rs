//! Login flow: validate credentials, sign a session token, pick its transport.

use super::{
    cookie::SessionCookie,
    credentials::{AuthResult, CredentialVerifier, Credentials},
    token::{SessionClaims, SigningError, TokenCodec},
};
use regex::Regex;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful and session created";

/// Where the issued token goes in the login response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportMode {
    #[default]
    CookieOnly,
    BodyOnly,
    Both,
}

impl TransportMode {
    /// `both` wins when both flags are set.
    #[must_use]
    pub const fn from_flags(body: bool, both: bool) -> Self {
        if both {
            Self::Both
        } else if body {
            Self::BodyOnly
        } else {
            Self::CookieOnly
        }
    }

    #[must_use]
    pub const fn sets_cookie(self) -> bool {
        matches!(self, Self::CookieOnly | Self::Both)
    }

    #[must_use]
    pub const fn returns_body(self) -> bool {
        matches!(self, Self::BodyOnly | Self::Both)
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// "ok" on success, "error" on failure.
    pub status: String,
    pub message: String,
    /// Present only when the token was requested in the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
}

/// A successful login.
#[derive(Debug)]
pub struct IssuedSession {
    pub claims: SessionClaims,
    pub body: LoginResponse,
    pub cookie: Option<SessionCookie>,
}

#[derive(Debug, Error)]
pub enum LoginError {
    /// Rejected before the store is consulted.
    #[error("Invalid request: {0}")]
    BadRequest(&'static str),
    /// Unknown email and wrong password are indistinguishable to the caller.
    #[error("Unauthorized: invalid credentials")]
    InvalidCredentials,
    #[error("Unexpected server error: {0}")]
    Store(String),
    #[error("Unexpected server error: {0}")]
    Signing(#[from] SigningError),
}

impl LoginError {
    /// Rejections are caller errors; everything else is a server failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::BadRequest(_) | Self::InvalidCredentials)
    }
}

/// Basic address shape check, run before any store call.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

pub struct SessionIssuer {
    verifier: CredentialVerifier,
    codec: Arc<TokenCodec>,
}

impl SessionIssuer {
    #[must_use]
    pub fn new(verifier: CredentialVerifier, codec: Arc<TokenCodec>) -> Self {
        Self { verifier, codec }
    }

    /// Authenticate `credentials` and issue a session token at `now`.
    ///
    /// # Errors
    /// - [`LoginError::BadRequest`] for missing or malformed credentials,
    /// - [`LoginError::InvalidCredentials`] if the store rejects them,
    /// - [`LoginError::Store`] or [`LoginError::Signing`] on server failures.
    #[instrument(skip(self, credentials))]
    pub async fn login(
        &self,
        credentials: &Credentials,
        mode: TransportMode,
        now: i64,
    ) -> Result<IssuedSession, LoginError> {
        validate(credentials)?;

        let session_id = match self.verifier.verify(credentials).await {
            AuthResult::Success { session_id } => session_id,
            AuthResult::InvalidCredentials | AuthResult::InvalidPassword => {
                debug!("Login rejected");
                return Err(LoginError::InvalidCredentials);
            }
            AuthResult::StoreFailure(reason) => {
                error!("Credential store failure: {reason}");
                return Err(LoginError::Store(reason));
            }
        };

        let claims = SessionClaims::new(session_id, now);
        let token = self.codec.sign(&claims).map_err(|e| {
            error!("Failed to sign session token: {e}");
            LoginError::from(e)
        })?;

        let cookie = mode
            .sets_cookie()
            .then(|| SessionCookie::new(token.clone(), now));
        let body = LoginResponse {
            status: "ok".to_string(),
            message: LOGIN_SUCCESS_MESSAGE.to_string(),
            jwt: mode.returns_body().then_some(token),
        };

        debug!("Session issued");

        Ok(IssuedSession {
            claims,
            body,
            cookie,
        })
    }
}

fn validate(credentials: &Credentials) -> Result<(), LoginError> {
    if credentials.email.is_empty() {
        return Err(LoginError::BadRequest("missing email"));
    }
    if credentials.password.expose_secret().is_empty() {
        return Err(LoginError::BadRequest("missing password"));
    }
    if !valid_email(&credentials.email) {
        return Err(LoginError::BadRequest("invalid email"));
    }
    Ok(())
}
