//! Credential verification against the store.

use crate::store::{self, Store};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::instrument;

/// Login credentials; the password never appears in `Debug` output.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    /// Credentials match; carries the session id the store bound to the user.
    Success { session_id: String },
    InvalidCredentials,
    InvalidPassword,
    StoreFailure(String),
}

pub struct CredentialVerifier {
    store: Arc<dyn Store>,
}

impl CredentialVerifier {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Ask the store once; failures are never retried.
    #[instrument(skip_all)]
    pub async fn verify(&self, credentials: &Credentials) -> AuthResult {
        match self
            .store
            .authenticate(&credentials.email, credentials.password.expose_secret())
            .await
        {
            Ok(session_id) => AuthResult::Success { session_id },
            Err(store::Error::UnknownUser) => AuthResult::InvalidCredentials,
            Err(store::Error::InvalidPassword) => AuthResult::InvalidPassword,
            Err(store::Error::Backend(reason)) => AuthResult::StoreFailure(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{Login, StubStore};

    async fn verify_with(login: Login) -> (AuthResult, usize) {
        let store = Arc::new(StubStore::new(login));
        let verifier = CredentialVerifier::new(store.clone());
        let result = verifier
            .verify(&Credentials::new("user@example.com", "secret"))
            .await;
        (result, store.auth_calls())
    }

    #[tokio::test]
    async fn maps_every_store_outcome() {
        assert_eq!(
            verify_with(Login::Session("s-1")).await,
            (
                AuthResult::Success {
                    session_id: "s-1".to_string()
                },
                1
            )
        );
        assert_eq!(
            verify_with(Login::UnknownUser).await,
            (AuthResult::InvalidCredentials, 1)
        );
        assert_eq!(
            verify_with(Login::WrongPassword).await,
            (AuthResult::InvalidPassword, 1)
        );
        assert_eq!(
            verify_with(Login::Backend("database error")).await,
            (AuthResult::StoreFailure("database error".to_string()), 1)
        );
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("a@example.com", "hunter2"));
        assert!(rendered.contains("a@example.com"));
        assert!(!rendered.contains("hunter2"));
    }
}
