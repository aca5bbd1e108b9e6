use crate::{
    auth::{AccessAuthorizer, AccessPolicy, CredentialVerifier, SessionIssuer, TokenCodec},
    store::Store,
};
use std::sync::Arc;

/// Allow-listed caller when none is configured.
pub const DEFAULT_CALLING_SERVICE: &str = "example-bff";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Value the `Calling-Service` header must carry.
    pub calling_service: String,
    /// Add `Secure` to the session cookie.
    pub cookie_secure: bool,
    pub access_policy: AccessPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            calling_service: DEFAULT_CALLING_SERVICE.to_string(),
            cookie_secure: false,
            access_policy: AccessPolicy::default(),
        }
    }
}

/// Shared request state: the login and team-access flows over one store and key.
pub struct Gateway {
    issuer: SessionIssuer,
    authorizer: AccessAuthorizer,
    config: GatewayConfig,
}

impl Gateway {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, codec: TokenCodec, config: GatewayConfig) -> Self {
        let codec = Arc::new(codec);
        Self {
            issuer: SessionIssuer::new(CredentialVerifier::new(store.clone()), codec.clone()),
            authorizer: AccessAuthorizer::new(store, codec, config.access_policy),
            config,
        }
    }

    #[must_use]
    pub const fn issuer(&self) -> &SessionIssuer {
        &self.issuer
    }

    #[must_use]
    pub const fn authorizer(&self) -> &AccessAuthorizer {
        &self.authorizer
    }

    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
