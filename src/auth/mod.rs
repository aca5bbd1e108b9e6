//! Session issuance and verification.
//!
//! Login turns credentials into a signed session token delivered by cookie,
//! response body or both. Later requests present the cookie and are checked
//! against the session's team memberships.

pub mod authorizer;
pub mod cookie;
pub mod credentials;
pub mod issuer;
pub mod token;

#[cfg(test)]
mod test_support;

pub use authorizer::{AccessAuthorizer, AccessError, AccessPolicy};
pub use cookie::{parse_cookies, Cookie, SessionCookie, COOKIE_TTL_SECONDS, SESSION_COOKIE_NAME};
pub use credentials::{AuthResult, CredentialVerifier, Credentials};
pub use issuer::{
    valid_email, IssuedSession, LoginError, LoginResponse, SessionIssuer, TransportMode,
    LOGIN_SUCCESS_MESSAGE,
};
pub use token::{SessionClaims, SigningError, TokenCodec, ISSUER, TOKEN_TTL_SECONDS};
