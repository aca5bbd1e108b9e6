//! # Teamgate
//!
//! `teamgate` is a backend-for-frontend session gateway. A browser-facing BFF
//! calls it to log users in and to read team records on their behalf.
//!
//! ## Sessions
//!
//! `POST /api/v1/login` checks an email and password against the [`store`]
//! and returns an HS256 token carrying the session id the store bound to the
//! user. The token travels in an `invision_jwt` cookie, in the response body
//! (`?jwtbody`) or both (`?jwtboth`). Nothing is kept server side: expiry,
//! issuer and signature are all checked from the token itself.
//!
//! ## Team access
//!
//! `GET /api/v1/teams/{team_id}` decodes the session cookie and asks the store
//! which teams the session belongs to. By default any session with at least
//! one team may read any existing team; `--require-team-membership` restricts
//! reads to the session's own teams.
//!
//! Both routes only answer callers sending the allow-listed `Calling-Service`
//! header.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_hash_is_never_empty() {
        assert!(!GIT_COMMIT_HASH.is_empty());
    }
}
