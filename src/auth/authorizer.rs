//! Team access checks for an already issued session token.

use super::{
    cookie::{find_cookie, Cookie, SESSION_COOKIE_NAME},
    token::TokenCodec,
};
use crate::store::{Store, Team, TEAM_ID_LEN};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, instrument};

/// How strictly a session must relate to the team it asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any session with at least one team may read any existing team.
    #[default]
    AnyTeam,
    /// The requested team must be one of the session's teams.
    RequireMembership,
}

impl AccessPolicy {
    #[must_use]
    pub const fn from_flag(require_membership: bool) -> Self {
        if require_membership {
            Self::RequireMembership
        } else {
            Self::AnyTeam
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Invalid request")]
    BadRequest,
    #[error("Invalid session")]
    Unauthenticated,
    #[error("No access")]
    Forbidden,
    #[error("Unexpected server error: {0}")]
    Internal(String),
}

pub struct AccessAuthorizer {
    store: Arc<dyn Store>,
    codec: Arc<TokenCodec>,
    policy: AccessPolicy,
}

impl AccessAuthorizer {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, codec: Arc<TokenCodec>, policy: AccessPolicy) -> Self {
        Self {
            store,
            codec,
            policy,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> AccessPolicy {
        self.policy
    }

    /// Resolve `team_id` for the session carried in `cookies`.
    ///
    /// # Errors
    /// - [`AccessError::BadRequest`] if `team_id` is not a team identifier,
    /// - [`AccessError::Unauthenticated`] if the session cookie is missing or invalid,
    /// - [`AccessError::Forbidden`] if the session may not read the team,
    /// - [`AccessError::Internal`] if the store fails.
    #[instrument(skip(self, cookies))]
    pub async fn authorize(
        &self,
        team_id: &str,
        cookies: &[Cookie],
        now: i64,
    ) -> Result<Team, AccessError> {
        if team_id.chars().count() != TEAM_ID_LEN {
            return Err(AccessError::BadRequest);
        }

        let token = find_cookie(cookies, SESSION_COOKIE_NAME).ok_or_else(|| {
            debug!("No session cookie");
            AccessError::Unauthenticated
        })?;

        let claims = self.codec.decode(token, now).map_err(|e| {
            debug!("Rejected session token: {e}");
            AccessError::Unauthenticated
        })?;

        let teams = self
            .store
            .teams_for_session(&claims.session_id)
            .await
            .map_err(|e| {
                error!("Failed to load teams for session: {e}");
                AccessError::Internal(e.to_string())
            })?;

        if teams.is_empty() {
            debug!("Session has no teams");
            return Err(AccessError::Forbidden);
        }

        if self.policy == AccessPolicy::RequireMembership && !teams.contains(team_id) {
            debug!("Session is not a member of the team");
            return Err(AccessError::Forbidden);
        }

        match self.store.get_team(team_id).await {
            Ok(Some(team)) => Ok(team),
            Ok(None) => {
                debug!("Team not found");
                Err(AccessError::Forbidden)
            }
            Err(e) => {
                error!("Failed to load team: {e}");
                Err(AccessError::Internal(e.to_string()))
            }
        }
    }
}
