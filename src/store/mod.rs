//! Data store collaborator.
//!
//! The gateway never owns credentials, memberships or team records. It reads
//! them through [`Store`], which keeps the core testable with deterministic
//! fakes and lets deployments plug in any backend.

mod memory;

pub use memory::{Fixtures, MemoryStore, SessionRecord, UserRecord};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use utoipa::ToSchema;

/// Team identifiers are fixed-length external ids.
pub const TEAM_ID_LEN: usize = 25;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub team_id: String,
    pub name: String,
    pub members: u32,
}

#[derive(Debug, Error)]
pub enum Error {
    /// No user matches the email.
    #[error("invalid credentials")]
    UnknownUser,
    /// The user exists but the password does not match.
    #[error("invalid password")]
    InvalidPassword,
    #[error("{0}")]
    Backend(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Verify login credentials and return the session id bound to the user.
    async fn authenticate(&self, email: &str, password: &str) -> Result<String, Error>;

    /// Team ids reachable from a session; empty when the session is unknown.
    async fn teams_for_session(&self, session_id: &str) -> Result<BTreeSet<String>, Error>;

    async fn get_team(&self, team_id: &str) -> Result<Option<Team>, Error>;
}
