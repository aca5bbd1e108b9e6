//! Fixture-backed store used for local runs and tests.

use super::{Error, Store, Team};
use anyhow::{Context, Result};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};
use tracing::{debug, instrument};

const DEMO_FIXTURES: &str = include_str!("fixtures.json");

/// Verified against when the email is unknown so both failure paths pay for Argon2.
/// Same parameters as the fixture hashes; no password matches it.
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGVhbWdhdGUtZHVtbXk$vK4NF72MD5m9DDMM7XV3a5dgoELaF5TT1/mHs+po+5g";

#[derive(Deserialize, Debug, Clone)]
pub struct UserRecord {
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub session_id: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SessionRecord {
    pub session_id: String,
    #[serde(default)]
    pub teams: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Fixtures {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl Fixtures {
    /// Built-in demo accounts, sessions and teams.
    ///
    /// # Errors
    /// Returns an error if the embedded fixture file is not valid JSON.
    pub fn demo() -> Result<Self> {
        Self::from_json(DEMO_FIXTURES).context("Built-in fixtures are invalid")
    }

    /// # Errors
    /// Returns an error if `json` does not describe a fixture set.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse fixtures JSON")
    }

    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures file: {}", path.display()))?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: HashMap<String, UserRecord>,
    sessions: HashMap<String, BTreeSet<String>>,
    teams: HashMap<String, Team>,
    verifications: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new(fixtures: Fixtures) -> Self {
        let users = fixtures
            .users
            .into_iter()
            .map(|user| (user.email.clone(), user))
            .collect();
        let sessions = fixtures
            .sessions
            .into_iter()
            .map(|session| (session.session_id, session.teams.into_iter().collect()))
            .collect();
        let teams = fixtures
            .teams
            .into_iter()
            .map(|team| (team.team_id.clone(), team))
            .collect();

        Self {
            users,
            sessions,
            teams,
            verifications: AtomicUsize::new(0),
        }
    }

    /// Number of Argon2 verifications run so far, dummy ones included.
    #[must_use]
    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::Relaxed)
    }

    // Argon2 is CPU bound; keep it off the async workers.
    async fn check_password(&self, password: &str, hash: &str) -> Result<bool, Error> {
        self.verifications.fetch_add(1, Ordering::Relaxed);
        let hash = hash.to_string();
        let password = SecretString::from(password.to_string());
        tokio::task::spawn_blocking(move || verify_password(password.expose_secret(), &hash))
            .await
            .map_err(|e| Error::Backend(format!("password verification task failed: {e}")))?
    }
}

#[async_trait]
impl Store for MemoryStore {
    #[instrument(skip(self, password))]
    async fn authenticate(&self, email: &str, password: &str) -> Result<String, Error> {
        let Some(user) = self.users.get(email) else {
            // outcome ignored, only the elapsed time matters
            let _ = self.check_password(password, DUMMY_PASSWORD_HASH).await;
            debug!("User not found");
            return Err(Error::UnknownUser);
        };

        if self.check_password(password, &user.password_hash).await? {
            Ok(user.session_id.clone())
        } else {
            debug!("Password mismatch");
            Err(Error::InvalidPassword)
        }
    }

    async fn teams_for_session(&self, session_id: &str) -> Result<BTreeSet<String>, Error> {
        Ok(self.sessions.get(session_id).cloned().unwrap_or_default())
    }

    async fn get_team(&self, team_id: &str) -> Result<Option<Team>, Error> {
        Ok(self.teams.get(team_id).cloned())
    }
}

/// Returns `Ok(false)` on mismatch; a malformed stored hash is a backend error.
fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| Error::Backend(format!("invalid stored password hash: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Backend(format!("password verification failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION_ID: &str = "56906974-f924-4a1c-889e-a1dd2f395ac2";

    fn demo_store() -> Result<MemoryStore> {
        Ok(MemoryStore::new(Fixtures::demo()?))
    }

    #[tokio::test]
    async fn authenticate_returns_bound_session() -> Result<()> {
        let store = demo_store()?;
        let session_id = store
            .authenticate("user@example.com", "electric cat festival")
            .await?;
        assert_eq!(session_id, SESSION_ID);
        Ok(())
    }

    #[tokio::test]
    async fn authenticate_distinguishes_unknown_user_and_bad_password() -> Result<()> {
        let store = demo_store()?;

        let unknown = store.authenticate("bad@example.com", "bad password").await;
        assert!(matches!(unknown, Err(Error::UnknownUser)));

        let wrong = store.authenticate("user@example.com", "bad password").await;
        assert!(matches!(wrong, Err(Error::InvalidPassword)));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_still_runs_hash_verification() -> Result<()> {
        let store = demo_store()?;
        assert_eq!(store.verifications(), 0);

        let unknown = store.authenticate("nobody@example.com", "bad password").await;
        assert!(matches!(unknown, Err(Error::UnknownUser)));
        assert_eq!(store.verifications(), 1);

        let wrong = store.authenticate("user@example.com", "bad password").await;
        assert!(matches!(wrong, Err(Error::InvalidPassword)));
        assert_eq!(store.verifications(), 2);
        Ok(())
    }

    #[test]
    fn dummy_hash_parses_and_never_matches() {
        for password in ["", "bad password", "electric cat festival"] {
            assert!(matches!(verify_password(password, DUMMY_PASSWORD_HASH), Ok(false)));
        }
    }

    #[tokio::test]
    async fn malformed_hash_is_a_backend_error() -> Result<()> {
        let store = MemoryStore::new(Fixtures::from_json(
            r#"{"users":[{"email":"a@example.com","password_hash":"plain","session_id":"s"}]}"#,
        )?);
        let result = store.authenticate("a@example.com", "plain").await;
        assert!(matches!(result, Err(Error::Backend(_))));
        Ok(())
    }

    #[tokio::test]
    async fn session_teams_and_team_lookup() -> Result<()> {
        let store = demo_store()?;

        let teams = store.teams_for_session(SESSION_ID).await?;
        assert_eq!(teams.len(), 2);
        assert!(teams.contains("ch72gsb320000000000000001"));
        assert!(store.teams_for_session("unknown").await?.is_empty());

        let team = store.get_team("ch72gsb320000000000000001").await?;
        assert_eq!(team.map(|t| t.members), Some(5));
        assert!(store.get_team("ch72gsb320000000000000009").await?.is_none());
        Ok(())
    }

    #[test]
    fn fixtures_default_missing_sections() -> Result<()> {
        let fixtures = Fixtures::from_json("{}")?;
        assert!(fixtures.users.is_empty());
        assert!(fixtures.sessions.is_empty());
        assert!(fixtures.teams.is_empty());
        Ok(())
    }

    #[test]
    fn fixtures_reject_invalid_json() {
        assert!(Fixtures::from_json("{users:").is_err());
        assert!(Fixtures::from_file(Path::new("/nonexistent/fixtures.json")).is_err());
    }
}
