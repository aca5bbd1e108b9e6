//! Deterministic store double for auth unit tests.

use crate::store::{Error, Store, Team};
use async_trait::async_trait;
use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicUsize, Ordering},
};

#[derive(Clone, Copy, Debug)]
pub(crate) enum Login {
    Session(&'static str),
    UnknownUser,
    WrongPassword,
    Backend(&'static str),
}

#[derive(Debug)]
pub(crate) struct StubStore {
    login: Login,
    teams: BTreeSet<String>,
    known_teams: Vec<Team>,
    backend_down: bool,
    auth_calls: AtomicUsize,
}

impl StubStore {
    pub(crate) fn new(login: Login) -> Self {
        Self {
            login,
            teams: BTreeSet::new(),
            known_teams: Vec::new(),
            backend_down: false,
            auth_calls: AtomicUsize::new(0),
        }
    }

    /// Team ids every session maps to.
    pub(crate) fn with_session_teams(mut self, teams: &[&str]) -> Self {
        self.teams = teams.iter().map(ToString::to_string).collect();
        self
    }

    pub(crate) fn with_team(mut self, team_id: &str, name: &str, members: u32) -> Self {
        self.known_teams.push(Team {
            team_id: team_id.to_string(),
            name: name.to_string(),
            members,
        });
        self
    }

    /// Fail membership and team lookups.
    pub(crate) fn with_backend_down(mut self) -> Self {
        self.backend_down = true;
        self
    }

    pub(crate) fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for StubStore {
    async fn authenticate(&self, _email: &str, _password: &str) -> Result<String, Error> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        match self.login {
            Login::Session(session_id) => Ok(session_id.to_string()),
            Login::UnknownUser => Err(Error::UnknownUser),
            Login::WrongPassword => Err(Error::InvalidPassword),
            Login::Backend(reason) => Err(Error::Backend(reason.to_string())),
        }
    }

    async fn teams_for_session(&self, _session_id: &str) -> Result<BTreeSet<String>, Error> {
        if self.backend_down {
            return Err(Error::Backend("membership lookup failed".to_string()));
        }
        Ok(self.teams.clone())
    }

    async fn get_team(&self, team_id: &str) -> Result<Option<Team>, Error> {
        if self.backend_down {
            return Err(Error::Backend("team lookup failed".to_string()));
        }
        Ok(self
            .known_teams
            .iter()
            .find(|team| team.team_id == team_id)
            .cloned())
    }
}
