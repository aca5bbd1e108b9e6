//! Map parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{
    session::{ARG_COOKIE_SECURE, ARG_JWT_KEY_ID, ARG_JWT_SECRET, ARG_REQUIRE_TEAM_MEMBERSHIP},
    ARG_CALLING_SERVICE, ARG_FIXTURES, ARG_PORT,
};
use crate::api::DEFAULT_CALLING_SERVICE;
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let jwt_secret = matches
        .get_one::<String>(ARG_JWT_SECRET)
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --jwt-secret")?;

    Ok(Action::Server(Args {
        port,
        jwt_secret,
        jwt_key_id: matches.get_one::<String>(ARG_JWT_KEY_ID).cloned(),
        calling_service: matches
            .get_one::<String>(ARG_CALLING_SERVICE)
            .cloned()
            .unwrap_or_else(|| DEFAULT_CALLING_SERVICE.to_string()),
        fixtures: matches.get_one::<PathBuf>(ARG_FIXTURES).cloned(),
        cookie_secure: matches.get_flag(ARG_COOKIE_SECURE),
        require_team_membership: matches.get_flag(ARG_REQUIRE_TEAM_MEMBERSHIP),
    }))
}
