use crate::{
    api::{self, Gateway, GatewayConfig},
    auth::{AccessPolicy, TokenCodec},
    cli::telemetry,
    store::{Fixtures, MemoryStore, Store},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub jwt_secret: SecretString,
    pub jwt_key_id: Option<String>,
    pub calling_service: String,
    pub fixtures: Option<PathBuf>,
    pub cookie_secure: bool,
    pub require_team_membership: bool,
}

/// Build the gateway from `args` without starting the listener.
///
/// # Errors
/// Returns an error if fixtures cannot be loaded or the signing secret is rejected.
pub fn gateway(args: &Args) -> Result<Gateway> {
    let fixtures = match &args.fixtures {
        Some(path) => Fixtures::from_file(path)?,
        None => Fixtures::demo()?,
    };
    debug!(
        "Loaded {} users, {} sessions and {} teams",
        fixtures.users.len(),
        fixtures.sessions.len(),
        fixtures.teams.len()
    );

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new(fixtures));
    let codec = TokenCodec::new(&args.jwt_secret, args.jwt_key_id.clone())
        .context("Invalid --jwt-secret")?;

    let config = GatewayConfig {
        calling_service: args.calling_service.clone(),
        cookie_secure: args.cookie_secure,
        access_policy: AccessPolicy::from_flag(args.require_team_membership),
    };

    Ok(Gateway::new(store, codec, config))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the gateway cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let gateway = Arc::new(gateway(&args)?);

    info!(
        "Access policy: {:?}, calling service: {}",
        gateway.authorizer().policy(),
        gateway.config().calling_service
    );

    let result = api::new(args.port, gateway).await;

    telemetry::shutdown_tracer();

    result
}
