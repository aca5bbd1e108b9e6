use crate::{
    api::handlers::{health, login, team, StatusResponse},
    auth::LoginResponse,
    store::Team,
};
use utoipa::OpenApi;

/// Document served at `/api-docs/openapi.json`.
///
/// Title, version, contact and license come from Cargo metadata.
#[derive(OpenApi)]
#[openapi(
    paths(health::health, login::login, team::get_team),
    components(schemas(
        health::Health,
        login::LoginRequest,
        LoginResponse,
        StatusResponse,
        Team
    )),
    tags(
        (name = "auth", description = "Session issuance"),
        (name = "teams", description = "Session scoped team lookup"),
        (name = "health", description = "Build metadata")
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
