use super::{error_response, now_unix_seconds, StatusResponse};
use crate::{
    api::Gateway,
    auth::{parse_cookies, AccessError},
    store::Team,
};
use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::instrument;

#[utoipa::path(
    get,
    path= "/api/v1/teams/{team_id}",
    params(
        ("team_id" = String, Path, description = "25 character team identifier"),
    ),
    responses (
        (status = 200, description = "Team details", body = Team, content_type = "application/json"),
        (status = 400, description = "Invalid request", body = StatusResponse),
        (status = 401, description = "Invalid session", body = StatusResponse),
        (status = 403, description = "No access", body = StatusResponse),
        (status = 500, description = "Store failure", body = StatusResponse),
    ),
    tag= "teams"
)]
#[instrument(skip_all, fields(team_id = %team_id))]
pub async fn get_team(
    Extension(gateway): Extension<Arc<Gateway>>,
    Path(team_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let cookies = parse_cookies(&headers);

    match gateway
        .authorizer()
        .authorize(&team_id, &cookies, now_unix_seconds())
        .await
    {
        Ok(team) => (StatusCode::OK, Json(team)).into_response(),
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest => error_response(StatusCode::BAD_REQUEST, self.to_string()),
            Self::Unauthenticated => error_response(StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Forbidden => error_response(StatusCode::FORBIDDEN, self.to_string()),
            // details are logged by the authorizer
            Self::Internal(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected server error",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body(error: AccessError) -> Result<(StatusCode, Value)> {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    #[tokio::test]
    async fn access_errors_map_to_status_and_message() -> Result<()> {
        for (error, status, message) in [
            (AccessError::BadRequest, StatusCode::BAD_REQUEST, "Invalid request"),
            (AccessError::Unauthenticated, StatusCode::UNAUTHORIZED, "Invalid session"),
            (AccessError::Forbidden, StatusCode::FORBIDDEN, "No access"),
            (
                AccessError::Internal("connection reset".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected server error",
            ),
        ] {
            let (got_status, json) = body(error).await?;
            assert_eq!(got_status, status);
            assert_eq!(json["status"], "error");
            assert_eq!(json["message"], message);
        }
        Ok(())
    }
}
