use super::{error_response, now_unix_seconds, StatusResponse};
use crate::{
    api::Gateway,
    auth::{Credentials, IssuedSession, LoginError, LoginResponse, TransportMode},
};
use axum::{
    extract::{Extension, Query},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::{fmt, sync::Arc};
use tracing::{error, instrument};
use utoipa::{IntoParams, ToSchema};

#[derive(ToSchema, Deserialize, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Token transport flags; a bare `?jwtbody` counts as set.
///
/// Read from the raw query pairs so a repeated flag never rejects the request.
#[derive(IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    /// Return the token in the response body instead of a cookie.
    pub jwtbody: Option<String>,
    /// Return the token in both the body and a cookie.
    pub jwtboth: Option<String>,
}

impl LoginQuery {
    /// First occurrence of each flag wins; unknown keys are ignored.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "jwtbody" => &mut query.jwtbody,
                "jwtboth" => &mut query.jwtboth,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    #[must_use]
    pub fn transport_mode(&self) -> TransportMode {
        TransportMode::from_flags(flag(self.jwtbody.as_deref()), flag(self.jwtboth.as_deref()))
    }
}

fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        !matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        )
    })
}

#[utoipa::path(
    post,
    path= "/api/v1/login",
    request_body = LoginRequest,
    params(LoginQuery),
    responses (
        (status = 200, description = "Session created", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Missing or malformed credentials", body = StatusResponse),
        (status = 401, description = "Invalid credentials", body = StatusResponse),
        (status = 403, description = "Caller not whitelisted", body = StatusResponse),
        (status = 500, description = "Store or signing failure", body = StatusResponse),
    ),
    tag= "auth"
)]
#[instrument(skip_all, fields(mode))]
pub async fn login(
    Extension(gateway): Extension<Arc<Gateway>>,
    Query(pairs): Query<Vec<(String, String)>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let mode = LoginQuery::from_pairs(pairs).transport_mode();
    tracing::Span::current().record("mode", tracing::field::debug(mode));

    let credentials = Credentials::new(request.email, request.password);

    match gateway
        .issuer()
        .login(&credentials, mode, now_unix_seconds())
        .await
    {
        Ok(session) => session_response(session, gateway.config().cookie_secure),
        Err(e) => e.into_response(),
    }
}

fn session_response(session: IssuedSession, secure: bool) -> Response {
    let mut headers = HeaderMap::new();

    if let Some(cookie) = &session.cookie {
        match cookie.to_header_value(secure) {
            Ok(value) => {
                headers.insert(SET_COOKIE, value);
            }
            Err(e) => {
                error!("Failed to build session cookie: {}", e);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected server error",
                );
            }
        }
    }

    (StatusCode::OK, headers, Json(session.body)).into_response()
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(jwtbody: Option<&str>, jwtboth: Option<&str>) -> LoginQuery {
        LoginQuery {
            jwtbody: jwtbody.map(ToString::to_string),
            jwtboth: jwtboth.map(ToString::to_string),
        }
    }

    #[test]
    fn transport_flags() {
        assert_eq!(query(None, None).transport_mode(), TransportMode::CookieOnly);
        assert_eq!(query(Some(""), None).transport_mode(), TransportMode::BodyOnly);
        assert_eq!(query(Some("true"), None).transport_mode(), TransportMode::BodyOnly);
        assert_eq!(query(Some("false"), None).transport_mode(), TransportMode::CookieOnly);
        assert_eq!(query(Some("0"), None).transport_mode(), TransportMode::CookieOnly);
        assert_eq!(query(None, Some("1")).transport_mode(), TransportMode::Both);
        assert_eq!(query(Some("1"), Some("")).transport_mode(), TransportMode::Both);
        assert_eq!(query(Some("1"), Some("FALSE")).transport_mode(), TransportMode::BodyOnly);
        assert_eq!(query(Some("yes"), Some("no")).transport_mode(), TransportMode::BodyOnly);
        assert_eq!(query(Some("Off"), None).transport_mode(), TransportMode::CookieOnly);
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn repeated_flags_keep_first_value() {
        let query = LoginQuery::from_pairs(pairs(&[("jwtbody", ""), ("jwtbody", "")]));
        assert_eq!(query.jwtbody.as_deref(), Some(""));
        assert_eq!(query.transport_mode(), TransportMode::BodyOnly);

        let query = LoginQuery::from_pairs(pairs(&[
            ("jwtboth", "off"),
            ("jwtboth", "1"),
            ("other", "x"),
        ]));
        assert_eq!(query.jwtboth.as_deref(), Some("off"));
        assert_eq!(query.transport_mode(), TransportMode::CookieOnly);
    }

    #[test]
    fn login_errors_map_to_status() {
        assert_eq!(
            LoginError::BadRequest("missing email").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LoginError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            LoginError::Store("database error".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn request_debug_redacts_password() {
        let request = LoginRequest {
            email: "user@example.com".to_string(),
            password: "electric cat festival".to_string(),
        };
        let rendered = format!("{request:?}");
        assert!(rendered.contains("user@example.com"));
        assert!(!rendered.contains("electric"));
    }
}
