use super::error_response;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

pub const CALLING_SERVICE_HEADER: &str = "calling-service";
pub const CALLER_NOT_WHITELISTED: &str = "Caller not whitelisted";

/// Reject requests whose `Calling-Service` header is not the allow-listed value.
pub async fn require_calling_service(
    State(allowed): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    let caller = request
        .headers()
        .get(CALLING_SERVICE_HEADER)
        .and_then(|value| value.to_str().ok());

    if caller == Some(&*allowed) {
        next.run(request).await
    } else {
        debug!("Rejected caller: {:?}", caller);
        error_response(StatusCode::FORBIDDEN, CALLER_NOT_WHITELISTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::{
        body::{to_bytes, Body},
        middleware,
        routing::get,
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "hello" }))
            .route_layer(middleware::from_fn_with_state(
                Arc::<str>::from("example-bff"),
                require_calling_service,
            ))
    }

    fn request(caller: Option<&str>) -> Result<Request> {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(caller) = caller {
            builder = builder.header("Calling-Service", caller);
        }
        Ok(builder.body(Body::empty())?)
    }

    #[tokio::test]
    async fn allow_listed_caller_passes() -> Result<()> {
        let response = app().oneshot(request(Some("example-bff"))?).await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&body[..], b"hello");
        Ok(())
    }

    #[tokio::test]
    async fn other_or_missing_caller_is_forbidden() -> Result<()> {
        for caller in [None, Some("other-bff"), Some("")] {
            let response = app().oneshot(request(caller)?).await?;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);

            let body = to_bytes(response.into_body(), usize::MAX).await?;
            let json: Value = serde_json::from_slice(&body)?;
            assert_eq!(json["status"], "error");
            assert_eq!(json["message"], CALLER_NOT_WHITELISTED);
        }
        Ok(())
    }
}
