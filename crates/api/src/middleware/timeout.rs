//! Request deadline that answers with the standard JSON error body.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Abort the inner handler once `limit` has elapsed and respond with
/// [`AppError::RequestTimeout`].
///
/// ```ignore
/// router.layer(axum::middleware::from_fn_with_state(
///     Duration::from_secs(60),
///     request_timeout,
/// ))
/// ```
pub async fn request_timeout(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%path, timeout_secs = limit.as_secs(), "Request timed out");
            AppError::RequestTimeout.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    fn app(limit: Duration) -> Router {
        Router::new()
            .route("/fast", get(|| async { "done" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(axum::middleware::from_fn_with_state(limit, request_timeout))
    }

    async fn call(app: Router, uri: &str) -> Response {
        let request = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn slow_handler_gets_json_timeout() {
        let response = call(app(Duration::from_millis(50)), "/slow").await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "REQUEST_TIMEOUT");
        assert_eq!(json["error"], "Request timed out");
    }

    #[tokio::test]
    async fn fast_handler_passes_through() {
        let response = call(app(Duration::from_secs(5)), "/fast").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
