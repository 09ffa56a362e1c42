use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, error, info_span, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Tag the request with an id, reusing a caller-supplied `x-request-id`, and
/// run the rest of the stack inside a span carrying it.
pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        });
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.clone());

    let span = info_span!(
        "request",
        request_id = request_id.to_str().unwrap_or("invalid"),
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}

/// Log 4xx/5xx responses with the `ErrorReport` the handler attached.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let elapsed_ms = start.elapsed().as_millis();
    let (source, messages) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("unknown", Vec::new()),
    };
    let detail = messages
        .first()
        .map_or("no diagnostic available", String::as_str);

    if status.is_server_error() {
        error!(
            target = "postdeck::http::response",
            status = status.as_u16(),
            elapsed_ms,
            source,
            detail,
            chain = ?messages,
            "request failed",
        );
    } else {
        warn!(
            target = "postdeck::http::response",
            status = status.as_u16(),
            elapsed_ms,
            source,
            detail,
            "client request error",
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::StatusCode,
        middleware,
        response::IntoResponse,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    fn router() -> Router {
        Router::new()
            .route("/ok", get(|| async { StatusCode::NO_CONTENT }))
            .route(
                "/missing",
                get(|| async {
                    let mut response = StatusCode::NOT_FOUND.into_response();
                    ErrorReport::from_message("tests", StatusCode::NOT_FOUND, "gone")
                        .attach(&mut response);
                    response
                }),
            )
            .layer(middleware::from_fn(log_responses))
            .layer(middleware::from_fn(set_request_context))
    }

    async fn get_path(path: &str, request_id: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(path);
        if let Some(id) = request_id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        router()
            .oneshot(builder.body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    #[tokio::test]
    async fn generated_request_id_is_a_uuid() {
        let response = get_path("/ok", None).await;
        let id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .expect("request id header");
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let response = get_path("/ok", Some("trace-123")).await;
        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER),
            Some(&HeaderValue::from_static("trace-123"))
        );
    }

    #[tokio::test]
    async fn error_report_is_consumed_by_logging() {
        let response = get_path("/missing", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorReport>().is_none());
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}
