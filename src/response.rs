use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Serializes `body` with the exact content type clients of this service
/// expect. axum's `Json` omits the charset parameter.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            let mut resp = Response::new(Body::from(bytes));
            *resp.status_mut() = status;
            resp.headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            resp
        },
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        },
    }
}
