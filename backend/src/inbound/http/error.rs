//! HTTP adapter mapping for domain errors.
//!
//! The domain error type stays HTTP-agnostic; this impl turns it into a
//! JSON body and a status code, redacting internal failures.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::BadGateway => StatusCode::BAD_GATEWAY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::{Value, json};

    const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("no signature"), StatusCode::UNAUTHORIZED)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::service_unavailable("store down"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::bad_gateway("platform down"), StatusCode::BAD_GATEWAY)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(ResponseError::status_code(&error), status);
    }

    async fn body_of(error: &Error) -> (StatusCode, Option<String>, Value) {
        let response = ResponseError::error_response(error);
        let status = response.status();
        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .map(|value| value.to_str().expect("ascii header").to_owned());
        let bytes = to_bytes(response.into_body()).await.expect("read body");
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, header, body)
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted_but_keep_trace_id() {
        let error = Error::internal("db password rejected")
            .with_trace_id(TRACE_ID)
            .with_details(json!({"secret": "x"}));

        let (status, header, body) = body_of(&error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header.as_deref(), Some(TRACE_ID));
        assert_eq!(body["message"], "Internal server error");
        assert_eq!(body["traceId"], TRACE_ID);
        assert!(body.get("details").is_none());
    }

    #[actix_web::test]
    async fn client_errors_keep_message_and_details() {
        let error = Error::invalid_request("since must be an ISO-8601 timestamp")
            .with_details(json!({"field": "since"}));

        let (status, header, body) = body_of(&error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(header.is_none());
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "since");
    }

    #[rstest]
    fn actix_errors_become_redacted_internal_errors() {
        let err: Error = actix_web::error::ErrorBadRequest("boom").into();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), "Internal server error");
    }
}
