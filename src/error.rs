// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::pipeline::PipelineError;

#[derive(Debug)]
pub enum ApiError {
    /// Envelope did not authenticate. Answered with an empty 401.
    Unauthorized,
    /// Failure after authentication that produced no signed decision.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Authentication(_) => ApiError::Unauthorized,
            PipelineError::Signing(_) => ApiError::internal("failed to sign decision"),
            PipelineError::Task(_) => ApiError::internal("request processing failed"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { error: message }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{AuthError, SigningError};
    use axum::body::to_bytes;

    #[test]
    fn pipeline_errors_map_to_status() {
        let unauth = ApiError::from(PipelineError::Authentication(AuthError::Expired));
        assert_eq!(unauth.status(), StatusCode::UNAUTHORIZED);

        let signing = SigningError::from(jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidRsaKey("bad".to_string()),
        ));
        let internal = ApiError::from(PipelineError::Signing(signing));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unauthorized_has_empty_body() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body_bytes.is_empty());
    }

    #[tokio::test]
    async fn internal_returns_json_body() {
        let response = ApiError::internal("failed to sign decision").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"failed to sign decision"}"#);
    }
}
