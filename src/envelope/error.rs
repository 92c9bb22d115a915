// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Envelope errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Inbound envelope could not be authenticated.
///
/// None of these variants carries any part of the offending payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Not a well-formed three-part compact JWS, or claims are not valid JSON
    #[error("Envelope is malformed")]
    MalformedEnvelope,
    /// Header algorithm is not the expected one
    #[error("Envelope algorithm is not accepted")]
    AlgorithmMismatch,
    /// Signature does not verify under the configured public key
    #[error("Envelope signature is invalid")]
    InvalidSignature,
    /// `exp` claim is in the past
    #[error("Envelope has expired")]
    Expired,
    /// `nbf` claim is in the future
    #[error("Envelope is not yet valid")]
    NotYetValid,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MalformedEnvelope => "malformed_envelope",
            AuthError::AlgorithmMismatch => "algorithm_mismatch",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "envelope_expired",
            AuthError::NotYetValid => "envelope_not_yet_valid",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => AuthError::AlgorithmMismatch,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::ImmatureSignature => AuthError::NotYetValid,
            _ => AuthError::MalformedEnvelope,
        }
    }
}

/// Unauthenticated callers get a bare 401: nothing about the rejected
/// envelope is echoed back.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.status_code().into_response()
    }
}

/// Outbound decision could not be signed.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("Failed to sign decision: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Key material could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Failed to read key file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid PEM: {0}")]
    Pem(#[from] pem::PemError),

    #[error("Unexpected PEM label `{found}` for {role} (expected one of {expected})")]
    UnexpectedLabel {
        role: &'static str,
        found: String,
        expected: String,
    },

    #[error("Invalid RSA key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
}
