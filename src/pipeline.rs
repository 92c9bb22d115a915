// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Verification Pipeline
//!
//! One request, start to finish:
//!
//! ```text
//! envelope bytes ──verify──▶ claims ──validate──▶ result ──build──▶ decision ──sign──▶ envelope
//! ```
//!
//! Authentication failures short-circuit with [`PipelineError::Authentication`]
//! and produce no signed output. Everything after authentication, including
//! an undecodable raw transaction, ends in a signed decision.

use crate::config::VerifierSettings;
use crate::decision;
use crate::envelope::{self, AuthError, KeyMaterial, SigningError};
use crate::models::{Action, Decision};
use crate::validation;

/// The signed answer and the decision it carries.
#[derive(Debug, Clone)]
pub struct SignedDecision {
    /// RS256 compact JWS, returned verbatim as the response body.
    pub envelope: String,
    pub decision: Decision,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Verify, validate, decide and sign.
pub fn process(
    envelope_bytes: &[u8],
    keys: &KeyMaterial,
    settings: &VerifierSettings,
) -> Result<SignedDecision, PipelineError> {
    let claims = match envelope::verify(envelope_bytes, keys.verifier()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(code = e.error_code(), "Rejected unauthenticated envelope");
            return Err(e.into());
        }
    };

    let span = tracing::info_span!("tx_sign_request", request_id = %claims.request_id);
    let _entered = span.enter();

    let result = validation::validate(&claims, settings);
    let decision = decision::build(&result, &claims.request_id);

    match decision.action {
        Action::Approve => tracing::info!("Transaction approved"),
        Action::Reject => tracing::info!(
            reason = decision.rejection_reason.as_deref().unwrap_or_default(),
            "Transaction rejected"
        ),
    }

    let signed = envelope::sign(&decision, keys.signer(), keys.signer_key_id()).map_err(|e| {
        tracing::error!(error = %e, "Failed to sign decision");
        e
    })?;

    Ok(SignedDecision {
        envelope: signed,
        decision,
    })
}

/// Run [`process`] off the async executor.
///
/// RSA signing is CPU-bound; handlers call this instead of [`process`].
pub async fn process_blocking(
    envelope_bytes: axum::body::Bytes,
    keys: std::sync::Arc<KeyMaterial>,
    settings: std::sync::Arc<VerifierSettings>,
) -> Result<SignedDecision, PipelineError> {
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(|| process(&envelope_bytes, &keys, &settings)))
        .await?
}
