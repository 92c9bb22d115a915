// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{body::Bytes, extract::State, http::StatusCode};

use crate::{error::ApiError, pipeline, state::AppState};

/// Transaction sign request callback.
///
/// The body is an RS256 compact JWS whose claims describe the transaction
/// the custody signer is about to sign. The response body is an RS256
/// compact JWS carrying an APPROVE or REJECT [`Decision`](crate::models::Decision).
#[utoipa::path(
    post,
    path = "/v2/tx_sign_request",
    tag = "Callback",
    request_body(content = String, description = "RS256 compact JWS", content_type = "text/plain"),
    responses(
        (status = 200, description = "Signed decision (compact JWS)", body = String, content_type = "text/plain"),
        (status = 401, description = "Envelope did not authenticate"),
        (status = 500, description = "Decision could not be signed")
    )
)]
pub async fn tx_sign_request(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, String), ApiError> {
    let signed = pipeline::process_blocking(body, state.keys.clone(), state.settings.clone()).await?;
    Ok((StatusCode::OK, signed.envelope))
}
