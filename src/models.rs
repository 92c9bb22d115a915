// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Callback Data Models
//!
//! This module defines the payloads carried inside the signed envelopes:
//! the inbound [`ApprovalClaims`] sent by the custody signer and the
//! outbound [`Decision`] returned to it.
//!
//! Inbound claims keep every JSON member they were signed with. Members the
//! verifier does not consult are preserved in flattened maps so a verified
//! payload compares equal to the payload that was signed.
//!
//! ## Model Categories
//!
//! - **Claims**: request id, destinations and raw transactions
//! - **Decisions**: APPROVE / REJECT answer correlated by request id

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use utoipa::ToSchema;

// =============================================================================
// Approval Claims
// =============================================================================

/// The authenticated payload of a transaction sign request.
///
/// Only `destinations[0]` and `rawTx[0]` are consulted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalClaims {
    /// Opaque identifier echoed back in the [`Decision`].
    pub request_id: String,
    /// Transfer destinations as asserted by the caller.
    #[serde(default)]
    pub destinations: Vec<Destination>,
    /// Unsigned raw transactions about to be signed.
    #[serde(default)]
    pub raw_tx: Vec<RawTransaction>,
    /// Remaining claim members (asset, operation, source, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApprovalClaims {
    /// The destination consulted by the cross-validator.
    pub fn primary_destination(&self) -> Option<&Destination> {
        self.destinations.first()
    }

    /// The raw transaction consulted by the decoder.
    pub fn primary_raw_tx(&self) -> Option<&RawTransaction> {
        self.raw_tx.first()
    }
}

/// A claimed transfer destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Amount in the asset's native (human-readable) unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_native: Option<NativeAmount>,
    /// Checksummed hex address of the recipient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_dst_address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A raw transaction and the digest the signer is about to sign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawTransaction {
    /// Hex-encoded unsigned transaction.
    #[serde(rename = "rawTx", default, skip_serializing_if = "Option::is_none")]
    pub raw_tx: Option<String>,
    /// Hex-encoded keccak256 digest of the signable transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A native-unit amount as it appeared on the wire.
///
/// Signers send either a JSON number (`0.01`) or a string (`"0.01"`); the
/// original representation is kept so it re-serializes unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NativeAmount {
    Number(Number),
    Text(String),
}

impl NativeAmount {
    /// The amount's decimal text, before canonicalization.
    pub fn as_decimal_text(&self) -> String {
        match self {
            NativeAmount::Number(n) => n.to_string(),
            NativeAmount::Text(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for NativeAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_decimal_text())
    }
}

// =============================================================================
// Decision Models
// =============================================================================

/// The verifier's answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Approve,
    Reject,
}

/// Signed response body, correlated to the request by `requestId`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// APPROVE or REJECT.
    pub action: Action,
    /// Copied verbatim from the inbound claims.
    pub request_id: String,
    /// Present only on REJECT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}
