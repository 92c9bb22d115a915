// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cross-validation of claimed fields against the decoded transaction.
//!
//! Three independent predicates must all hold for a transaction to be
//! approved:
//!
//! 1. **Amount**: `value` rendered in native units equals `amountNative`.
//! 2. **Destination**: lower-cased `to` equals lower-cased `displayDstAddress`.
//! 3. **Integrity**: keccak256 of the signable encoding equals `payload`.
//!
//! Each predicate returns its own [`Mismatch`] so a failure can be reported
//! and tested on its own.

use crate::blockchain::{self, units, DecodeError, DecodedTransaction};
use crate::config::VerifierSettings;
use crate::models::{ApprovalClaims, NativeAmount};

/// Why a request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    #[error("decode failure: {0}")]
    Decode(#[from] DecodeError),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("amount mismatch: transaction transfers {decoded} but claim states {claimed}")]
    Amount { decoded: String, claimed: String },

    #[error("address mismatch: transaction pays {decoded} but claim states {claimed}")]
    Address { decoded: String, claimed: String },

    #[error("hash mismatch: signable digest is {computed} but claim states {claimed}")]
    Hash { computed: String, claimed: String },
}

impl Mismatch {
    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Mismatch::Decode(_) => "decode_failure",
            Mismatch::MissingField(_) => "missing_field",
            Mismatch::Amount { .. } => "amount_mismatch",
            Mismatch::Address { .. } => "address_mismatch",
            Mismatch::Hash { .. } => "hash_mismatch",
        }
    }
}

/// Outcome of cross-validation for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub ok: bool,
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn pass() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub fn fail(mismatch: &Mismatch) -> Self {
        Self {
            ok: false,
            reason: Some(mismatch.to_string()),
        }
    }
}

/// Amount predicate.
pub fn check_amount(
    decoded: &DecodedTransaction,
    claimed: Option<&NativeAmount>,
    decimals: u8,
) -> Result<(), Mismatch> {
    let claimed = claimed.ok_or(Mismatch::MissingField("destinations[0].amountNative"))?;
    let decoded_native = units::format_native(decoded.value(), decimals);
    let claimed_text = claimed.as_decimal_text();

    match units::canonical_decimal(&claimed_text) {
        Some(canonical) if canonical == decoded_native => Ok(()),
        _ => Err(Mismatch::Amount {
            decoded: decoded_native,
            claimed: claimed_text,
        }),
    }
}

/// Destination predicate.
pub fn check_destination(
    decoded: &DecodedTransaction,
    claimed: Option<&str>,
) -> Result<(), Mismatch> {
    let claimed = claimed.ok_or(Mismatch::MissingField("destinations[0].displayDstAddress"))?;
    let Some(to) = decoded.to() else {
        return Err(Mismatch::Address {
            decoded: "contract creation".to_string(),
            claimed: claimed.to_string(),
        });
    };

    let decoded_hex = format!("0x{}", alloy::hex::encode(to.as_slice()));
    if claimed.to_ascii_lowercase() == decoded_hex {
        Ok(())
    } else {
        Err(Mismatch::Address {
            decoded: decoded_hex,
            claimed: claimed.to_string(),
        })
    }
}

/// Integrity predicate.
pub fn check_integrity(
    decoded: &DecodedTransaction,
    claimed_digest: Option<&str>,
) -> Result<(), Mismatch> {
    let claimed = claimed_digest.ok_or(Mismatch::MissingField("rawTx[0].payload"))?;
    let computed = alloy::hex::encode(blockchain::signing_hash(decoded));

    let normalized = claimed.trim().to_ascii_lowercase();
    let normalized = normalized.strip_prefix("0x").unwrap_or(&normalized);
    if normalized == computed {
        Ok(())
    } else {
        Err(Mismatch::Hash {
            computed,
            claimed: claimed.to_string(),
        })
    }
}

/// Run every predicate against an already decoded transaction.
///
/// All checks run so each failure is logged; the first one (amount,
/// destination, integrity order) becomes the rejection reason.
pub fn check(
    decoded: &DecodedTransaction,
    claims: &ApprovalClaims,
    settings: &VerifierSettings,
) -> ValidationResult {
    let destination = claims.primary_destination();
    let raw = claims.primary_raw_tx();

    let results = [
        check_amount(
            decoded,
            destination.and_then(|d| d.amount_native.as_ref()),
            settings.native_decimals,
        ),
        check_destination(
            decoded,
            destination.and_then(|d| d.display_dst_address.as_deref()),
        ),
        check_integrity(decoded, raw.and_then(|r| r.payload.as_deref())),
    ];

    let mut first = None;
    for mismatch in results.into_iter().filter_map(Result::err) {
        tracing::info!(
            request_id = %claims.request_id,
            code = mismatch.code(),
            "{mismatch}"
        );
        first.get_or_insert(mismatch);
    }

    match first {
        Some(mismatch) => ValidationResult::fail(&mismatch),
        None => ValidationResult::pass(),
    }
}

/// Decode `rawTx[0].rawTx` and cross-validate it against the claims.
///
/// A missing or undecodable raw transaction is a validation failure, not an
/// error: the request is authenticated and still gets a signed REJECT.
pub fn validate(claims: &ApprovalClaims, settings: &VerifierSettings) -> ValidationResult {
    let raw_hex = match claims.primary_raw_tx().and_then(|r| r.raw_tx.as_deref()) {
        Some(raw_hex) => raw_hex,
        None => return ValidationResult::fail(&Mismatch::MissingField("rawTx[0].rawTx")),
    };

    match blockchain::decode_hex(raw_hex) {
        Ok(decoded) => {
            tracing::debug!(
                request_id = %claims.request_id,
                tx_type = %decoded.tx_type(),
                "Raw transaction decoded"
            );
            check(&decoded, claims, settings)
        }
        Err(e) => {
            let mismatch = Mismatch::from(e);
            tracing::info!(
                request_id = %claims.request_id,
                code = mismatch.code(),
                "{mismatch}"
            );
            ValidationResult::fail(&mismatch)
        }
    }
}
