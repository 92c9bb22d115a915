// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decision construction.

use crate::models::{Action, Decision};
use crate::validation::ValidationResult;

/// Map a validation outcome to the decision returned to the signer.
///
/// Total: every result yields a decision carrying the caller's `request_id`.
pub fn build(result: &ValidationResult, request_id: &str) -> Decision {
    if result.ok {
        Decision {
            action: Action::Approve,
            request_id: request_id.to_string(),
            rejection_reason: None,
        }
    } else {
        Decision {
            action: Action::Reject,
            request_id: request_id.to_string(),
            rejection_reason: result.reason.clone(),
        }
    }
}
