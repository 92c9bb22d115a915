// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Envelope Module
//!
//! Mutual RS256 authentication between the custody signer and this service.
//!
//! ## Flow
//!
//! 1. The custody signer POSTs a compact JWS (`header.claims.signature`)
//!    signed with its private key
//! 2. This service:
//!    - Verifies the signature against the signer's public key
//!    - Rejects any header algorithm other than RS256
//!    - Deserializes the claims into [`ApprovalClaims`](crate::models::ApprovalClaims)
//! 3. The decision is answered as a compact JWS signed with this service's
//!    own private key
//!
//! ## Security
//!
//! - Key material is loaded once and never mutated by request handling
//! - An envelope that fails authentication gets no signed answer

pub mod codec;
pub mod error;
pub mod keys;

pub use codec::{sign, verify, ENVELOPE_ALGORITHM};
pub use error::{AuthError, KeyError, SigningError};
pub use keys::KeyMaterial;
