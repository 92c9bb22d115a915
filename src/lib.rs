// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction Approval Verifier - Co-Signer Callback Service
//!
//! A custody signer asks this service, over a signed webhook, whether it may
//! sign a transaction. The service authenticates the request, decodes the
//! raw EVM transaction itself, cross-checks the caller's claims against it,
//! and answers with a signed APPROVE or REJECT.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - EVM transaction decoding and signing-hash derivation
//! - `envelope` - RS256 compact JWS verification and signing
//! - `validation` - Amount, destination and digest cross-checks
//! - `pipeline` - Verify, validate, decide, sign

pub mod api;
pub mod blockchain;
pub mod config;
pub mod decision;
pub mod envelope;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod state;
pub mod telemetry;
pub mod validation;
