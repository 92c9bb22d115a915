// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM transaction decoding.
//!
//! This module provides functionality for:
//! - Decoding raw legacy, EIP-2930 and EIP-1559 transactions
//! - Re-encoding the signable form and computing its keccak256 digest
//! - Rendering on-chain integer amounts in native decimal units

pub mod decoder;
pub mod signable;
pub mod types;
pub mod units;

pub use decoder::{decode, decode_hex, DecodeError};
pub use signable::{signable_bytes, signing_hash};
pub use types::*;
