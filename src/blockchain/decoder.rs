// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Raw transaction decoding.
//!
//! The first byte of the raw transaction selects the schema:
//!
//! | First byte      | Schema                                    |
//! |-----------------|-------------------------------------------|
//! | `0xc0..=0xff`   | legacy RLP list (6 or 9 items)            |
//! | `0x01`          | EIP-2930 access-list payload (8 or 11)    |
//! | `0x02`          | EIP-1559 fee-market payload (9 or 12)     |
//!
//! Anything else is rejected. Decoding is a pure function of the input bytes.

use alloy::{
    primitives::{Address, Bytes, B256, U256},
    rlp::{Decodable, Header, EMPTY_STRING_CODE},
};

use super::types::{
    AccessListItem, AccessListTx, DecodedTransaction, FeeMarketTx, LegacyTx, RawSignature,
    TxType, ACCESS_LIST_TX_TYPE, FEE_MARKET_TX_TYPE,
};

/// Smallest first byte of an RLP list with a short payload.
const RLP_LIST_START: u8 = 0xc0;

const LEGACY_UNSIGNED_FIELDS: usize = 6;
const ACCESS_LIST_UNSIGNED_FIELDS: usize = 8;
const FEE_MARKET_UNSIGNED_FIELDS: usize = 9;
/// `v, r, s` / `yParity, r, s`.
const SIGNATURE_FIELDS: usize = 3;

/// Errors produced while decoding a raw transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("raw transaction is not valid hex: {0}")]
    InvalidHex(String),

    #[error("raw transaction is empty")]
    Empty,

    #[error("unsupported transaction type byte 0x{0:02x}")]
    UnsupportedType(u8),

    #[error("malformed RLP: {0}")]
    Rlp(String),

    #[error("expected an RLP list for {0}")]
    ExpectedList(&'static str),

    #[error("{tx_type} transaction expects {expected} fields, found {found}")]
    FieldCount {
        tx_type: TxType,
        expected: String,
        found: usize,
    },

    #[error("invalid `{field}` field: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("{0} trailing bytes after transaction payload")]
    TrailingBytes(usize),
}

impl From<alloy::rlp::Error> for DecodeError {
    fn from(err: alloy::rlp::Error) -> Self {
        DecodeError::Rlp(err.to_string())
    }
}

/// Decode a hex-encoded raw transaction (optional `0x` prefix).
pub fn decode_hex(raw_hex: &str) -> Result<DecodedTransaction, DecodeError> {
    let trimmed = raw_hex.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = alloy::hex::decode(digits).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;
    decode(&bytes)
}

/// Decode raw transaction bytes, dispatching on the leading byte.
pub fn decode(raw: &[u8]) -> Result<DecodedTransaction, DecodeError> {
    let first = *raw.first().ok_or(DecodeError::Empty)?;

    match first {
        RLP_LIST_START..=0xff => decode_legacy(raw),
        ACCESS_LIST_TX_TYPE => decode_access_list(&raw[1..]),
        FEE_MARKET_TX_TYPE => decode_fee_market(&raw[1..]),
        other => Err(DecodeError::UnsupportedType(other)),
    }
}

fn decode_legacy(raw: &[u8]) -> Result<DecodedTransaction, DecodeError> {
    let items = outer_list(raw)?;
    expect_arity(TxType::Legacy, LEGACY_UNSIGNED_FIELDS, items.len())?;

    let (chain_id, signature) = if items.len() == LEGACY_UNSIGNED_FIELDS {
        (None, None)
    } else {
        let v: U256 = field(items[6], "v")?;
        let r: U256 = field(items[7], "r")?;
        let s: U256 = field(items[8], "s")?;
        if r.is_zero() && s.is_zero() {
            // EIP-155 unsigned form: `v` carries the chain id.
            (Some(v), None)
        } else {
            (eip155_chain_id(v), Some(RawSignature { v, r, s }))
        }
    };

    Ok(DecodedTransaction::Legacy(LegacyTx {
        nonce: field(items[0], "nonce")?,
        gas_price: field(items[1], "gasPrice")?,
        gas_limit: field(items[2], "gasLimit")?,
        to: to_field(items[3])?,
        value: field(items[4], "value")?,
        data: field::<Bytes>(items[5], "data")?,
        chain_id,
        signature,
    }))
}

fn decode_access_list(payload: &[u8]) -> Result<DecodedTransaction, DecodeError> {
    let items = outer_list(payload)?;
    expect_arity(TxType::AccessList, ACCESS_LIST_UNSIGNED_FIELDS, items.len())?;

    Ok(DecodedTransaction::AccessList(AccessListTx {
        chain_id: field(items[0], "chainId")?,
        nonce: field(items[1], "nonce")?,
        gas_price: field(items[2], "gasPrice")?,
        gas_limit: field(items[3], "gasLimit")?,
        to: to_field(items[4])?,
        value: field(items[5], "value")?,
        data: field::<Bytes>(items[6], "data")?,
        access_list: access_list_field(items[7])?,
        signature: typed_signature(&items, ACCESS_LIST_UNSIGNED_FIELDS)?,
    }))
}

fn decode_fee_market(payload: &[u8]) -> Result<DecodedTransaction, DecodeError> {
    let items = outer_list(payload)?;
    expect_arity(TxType::FeeMarket, FEE_MARKET_UNSIGNED_FIELDS, items.len())?;

    Ok(DecodedTransaction::FeeMarket(FeeMarketTx {
        chain_id: field(items[0], "chainId")?,
        nonce: field(items[1], "nonce")?,
        max_priority_fee_per_gas: field(items[2], "maxPriorityFeePerGas")?,
        max_fee_per_gas: field(items[3], "maxFeePerGas")?,
        gas_limit: field(items[4], "gasLimit")?,
        to: to_field(items[5])?,
        value: field(items[6], "value")?,
        data: field::<Bytes>(items[7], "data")?,
        access_list: access_list_field(items[8])?,
        signature: typed_signature(&items, FEE_MARKET_UNSIGNED_FIELDS)?,
    }))
}

/// Legacy signature `v` to chain id (`v = chainId * 2 + 35 + yParity`).
fn eip155_chain_id(v: U256) -> Option<U256> {
    let base = U256::from(35u64);
    if v >= base {
        Some((v - base) / U256::from(2u64))
    } else {
        None
    }
}

fn typed_signature(items: &[&[u8]], unsigned: usize) -> Result<Option<RawSignature>, DecodeError> {
    if items.len() == unsigned {
        return Ok(None);
    }
    Ok(Some(RawSignature {
        v: field(items[unsigned], "yParity")?,
        r: field(items[unsigned + 1], "r")?,
        s: field(items[unsigned + 2], "s")?,
    }))
}

fn expect_arity(tx_type: TxType, unsigned: usize, found: usize) -> Result<(), DecodeError> {
    if found == unsigned || found == unsigned + SIGNATURE_FIELDS {
        Ok(())
    } else {
        Err(DecodeError::FieldCount {
            tx_type,
            expected: format!("{unsigned} or {}", unsigned + SIGNATURE_FIELDS),
            found,
        })
    }
}

/// Decode the outer list header and split its payload into raw item
/// encodings. The list must span the whole input.
fn outer_list(raw: &[u8]) -> Result<Vec<&[u8]>, DecodeError> {
    let mut buf = raw;
    let header = Header::decode(&mut buf)?;
    if !header.list {
        return Err(DecodeError::ExpectedList("transaction payload"));
    }
    if buf.len() < header.payload_length {
        return Err(alloy::rlp::Error::InputTooShort.into());
    }
    let trailing = buf.len() - header.payload_length;
    if trailing != 0 {
        return Err(DecodeError::TrailingBytes(trailing));
    }
    split_items(&buf[..header.payload_length])
}

/// Split a list payload into the raw encoding of each item (header included).
fn split_items(mut payload: &[u8]) -> Result<Vec<&[u8]>, DecodeError> {
    let mut items = Vec::new();
    while !payload.is_empty() {
        let mut probe = payload;
        let header = Header::decode(&mut probe)?;
        let header_len = payload.len() - probe.len();
        let total = header_len + header.payload_length;
        if total > payload.len() {
            return Err(alloy::rlp::Error::InputTooShort.into());
        }
        let (item, rest) = payload.split_at(total);
        items.push(item);
        payload = rest;
    }
    Ok(items)
}

/// Decode a single field from its raw item encoding; the item must be
/// consumed entirely.
fn field<T: Decodable>(item: &[u8], name: &'static str) -> Result<T, DecodeError> {
    let mut buf = item;
    let value = T::decode(&mut buf).map_err(|e| DecodeError::InvalidField {
        field: name,
        reason: e.to_string(),
    })?;
    if !buf.is_empty() {
        return Err(DecodeError::InvalidField {
            field: name,
            reason: format!("{} unexpected trailing bytes", buf.len()),
        });
    }
    Ok(value)
}

/// `to` is either the empty string (contract creation) or a 20-byte address.
fn to_field(item: &[u8]) -> Result<Option<Address>, DecodeError> {
    if item == [EMPTY_STRING_CODE] {
        return Ok(None);
    }
    field::<Address>(item, "to").map(Some)
}

fn access_list_field(item: &[u8]) -> Result<Vec<AccessListItem>, DecodeError> {
    let entries = outer_list(item).map_err(|e| DecodeError::InvalidField {
        field: "accessList",
        reason: e.to_string(),
    })?;

    entries
        .into_iter()
        .map(|entry| {
            let parts = outer_list(entry).map_err(|e| DecodeError::InvalidField {
                field: "accessList",
                reason: e.to_string(),
            })?;
            if parts.len() != 2 {
                return Err(DecodeError::InvalidField {
                    field: "accessList",
                    reason: format!("entry has {} items, expected 2", parts.len()),
                });
            }
            Ok(AccessListItem {
                address: field::<Address>(parts[0], "accessList.address")?,
                storage_keys: field::<Vec<B256>>(parts[1], "accessList.storageKeys")?,
            })
        })
        .collect()
}
