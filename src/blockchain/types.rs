// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoded transaction types.
//!
//! Each variant of [`DecodedTransaction`] carries only the fields that exist
//! for that envelope type, so a legacy transaction has no `maxFeePerGas` and a
//! fee-market transaction has no `gasPrice`.

use alloy::primitives::{Address, Bytes, B256, U256};

/// EIP-2718 type byte for access-list (EIP-2930) transactions.
pub const ACCESS_LIST_TX_TYPE: u8 = 0x01;

/// EIP-2718 type byte for fee-market (EIP-1559) transactions.
pub const FEE_MARKET_TX_TYPE: u8 = 0x02;

/// Transaction envelope discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType {
    Legacy,
    AccessList,
    FeeMarket,
}

impl TxType {
    /// The EIP-2718 type byte, `None` for untyped legacy transactions.
    pub fn type_byte(&self) -> Option<u8> {
        match self {
            TxType::Legacy => None,
            TxType::AccessList => Some(ACCESS_LIST_TX_TYPE),
            TxType::FeeMarket => Some(FEE_MARKET_TX_TYPE),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Legacy => "legacy",
            TxType::AccessList => "access-list",
            TxType::FeeMarket => "fee-market",
        }
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `[address, [storageKey, ...]]` entry of an EIP-2930 access list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessListItem {
    pub address: Address,
    pub storage_keys: Vec<B256>,
}

/// Raw signature values trailing a signed transaction.
///
/// For legacy transactions `v` is the EIP-155 encoded recovery value; for
/// typed transactions it is the y-parity bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignature {
    pub v: U256,
    pub r: U256,
    pub s: U256,
}

/// Pre-EIP-2718 transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTx {
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
    /// Replay-protection chain id. Present for the EIP-155 unsigned form
    /// (`v = chainId, r = s = 0`) and for signatures with `v >= 35`.
    pub chain_id: Option<U256>,
    pub signature: Option<RawSignature>,
}

/// EIP-2930 transaction (type `0x01`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessListTx {
    pub chain_id: U256,
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
    pub access_list: Vec<AccessListItem>,
    pub signature: Option<RawSignature>,
}

/// EIP-1559 transaction (type `0x02`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeMarketTx {
    pub chain_id: U256,
    pub nonce: U256,
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
    pub gas_limit: U256,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
    pub access_list: Vec<AccessListItem>,
    pub signature: Option<RawSignature>,
}

/// A transaction recovered from its raw encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedTransaction {
    Legacy(LegacyTx),
    AccessList(AccessListTx),
    FeeMarket(FeeMarketTx),
}

impl DecodedTransaction {
    pub fn tx_type(&self) -> TxType {
        match self {
            DecodedTransaction::Legacy(_) => TxType::Legacy,
            DecodedTransaction::AccessList(_) => TxType::AccessList,
            DecodedTransaction::FeeMarket(_) => TxType::FeeMarket,
        }
    }

    /// Recipient address, `None` for contract creation.
    pub fn to(&self) -> Option<Address> {
        match self {
            DecodedTransaction::Legacy(tx) => tx.to,
            DecodedTransaction::AccessList(tx) => tx.to,
            DecodedTransaction::FeeMarket(tx) => tx.to,
        }
    }

    /// Transferred value in the smallest on-chain denomination (wei).
    pub fn value(&self) -> U256 {
        match self {
            DecodedTransaction::Legacy(tx) => tx.value,
            DecodedTransaction::AccessList(tx) => tx.value,
            DecodedTransaction::FeeMarket(tx) => tx.value,
        }
    }

    pub fn nonce(&self) -> U256 {
        match self {
            DecodedTransaction::Legacy(tx) => tx.nonce,
            DecodedTransaction::AccessList(tx) => tx.nonce,
            DecodedTransaction::FeeMarket(tx) => tx.nonce,
        }
    }

    pub fn chain_id(&self) -> Option<U256> {
        match self {
            DecodedTransaction::Legacy(tx) => tx.chain_id,
            DecodedTransaction::AccessList(tx) => Some(tx.chain_id),
            DecodedTransaction::FeeMarket(tx) => Some(tx.chain_id),
        }
    }

    pub fn gas_limit(&self) -> U256 {
        match self {
            DecodedTransaction::Legacy(tx) => tx.gas_limit,
            DecodedTransaction::AccessList(tx) => tx.gas_limit,
            DecodedTransaction::FeeMarket(tx) => tx.gas_limit,
        }
    }

    pub fn data(&self) -> &Bytes {
        match self {
            DecodedTransaction::Legacy(tx) => &tx.data,
            DecodedTransaction::AccessList(tx) => &tx.data,
            DecodedTransaction::FeeMarket(tx) => &tx.data,
        }
    }

    /// Access list entries; always empty for legacy transactions.
    pub fn access_list(&self) -> &[AccessListItem] {
        match self {
            DecodedTransaction::Legacy(_) => &[],
            DecodedTransaction::AccessList(tx) => &tx.access_list,
            DecodedTransaction::FeeMarket(tx) => &tx.access_list,
        }
    }

    pub fn is_signed(&self) -> bool {
        match self {
            DecodedTransaction::Legacy(tx) => tx.signature.is_some(),
            DecodedTransaction::AccessList(tx) => tx.signature.is_some(),
            DecodedTransaction::FeeMarket(tx) => tx.signature.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_bytes_match_eip2718() {
        assert_eq!(TxType::Legacy.type_byte(), None);
        assert_eq!(TxType::AccessList.type_byte(), Some(0x01));
        assert_eq!(TxType::FeeMarket.type_byte(), Some(0x02));
    }

    #[test]
    fn legacy_has_empty_access_list() {
        let tx = DecodedTransaction::Legacy(LegacyTx {
            nonce: U256::ZERO,
            gas_price: U256::from(1u64),
            gas_limit: U256::from(21_000u64),
            to: None,
            value: U256::ZERO,
            data: Bytes::new(),
            chain_id: None,
            signature: None,
        });
        assert!(tx.access_list().is_empty());
        assert_eq!(tx.tx_type().to_string(), "legacy");
        assert!(!tx.is_signed());
    }
}
