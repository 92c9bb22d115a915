// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signable encoding and signing hash of a decoded transaction.
//!
//! The signable form never includes signature fields:
//!
//! - typed: `type ‖ rlp([fields...])`
//! - legacy with chain id (EIP-155): `rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0])`
//! - legacy without chain id: `rlp([nonce, gasPrice, gas, to, value, data])`

use alloy::{
    primitives::{keccak256, Address, B256, U256},
    rlp::{BufMut, Encodable, Header, EMPTY_STRING_CODE},
};

use super::types::{AccessListItem, DecodedTransaction};

/// `to` slot: empty string for contract creation.
struct ToField(Option<Address>);

impl Encodable for ToField {
    fn encode(&self, out: &mut dyn BufMut) {
        match &self.0 {
            Some(address) => address.encode(out),
            None => out.put_u8(EMPTY_STRING_CODE),
        }
    }

    fn length(&self) -> usize {
        self.0.as_ref().map_or(1, Encodable::length)
    }
}

impl AccessListItem {
    fn payload_length(&self) -> usize {
        self.address.length() + self.storage_keys.length()
    }
}

impl Encodable for AccessListItem {
    fn encode(&self, out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);
        self.address.encode(out);
        self.storage_keys.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        Header {
            list: true,
            payload_length,
        }
        .length()
            + payload_length
    }
}

fn encode_list(fields: &[&dyn Encodable], out: &mut Vec<u8>) {
    let payload_length = fields.iter().map(|f| f.length()).sum();
    Header {
        list: true,
        payload_length,
    }
    .encode(out);
    for f in fields {
        f.encode(out);
    }
}

/// The exact byte sequence whose keccak256 digest authorizes `tx`.
pub fn signable_bytes(tx: &DecodedTransaction) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(tx.tx_type().type_byte());

    match tx {
        DecodedTransaction::Legacy(tx) => {
            let to = ToField(tx.to);
            let zero = U256::ZERO;
            match &tx.chain_id {
                Some(chain_id) => encode_list(
                    &[
                        &tx.nonce,
                        &tx.gas_price,
                        &tx.gas_limit,
                        &to,
                        &tx.value,
                        &tx.data,
                        chain_id,
                        &zero,
                        &zero,
                    ],
                    &mut out,
                ),
                None => encode_list(
                    &[&tx.nonce, &tx.gas_price, &tx.gas_limit, &to, &tx.value, &tx.data],
                    &mut out,
                ),
            }
        }
        DecodedTransaction::AccessList(tx) => {
            let to = ToField(tx.to);
            encode_list(
                &[
                    &tx.chain_id,
                    &tx.nonce,
                    &tx.gas_price,
                    &tx.gas_limit,
                    &to,
                    &tx.value,
                    &tx.data,
                    &tx.access_list,
                ],
                &mut out,
            );
        }
        DecodedTransaction::FeeMarket(tx) => {
            let to = ToField(tx.to);
            encode_list(
                &[
                    &tx.chain_id,
                    &tx.nonce,
                    &tx.max_priority_fee_per_gas,
                    &tx.max_fee_per_gas,
                    &tx.gas_limit,
                    &to,
                    &tx.value,
                    &tx.data,
                    &tx.access_list,
                ],
                &mut out,
            );
        }
    }

    out
}

/// keccak256 of [`signable_bytes`].
pub fn signing_hash(tx: &DecodedTransaction) -> B256 {
    keccak256(signable_bytes(tx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::decoder::decode_hex;

    const FEE_MARKET_RAW: &str = "02ef0104843b9aca008506a0c1987d825208945dc69b1fbb13bafd09af88a782f0f285772ad5f8872386f26fc1000080c0";

    #[test]
    fn fee_market_hash_matches_claimed_payload() {
        let tx = decode_hex(FEE_MARKET_RAW).unwrap();
        assert_eq!(
            alloy::hex::encode(signing_hash(&tx)),
            "77b4e74099ce90c08503c0e0bb6e672dbe1c5e3e127ce333bf22eb581cd3f6ce"
        );
    }

    #[test]
    fn unsigned_typed_encoding_reproduces_input() {
        let tx = decode_hex(FEE_MARKET_RAW).unwrap();
        assert_eq!(alloy::hex::encode(signable_bytes(&tx)), FEE_MARKET_RAW);
    }

    #[test]
    fn eip155_legacy_hash() {
        let raw = "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080";
        let tx = decode_hex(raw).unwrap();
        assert_eq!(alloy::hex::encode(signable_bytes(&tx)), raw);
        assert_eq!(
            alloy::hex::encode(signing_hash(&tx)),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn access_list_hash() {
        let raw = "01f88a0180843b9aca00827530945dc69b1fbb13bafd09af88a782f0f285772ad5f88806f05b59d3b2000084deadbeeff85bf859945dc69b1fbb13bafd09af88a782f0f285772ad5f8f842a00000000000000000000000000000000000000000000000000000000000000000a00000000000000000000000000000000000000000000000000000000000000001";
        let tx = decode_hex(raw).unwrap();
        assert_eq!(alloy::hex::encode(signable_bytes(&tx)), raw);
        assert_eq!(
            alloy::hex::encode(signing_hash(&tx)),
            "18b82972ab2e86c8a9cb29ec300ccb0f7a9778737242ee1aa3705824f0b82442"
        );
    }

    #[test]
    fn contract_creation_hash() {
        let raw = "02d60104843b9aca008506a55ad87d82cf088080826080c0";
        let tx = decode_hex(raw).unwrap();
        assert_eq!(
            alloy::hex::encode(signing_hash(&tx)),
            "8e502165adb2538f3057201bbcd5f64c19a4a87f552ebe964233ee755d04705a"
        );
    }

    #[test]
    fn signature_fields_are_excluded() {
        // Same fee-market payload with a trailing (yParity, r, s) = (1, 1, 1).
        let signed = "02f20104843b9aca008506a0c1987d825208945dc69b1fbb13bafd09af88a782f0f285772ad5f8872386f26fc1000080c0010101";
        let tx = decode_hex(signed).unwrap();
        assert!(tx.is_signed());
        assert_eq!(
            alloy::hex::encode(signing_hash(&tx)),
            "77b4e74099ce90c08503c0e0bb6e672dbe1c5e3e127ce333bf22eb581cd3f6ce"
        );
    }

    #[test]
    fn signed_eip155_legacy_hashes_like_its_unsigned_form() {
        let signed = "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";
        let tx = decode_hex(signed).unwrap();
        assert!(tx.is_signed());
        assert_eq!(
            alloy::hex::encode(signable_bytes(&tx)),
            "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
        );
        assert_eq!(
            alloy::hex::encode(signing_hash(&tx)),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn wide_value_survives_pre_eip155_encoding() {
        let raw = "e680018252089435353535353535353535353535353535353535358a0100000000000000000580";
        let tx = decode_hex(raw).unwrap();
        assert_eq!(alloy::hex::encode(signable_bytes(&tx)), raw);
    }

    #[test]
    fn type_byte_prefixes_only_typed_encodings() {
        let typed = decode_hex(FEE_MARKET_RAW).unwrap();
        assert_eq!(signable_bytes(&typed)[0], typed.tx_type().type_byte().unwrap());

        let legacy = decode_hex("ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080").unwrap();
        assert_eq!(legacy.tx_type().type_byte(), None);
        assert_eq!(signable_bytes(&legacy)[0], 0xec);
    }
}
