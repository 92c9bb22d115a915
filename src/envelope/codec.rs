// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RS256 compact JWS verification and signing.
//!
//! ## Security
//!
//! - Only RS256 is accepted; any other header algorithm is rejected before
//!   signature verification (algorithm-confusion protection)
//! - No registered claim is required, but `exp`/`nbf` are enforced when
//!   present, with a 60 second clock skew tolerance
//! - Errors never carry any part of the rejected envelope

use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;

use super::error::{AuthError, SigningError};
use crate::models::ApprovalClaims;

/// The only algorithm accepted inbound and used outbound.
pub const ENVELOPE_ALGORITHM: Algorithm = Algorithm::RS256;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Header, claims, signature.
const COMPACT_SEGMENTS: usize = 3;

fn validation() -> Validation {
    let mut validation = Validation::new(ENVELOPE_ALGORITHM);
    validation.required_spec_claims.clear();
    validation.validate_aud = false;
    validation.validate_nbf = true;
    validation.leeway = CLOCK_SKEW_LEEWAY;
    validation
}

/// Verify an inbound envelope and return its claims.
///
/// Business fields are not validated beyond what deserialization requires
/// (a `requestId` must be present).
pub fn verify(envelope: &[u8], verifier: &DecodingKey) -> Result<ApprovalClaims, AuthError> {
    let token = std::str::from_utf8(envelope)
        .map_err(|_| AuthError::MalformedEnvelope)?
        .trim();

    if token.split('.').count() != COMPACT_SEGMENTS {
        return Err(AuthError::MalformedEnvelope);
    }

    let header = decode_header(token)?;
    if header.alg != ENVELOPE_ALGORITHM {
        return Err(AuthError::AlgorithmMismatch);
    }

    let token_data = decode::<ApprovalClaims>(token, verifier, &validation())?;
    Ok(token_data.claims)
}

/// Sign an outbound payload as an RS256 compact JWS.
pub fn sign<T: Serialize>(
    payload: &T,
    signer: &EncodingKey,
    key_id: Option<&str>,
) -> Result<String, SigningError> {
    let mut header = Header::new(ENVELOPE_ALGORITHM);
    header.kid = key_id.map(str::to_owned);
    Ok(encode(&header, payload, signer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::keys::fixtures::*;
    use crate::models::{Action, Decision};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use serde_json::{json, Value};

    fn claims_json() -> Value {
        json!({
            "requestId": "2b6b2e4a-91d7-4f55-8f0e-1f1f4c3a9d20",
            "asset": "ETH",
            "destinations": [{
                "amountNative": 0.01,
                "displayDstAddress": "0x5dC69B1Fbb13Bafd09af88a782F0F285772Ad5f8"
            }],
            "rawTx": [{
                "rawTx": "02ef0104843b9aca008506a0c1987d825208945dc69b1fbb13bafd09af88a782f0f285772ad5f8872386f26fc1000080c0",
                "payload": "77b4e74099ce90c08503c0e0bb6e672dbe1c5e3e127ce333bf22eb581cd3f6ce"
            }]
        })
    }

    fn sign_with(private_pem: &str, alg: Algorithm, claims: &Value) -> String {
        let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).unwrap();
        encode(&Header::new(alg), claims, &key).unwrap()
    }

    fn verifier() -> DecodingKey {
        DecodingKey::from_rsa_pem(COUNTERPARTY_PUBLIC.as_bytes()).unwrap()
    }

    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    #[test]
    fn correctly_signed_envelope_yields_identical_claims() {
        let original = claims_json();
        let token = sign_with(COUNTERPARTY_PRIVATE, Algorithm::RS256, &original);

        let claims = verify(token.as_bytes(), &verifier()).unwrap();
        let expected: ApprovalClaims = serde_json::from_value(original).unwrap();
        assert_eq!(claims, expected);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let token = sign_with(COUNTERPARTY_PRIVATE, Algorithm::RS256, &claims_json());
        let body = format!("{token}\r\n");
        assert!(verify(body.as_bytes(), &verifier()).is_ok());
    }

    #[test]
    fn envelope_signed_by_other_key_is_rejected() {
        let token = sign_with(ROGUE_PRIVATE, Algorithm::RS256, &claims_json());
        assert_eq!(
            verify(token.as_bytes(), &verifier()),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn tampered_claims_are_rejected() {
        let token = sign_with(COUNTERPARTY_PRIVATE, Algorithm::RS256, &claims_json());
        let parts: Vec<&str> = token.split('.').collect();

        let mut tampered = claims_json();
        tampered["destinations"][0]["amountNative"] = json!(100);
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&tampered).unwrap());
        let token = format!("{}.{}.{}", parts[0], forged, parts[2]);

        assert_eq!(
            verify(token.as_bytes(), &verifier()),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn other_rsa_algorithms_are_rejected() {
        let token = sign_with(COUNTERPARTY_PRIVATE, Algorithm::RS384, &claims_json());
        assert_eq!(
            verify(token.as_bytes(), &verifier()),
            Err(AuthError::AlgorithmMismatch)
        );
    }

    #[test]
    fn hmac_with_public_key_as_secret_is_rejected() {
        let key = EncodingKey::from_secret(COUNTERPARTY_PUBLIC.as_bytes());
        let token = encode(&Header::new(Algorithm::HS256), &claims_json(), &key).unwrap();
        assert_eq!(
            verify(token.as_bytes(), &verifier()),
            Err(AuthError::AlgorithmMismatch)
        );
    }

    #[test]
    fn unsigned_alg_none_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims_json()).unwrap());
        let token = format!("{header}.{claims}.");

        let err = verify(token.as_bytes(), &verifier()).unwrap_err();
        assert!(matches!(
            err,
            AuthError::MalformedEnvelope | AuthError::AlgorithmMismatch
        ));
    }

    #[test]
    fn structurally_malformed_envelopes_are_rejected() {
        let bodies: [&[u8]; 5] = [b"not-a-token", b"a.b", b"a.b.c.d", b"", &[0xff, 0xfe, 0x2e]];
        for body in bodies {
            assert_eq!(
                verify(body, &verifier()),
                Err(AuthError::MalformedEnvelope),
                "{body:?}"
            );
        }
    }

    #[test]
    fn signed_claims_without_request_id_are_malformed() {
        let token = sign_with(COUNTERPARTY_PRIVATE, Algorithm::RS256, &json!({ "rawTx": [] }));
        assert_eq!(
            verify(token.as_bytes(), &verifier()),
            Err(AuthError::MalformedEnvelope)
        );
    }

    #[test]
    fn expiry_is_enforced_when_present() {
        let mut claims = claims_json();
        claims["exp"] = json!(now() - 3600);
        let token = sign_with(COUNTERPARTY_PRIVATE, Algorithm::RS256, &claims);
        assert_eq!(verify(token.as_bytes(), &verifier()), Err(AuthError::Expired));

        claims["exp"] = json!(now() + 3600);
        let token = sign_with(COUNTERPARTY_PRIVATE, Algorithm::RS256, &claims);
        assert!(verify(token.as_bytes(), &verifier()).is_ok());
    }

    #[test]
    fn not_before_is_enforced_when_present() {
        let mut claims = claims_json();
        claims["nbf"] = json!(now() + 3600);
        let token = sign_with(COUNTERPARTY_PRIVATE, Algorithm::RS256, &claims);
        assert_eq!(
            verify(token.as_bytes(), &verifier()),
            Err(AuthError::NotYetValid)
        );

        // Within the clock skew tolerance.
        claims["nbf"] = json!(now() + 30);
        let token = sign_with(COUNTERPARTY_PRIVATE, Algorithm::RS256, &claims);
        assert!(verify(token.as_bytes(), &verifier()).is_ok());
    }

    #[test]
    fn signed_decision_verifies_under_service_public_key() {
        let decision = Decision {
            action: Action::Approve,
            request_id: "req-9".to_string(),
            rejection_reason: None,
        };
        let keys = service_keys();
        let token = sign(&decision, keys.signer(), Some("decision-key-1")).unwrap();

        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("decision-key-1"));

        let public = DecodingKey::from_rsa_pem(SERVICE_PUBLIC.as_bytes()).unwrap();
        let decoded = decode::<Decision>(&token, &public, &validation()).unwrap();
        assert_eq!(decoded.claims, decision);
    }
}
