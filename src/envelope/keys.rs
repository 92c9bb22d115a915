// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-wide RSA key material.
//!
//! Loaded once at startup and shared read-only behind an `Arc`; request
//! handling never mutates it.

use std::path::Path;

use jsonwebtoken::{DecodingKey, EncodingKey};

use super::error::KeyError;

const PUBLIC_KEY_LABELS: &[&str] = &["PUBLIC KEY", "RSA PUBLIC KEY"];
const PRIVATE_KEY_LABELS: &[&str] = &["RSA PRIVATE KEY", "PRIVATE KEY"];

/// Verifier public key plus signer private key.
#[derive(Clone)]
pub struct KeyMaterial {
    /// Counterparty key that authenticates inbound envelopes
    verifier: DecodingKey,
    /// This service's key that signs outbound decisions
    signer: EncodingKey,
    /// Optional `kid` header for outbound envelopes
    signer_key_id: Option<String>,
}

impl KeyMaterial {
    /// Build from PEM-encoded RSA keys.
    pub fn from_pem(verifier_public_pem: &[u8], signer_private_pem: &[u8]) -> Result<Self, KeyError> {
        check_label(verifier_public_pem, "verifier public key", PUBLIC_KEY_LABELS)?;
        check_label(signer_private_pem, "signer private key", PRIVATE_KEY_LABELS)?;

        let verifier = DecodingKey::from_rsa_pem(verifier_public_pem).map_err(KeyError::InvalidKey)?;
        let signer = EncodingKey::from_rsa_pem(signer_private_pem).map_err(KeyError::InvalidKey)?;

        Ok(Self {
            verifier,
            signer,
            signer_key_id: None,
        })
    }

    /// Read both PEM files from disk.
    pub fn load(verifier_public_path: &Path, signer_private_path: &Path) -> Result<Self, KeyError> {
        let public_pem = read_key_file(verifier_public_path)?;
        let private_pem = read_key_file(signer_private_path)?;
        Self::from_pem(&public_pem, &private_pem)
    }

    /// Stamp outbound envelopes with a `kid` header.
    pub fn with_signer_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.signer_key_id = Some(key_id.into());
        self
    }

    pub fn verifier(&self) -> &DecodingKey {
        &self.verifier
    }

    pub fn signer(&self) -> &EncodingKey {
        &self.signer
    }

    pub fn signer_key_id(&self) -> Option<&str> {
        self.signer_key_id.as_deref()
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("verifier", &"<rsa public key>")
            .field("signer", &"<redacted>")
            .field("signer_key_id", &self.signer_key_id)
            .finish()
    }
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, KeyError> {
    std::fs::read(path).map_err(|source| KeyError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn check_label(pem_bytes: &[u8], role: &'static str, accepted: &'static [&'static str]) -> Result<(), KeyError> {
    let parsed = pem::parse(pem_bytes)?;
    if accepted.iter().any(|label| *label == parsed.tag()) {
        Ok(())
    } else {
        Err(KeyError::UnexpectedLabel {
            role,
            found: parsed.tag().to_string(),
            expected: accepted.join(", "),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_fixture_pems() {
        let keys = service_keys();
        assert!(keys.signer_key_id().is_none());
        let keys = keys.with_signer_key_id("decision-key-1");
        assert_eq!(keys.signer_key_id(), Some("decision-key-1"));
    }

    #[test]
    fn loads_from_files() {
        let mut public = tempfile::NamedTempFile::new().unwrap();
        public.write_all(COUNTERPARTY_PUBLIC.as_bytes()).unwrap();
        let mut private = tempfile::NamedTempFile::new().unwrap();
        private.write_all(SERVICE_PRIVATE.as_bytes()).unwrap();

        assert!(KeyMaterial::load(public.path(), private.path()).is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KeyMaterial::load(&dir.path().join("absent.pem"), &dir.path().join("absent.pem"))
            .unwrap_err();
        assert!(matches!(err, KeyError::Io { .. }));
    }

    #[test]
    fn swapped_keys_are_rejected_by_label() {
        let err = KeyMaterial::from_pem(SERVICE_PRIVATE.as_bytes(), COUNTERPARTY_PUBLIC.as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            KeyError::UnexpectedLabel {
                role: "verifier public key",
                ..
            }
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = KeyMaterial::from_pem(b"not a pem", SERVICE_PRIVATE.as_bytes()).unwrap_err();
        assert!(matches!(err, KeyError::Pem(_)));
    }

    #[test]
    fn debug_output_redacts_keys() {
        let rendered = format!("{:?}", service_keys());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("BEGIN"));
    }
}
