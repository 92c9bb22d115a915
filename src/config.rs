// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `VERIFIER_PUBLIC_KEY_PATH` | PEM public key of the calling signer | Required |
//! | `SIGNER_PRIVATE_KEY_PATH` | PEM private key used to sign decisions | Required |
//! | `SIGNER_KEY_ID` | `kid` header stamped on outbound envelopes | Optional |
//! | `NATIVE_DECIMALS` | Decimal exponent of the native asset | `18` |
//! | `TLS_CERT_PATH` | PEM certificate chain for HTTPS | Optional |
//! | `TLS_KEY_PATH` | PEM private key for HTTPS | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, path::PathBuf};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Public key that authenticates inbound envelopes.
pub const VERIFIER_PUBLIC_KEY_PATH_ENV: &str = "VERIFIER_PUBLIC_KEY_PATH";

/// Private key that signs outbound decisions.
pub const SIGNER_PRIVATE_KEY_PATH_ENV: &str = "SIGNER_PRIVATE_KEY_PATH";

pub const SIGNER_KEY_ID_ENV: &str = "SIGNER_KEY_ID";
pub const NATIVE_DECIMALS_ENV: &str = "NATIVE_DECIMALS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Decimal exponent of ETH and most EVM native assets.
pub const DEFAULT_NATIVE_DECIMALS: u8 = 18;

/// Above this `10^decimals` no longer leaves room for a meaningful U256 amount.
const MAX_NATIVE_DECIMALS: u8 = 36;

/// Configuration errors, fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected `json` or `pretty`, got `{other}`")),
        }
    }
}

/// Settings consumed by the verification pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierSettings {
    /// `amountNative = value / 10^native_decimals`.
    pub native_decimals: u8,
}

impl Default for VerifierSettings {
    fn default() -> Self {
        Self {
            native_decimals: DEFAULT_NATIVE_DECIMALS,
        }
    }
}

/// HTTPS certificate and key paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub verifier_public_key_path: PathBuf,
    pub signer_private_key_path: PathBuf,
    pub signer_key_id: Option<String>,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
    pub settings: VerifierSettings,
}

impl ServiceConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    name: HOST_ENV,
                    reason: e.to_string(),
                })?;

        let native_decimals = match get(NATIVE_DECIMALS_ENV) {
            Some(raw) => {
                let decimals = raw.trim().parse::<u8>().map_err(|e| ConfigError::Invalid {
                    name: NATIVE_DECIMALS_ENV,
                    reason: e.to_string(),
                })?;
                if decimals > MAX_NATIVE_DECIMALS {
                    return Err(ConfigError::Invalid {
                        name: NATIVE_DECIMALS_ENV,
                        reason: format!("must be at most {MAX_NATIVE_DECIMALS}"),
                    });
                }
                decimals
            }
            None => DEFAULT_NATIVE_DECIMALS,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                name: LOG_FORMAT_ENV,
                reason,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            verifier_public_key_path: require(VERIFIER_PUBLIC_KEY_PATH_ENV)?.into(),
            signer_private_key_path: require(SIGNER_PRIVATE_KEY_PATH_ENV)?.into(),
            signer_key_id: get(SIGNER_KEY_ID_ENV),
            tls,
            log_format,
            settings: VerifierSettings { native_decimals },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const KEYS: [(&str, &str); 2] = [
        (VERIFIER_PUBLIC_KEY_PATH_ENV, "/keys/counterparty.pem"),
        (SIGNER_PRIVATE_KEY_PATH_ENV, "/keys/service.pem"),
    ];

    #[test]
    fn defaults_apply() {
        let config = ServiceConfig::from_lookup(lookup(&KEYS)).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.settings.native_decimals, 18);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.tls.is_none());
        assert!(config.signer_key_id.is_none());
    }

    #[test]
    fn key_paths_are_required() {
        let err = ServiceConfig::from_lookup(lookup(&[KEYS[0]])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(SIGNER_PRIVATE_KEY_PATH_ENV)));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = KEYS.to_vec();
        vars.extend([
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9443"),
            (NATIVE_DECIMALS_ENV, "6"),
            (LOG_FORMAT_ENV, "JSON"),
            (SIGNER_KEY_ID_ENV, "decision-key-1"),
            (TLS_CERT_PATH_ENV, "/tls/cert.pem"),
            (TLS_KEY_PATH_ENV, "/tls/key.pem"),
        ]);
        let config = ServiceConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9443".parse::<SocketAddr>().unwrap());
        assert_eq!(config.settings.native_decimals, 6);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.signer_key_id.as_deref(), Some("decision-key-1"));
        assert_eq!(config.tls.unwrap().cert, PathBuf::from("/tls/cert.pem"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut vars = KEYS.to_vec();
        vars.push((PORT_ENV, "not-a-port"));
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { name: PORT_ENV, .. })
        ));

        let mut vars = KEYS.to_vec();
        vars.push((NATIVE_DECIMALS_ENV, "80"));
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { name: NATIVE_DECIMALS_ENV, .. })
        ));

        let mut vars = KEYS.to_vec();
        vars.push((LOG_FORMAT_ENV, "xml"));
        assert!(ServiceConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn tls_requires_both_paths() {
        let mut vars = KEYS.to_vec();
        vars.push((TLS_CERT_PATH_ENV, "/tls/cert.pem"));
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Missing(TLS_KEY_PATH_ENV))
        ));
    }
}
