// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tx_approval_verifier::{
    api::router, config::ServiceConfig, envelope::KeyMaterial, state::AppState, telemetry,
};

/// How long in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    telemetry::init_tracing(config.log_format).expect("Failed to install tracing subscriber");

    let mut keys = match KeyMaterial::load(
        &config.verifier_public_key_path,
        &config.signer_private_key_path,
    ) {
        Ok(keys) => keys,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load key material");
            std::process::exit(1);
        }
    };
    if let Some(key_id) = &config.signer_key_id {
        keys = keys.with_signer_key_id(key_id.clone());
    }
    tracing::info!(
        verifier = %config.verifier_public_key_path.display(),
        signer = %config.signer_private_key_path.display(),
        native_decimals = config.settings.native_decimals,
        "Key material loaded"
    );

    let app = router(AppState::new(keys, config.settings.clone()));
    let addr = config.bind_addr;

    let handle = Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, draining connections");
        shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    match &config.tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                .await
                .expect("Failed to load TLS certificate and key");

            tracing::info!("Verifier listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTPS server failed");
        }
        None => {
            tracing::warn!("TLS_CERT_PATH/TLS_KEY_PATH not set; serving plain HTTP");
            tracing::info!("Verifier listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTP server failed");
        }
    }

    tracing::info!("Verifier stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
