// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::config::VerifierSettings;
use crate::envelope::KeyMaterial;

/// Shared, read-only request context.
#[derive(Clone, Debug)]
pub struct AppState {
    pub keys: Arc<KeyMaterial>,
    pub settings: Arc<VerifierSettings>,
}

impl AppState {
    pub fn new(keys: KeyMaterial, settings: VerifierSettings) -> Self {
        Self {
            keys: Arc::new(keys),
            settings: Arc::new(settings),
        }
    }
}
