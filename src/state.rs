// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{GateSettings, KeyCache, SsoGate, TokenValidator};

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<SsoGate>,
    pub keys: KeyCache,
}

impl AppState {
    pub fn new(keys: KeyCache, settings: GateSettings) -> Self {
        let gate = SsoGate::new(TokenValidator::new(keys.clone()), settings);
        Self {
            gate: Arc::new(gate),
            keys,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(KeyCache::new(), GateSettings::default())
    }
}
