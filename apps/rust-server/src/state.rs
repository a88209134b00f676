// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::RwLock;

use crate::auth::AuthConfig;
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub auth: AuthConfig,
    /// Number of keys in the loaded defaults bundle, 0 when none was loaded.
    pub defaults_keys: usize,
}

impl AppState {
    pub fn new(store: InMemoryStore, auth: AuthConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            auth,
            defaults_keys: 0,
        }
    }

    pub fn with_defaults_keys(mut self, count: usize) -> Self {
        self.defaults_keys = count;
        self
    }
}

impl FromRef<AppState> for AuthConfig {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
