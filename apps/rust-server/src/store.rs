// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory profile store.
//!
//! Holds user profiles for the lifetime of the process. Callers serialize
//! access through the `RwLock` in [`AppState`](crate::state::AppState).

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::UserProfile;

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<String, UserProfile>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_user(&self, id: &str) -> Result<UserProfile, ApiError> {
        self.users
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    /// Applies `patch` to the profile `id`, creating it when absent.
    pub fn update_user(&mut self, id: &str, patch: Map<String, Value>) -> UserProfile {
        let profile = self
            .users
            .entry(id.to_string())
            .or_insert_with(|| UserProfile::new(id));
        profile.apply_patch(patch);
        profile.clone()
    }

    pub fn delete_user(&mut self, id: &str) -> Result<(), ApiError> {
        if self.users.remove(id).is_some() {
            Ok(())
        } else {
            Err(ApiError::not_found("User not found"))
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
