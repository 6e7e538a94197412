/*
 * Copyright 2025 Carver Automation Corporation.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Surrogate id allocation and the user registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::columns;
use crate::document::User;
use crate::settings::TransformSettings;
use crate::table::Sheet;
use crate::timestamp::TimestampNormalizer;

pub(crate) const USER_FIRST_SEEN_BY: &str = "system";
pub(crate) const USER_LAST_SEEN_BY: &str = "audit_scan";

/// Monotonic id counter for one entity type.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Allocate the next id.
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`allocate`](Self::allocate) returns.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// First id of each entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSeeds {
    #[serde(default = "default_users_seed")]
    pub users: u64,
    #[serde(default = "default_assets_seed")]
    pub assets: u64,
    #[serde(default = "default_interfaces_seed")]
    pub interfaces: u64,
    #[serde(default = "default_ips_seed")]
    pub ips: u64,
    #[serde(default = "default_cpes_seed")]
    pub cpes: u64,
    #[serde(default = "default_asset_users_seed")]
    pub asset_users: u64,
    #[serde(default = "default_properties_seed")]
    pub properties: u64,
}

impl Default for IdSeeds {
    fn default() -> Self {
        Self {
            users: default_users_seed(),
            assets: default_assets_seed(),
            interfaces: default_interfaces_seed(),
            ips: default_ips_seed(),
            cpes: default_cpes_seed(),
            asset_users: default_asset_users_seed(),
            properties: default_properties_seed(),
        }
    }
}

const fn default_users_seed() -> u64 {
    1
}

const fn default_assets_seed() -> u64 {
    1001
}

const fn default_interfaces_seed() -> u64 {
    2001
}

const fn default_ips_seed() -> u64 {
    3001
}

const fn default_cpes_seed() -> u64 {
    4001
}

const fn default_asset_users_seed() -> u64 {
    5001
}

const fn default_properties_seed() -> u64 {
    6001
}

/// Counters for every entity type, owned by a single run.
#[derive(Debug, Clone)]
pub struct IdSequences {
    pub users: IdSequence,
    pub assets: IdSequence,
    pub interfaces: IdSequence,
    pub ips: IdSequence,
    pub cpes: IdSequence,
    pub asset_users: IdSequence,
    pub properties: IdSequence,
}

impl IdSequences {
    pub fn new(seeds: &IdSeeds) -> Self {
        Self {
            users: IdSequence::starting_at(seeds.users),
            assets: IdSequence::starting_at(seeds.assets),
            interfaces: IdSequence::starting_at(seeds.interfaces),
            ips: IdSequence::starting_at(seeds.ips),
            cpes: IdSequence::starting_at(seeds.cpes),
            asset_users: IdSequence::starting_at(seeds.asset_users),
            properties: IdSequence::starting_at(seeds.properties),
        }
    }
}

/// Distinct users in first-occurrence order, indexed by username.
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    ids: HashMap<String, u64>,
    users: Vec<User>,
}

impl UserRegistry {
    /// Register every distinct username on the users sheet.
    ///
    /// Rows without a username are skipped and consume no id. Usernames are
    /// trimmed and compared case-sensitively.
    pub fn build(
        sheet: &Sheet,
        ids: &mut IdSequence,
        settings: &TransformSettings,
        timestamps: &TimestampNormalizer,
    ) -> Self {
        let mut registry = Self::default();
        let mut skipped = 0usize;

        for row in sheet.rows() {
            let Some(username) = row.text(columns::user::USERNAME) else {
                skipped += 1;
                continue;
            };
            if registry.ids.contains_key(&username) {
                continue;
            }

            let auser_id = ids.allocate();
            let now = timestamps.now_string();
            registry.ids.insert(username.clone(), auser_id);
            registry.users.push(User {
                auser_id,
                customer_id: settings.customer_id,
                auser_username: username,
                auser_first_seen_dt: timestamps.normalize(row.get(columns::user::FIRST_SEEN)),
                auser_first_seen_by: USER_FIRST_SEEN_BY.to_string(),
                auser_last_seen_dt: timestamps.normalize(row.get(columns::user::LAST_SEEN)),
                auser_last_seen_by: USER_LAST_SEEN_BY.to_string(),
                created_dt: now.clone(),
                updated_dt: now,
            });
        }

        if skipped > 0 {
            tracing::debug!(skipped, "Skipped user rows without a username");
        }
        tracing::debug!(users = registry.users.len(), "Built user registry");

        registry
    }

    pub fn resolve(&self, username: &str) -> Option<u64> {
        self.ids.get(username.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn into_users(self) -> Vec<User> {
        self.users
    }
}
