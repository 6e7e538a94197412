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

//! Ingestion document records.
//!
//! Field names are the ingestion API's snake_case schema. Every child
//! collection is always serialized, empty or not.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Top-level ingestion document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InventoryDocument {
    pub ausers: Vec<User>,
    pub assets: Vec<Asset>,
}

/// A distinct user seen on any asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub auser_id: u64,
    pub customer_id: i64,
    pub auser_username: String,
    pub auser_first_seen_dt: String,
    pub auser_first_seen_by: String,
    pub auser_last_seen_dt: String,
    pub auser_last_seen_by: String,
    pub created_dt: String,
    pub updated_dt: String,
}

/// One asset row with its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: u64,
    pub customer_id: i64,
    pub asset_unique_id: Option<String>,
    /// Exposure level, safety and zone are copied as found: normally an
    /// integer id, but free text (e.g. `"DMZ"`) is kept rather than dropped.
    pub exple_id: Value,
    pub safie_id: Value,
    pub zone_id: Value,
    pub asset_name: String,
    pub asset_alias: String,
    pub asset_desc: String,
    pub asset_type: String,
    pub asset_status: String,
    pub asset_value: f64,
    pub asset_acquisition_dt: String,
    pub asset_location: String,
    pub asset_additional_info: String,
    pub asset_owner: String,
    pub asset_owner_contact: String,
    pub asset_business_owner: String,
    pub asset_business_owner_contact: String,
    pub asset_tech_owner: String,
    pub asset_tech_owner_contact: String,
    pub asset_risk_score_sum: i64,
    pub asset_last_reported_dt: String,
    pub asset_impact_confidentiality: i64,
    pub asset_impact_integrity: i64,
    pub asset_impact_availability: i64,
    pub asset_impact_criticality: i64,
    pub socia_risk: String,
    pub socia_risk_updated_dt: String,
    pub created_dt: String,
    pub updated_dt: String,
    pub assets_ausers: Vec<AssetUser>,
    pub assets_interfaces: Vec<AssetInterface>,
    pub assets_cpes: Vec<AssetCpe>,
    pub assets_properties: Vec<AssetProperty>,
}

/// Link from an asset to a registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetUser {
    pub asaus_id: u64,
    pub auser_id: u64,
    pub asaus_first_seen_dt: String,
    pub asaus_first_seen_by: String,
    pub asaus_last_seen_dt: String,
    pub asaus_last_seen_by: String,
    pub created_dt: String,
    pub updated_dt: String,
}

/// Network interface, keyed by MAC address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInterface {
    pub asint_id: u64,
    pub asint_unique_id: Option<String>,
    pub asint_mac_address: Option<String>,
    pub asint_first_seen_dt: String,
    pub asint_first_seen_by: String,
    pub asint_last_seen_dt: String,
    pub asint_last_seen_by: String,
    pub created_dt: String,
    pub updated_dt: String,
    pub assets_interfaces_ips: Vec<InterfaceIp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceIp {
    pub ainip_id: u64,
    pub ainip_unique_id: String,
    pub ainip_type: String,
    pub ainip_value: String,
    pub ainip_first_seen_dt: String,
    pub ainip_first_seen_by: String,
    pub ainip_last_seen_dt: String,
    pub ainip_last_seen_by: String,
    pub created_dt: String,
    pub updated_dt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCpe {
    pub ascpe_id: u64,
    pub ascpe_cpe: String,
    pub ascpe_first_seen_dt: String,
    pub ascpe_first_seen_by: String,
    pub ascpe_last_seen_dt: String,
    pub ascpe_last_seen_by: String,
    pub created_dt: String,
    pub updated_dt: String,
}

/// Free-form name/value attribute; host names use the name `hostname`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetProperty {
    pub aspro_id: u64,
    pub aspro_name: String,
    pub aspro_value: String,
    pub created_dt: String,
    pub updated_dt: String,
}

impl InventoryDocument {
    /// Pretty-printed JSON (two-space indent, UTF-8 preserved).
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Write the document to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<Vec<u8>> {
        let data = self.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        fs::write(path, &data).map_err(|e| Error::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        tracing::info!(
            path = %path.display(),
            users = self.ausers.len(),
            assets = self.assets.len(),
            bytes = data.len(),
            "Wrote inventory document"
        );

        Ok(data)
    }
}
