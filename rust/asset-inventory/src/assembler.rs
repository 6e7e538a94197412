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

//! Tree assembly.
//!
//! Joins the flat inventory sheets into one nested [`InventoryDocument`]:
//!
//! 1. The user registry is built in full from the users sheet.
//! 2. Every child sheet is indexed once by its natural key.
//! 3. Each asset row becomes exactly one [`Asset`], with users, interfaces
//!    (and their IPs), CPEs and properties attached in source order.
//!
//! A user row whose username is not registered produces a [`LinkError`]
//! and no link; the rest of the asset and the run are unaffected.

use std::net::IpAddr;

use crate::columns::{self, ASSET_KEY};
use crate::document::{
    Asset, AssetCpe, AssetInterface, AssetProperty, AssetUser, InterfaceIp, InventoryDocument,
};
use crate::error::LinkError;
use crate::identity::{IdSequences, UserRegistry};
use crate::settings::TransformSettings;
use crate::table::{JoinIndex, Row, Sheet};
use crate::timestamp::{Clock, TimestampNormalizer};
use crate::workbook::InventoryTables;

const LINK_FIRST_SEEN_BY: &str = "scan";
const LINK_LAST_SEEN_BY: &str = "monitor";
const NETWORK_FIRST_SEEN_BY: &str = "deployment";
const NETWORK_LAST_SEEN_BY: &str = "monitoring";

const HOSTNAME_PROPERTY: &str = "hostname";

/// Output of one transform run.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: InventoryDocument,
    /// Asset-user links that could not be resolved.
    pub link_errors: Vec<LinkError>,
}

/// Transform the inventory tables into an ingestion document.
///
/// Counters restart from `settings.seeds` and the clock is read once, so the
/// same tables, settings and clock always yield the same document.
pub fn assemble(
    tables: &InventoryTables,
    settings: &TransformSettings,
    clock: &dyn Clock,
) -> Assembly {
    let timestamps = TimestampNormalizer::new(clock, settings.day_first);
    let mut ids = IdSequences::new(&settings.seeds);

    let registry = UserRegistry::build(&tables.users, &mut ids.users, settings, &timestamps);

    let mut assembler = TreeAssembler::new(tables, settings, timestamps, ids, &registry);

    let assets: Vec<Asset> = tables
        .assets
        .rows()
        .map(|row| assembler.build_asset(row))
        .collect();
    let link_errors = assembler.link_errors;

    for err in &link_errors {
        tracing::warn!(error = %err, "Skipped asset-user link");
    }
    tracing::info!(
        users = registry.len(),
        assets = assets.len(),
        link_errors = link_errors.len(),
        "Assembled inventory document"
    );

    Assembly {
        document: InventoryDocument {
            ausers: registry.into_users(),
            assets,
        },
        link_errors,
    }
}

struct TreeAssembler<'a> {
    tables: &'a InventoryTables,
    settings: &'a TransformSettings,
    timestamps: TimestampNormalizer,
    ids: IdSequences,
    registry: &'a UserRegistry,
    users_by_asset: JoinIndex,
    interfaces_by_asset: JoinIndex,
    ips_by_mac: JoinIndex,
    cpes_by_asset: JoinIndex,
    properties_by_asset: JoinIndex,
    hostnames_by_asset: JoinIndex,
    /// IP rows already nested under an interface; an IP has one owner.
    claimed_ips: Vec<bool>,
    link_errors: Vec<LinkError>,
}

impl<'a> TreeAssembler<'a> {
    fn new(
        tables: &'a InventoryTables,
        settings: &'a TransformSettings,
        timestamps: TimestampNormalizer,
        ids: IdSequences,
        registry: &'a UserRegistry,
    ) -> Self {
        Self {
            tables,
            settings,
            timestamps,
            ids,
            registry,
            users_by_asset: JoinIndex::build(&tables.users, ASSET_KEY),
            interfaces_by_asset: JoinIndex::build(&tables.interfaces, ASSET_KEY),
            ips_by_mac: JoinIndex::build(&tables.ips, columns::interface::MAC),
            cpes_by_asset: JoinIndex::build(&tables.cpes, ASSET_KEY),
            properties_by_asset: JoinIndex::build(&tables.properties, ASSET_KEY),
            hostnames_by_asset: JoinIndex::build(&tables.hostnames, ASSET_KEY),
            claimed_ips: vec![false; tables.ips.len()],
            link_errors: Vec::new(),
        }
    }

    fn build_asset(&mut self, row: Row<'a>) -> Asset {
        use columns::asset as col;

        let asset_id = self.ids.assets.allocate();
        let asset_key = row.text(col::UNIQUE_NAME);
        let now = self.timestamps.now_string();
        let defaults = &self.settings.defaults;

        let mut asset = Asset {
            asset_id,
            customer_id: self.settings.customer_id,
            asset_unique_id: asset_key.clone(),
            exple_id: row.raw(col::EXPOSURE_LEVEL),
            safie_id: row.raw(col::SAFETY),
            zone_id: row.raw(col::ZONE),
            asset_name: text_or_default(&row, col::NAME),
            asset_alias: text_or_default(&row, col::ALIAS),
            asset_desc: text_or_default(&row, col::DESCRIPTION),
            asset_type: text_or_default(&row, col::TYPE),
            asset_status: text_or_default(&row, col::STATUS),
            asset_value: asset_value(&row),
            asset_acquisition_dt: self.timestamps.normalize(row.get(col::ACQUIRED)),
            asset_location: text_or_default(&row, col::LOCATION),
            asset_additional_info: text_or_default(&row, col::ADDITIONAL_INFO),
            asset_owner: text_or_default(&row, col::OWNER),
            asset_owner_contact: text_or_default(&row, col::OWNER_CONTACT),
            asset_business_owner: text_or_default(&row, col::BUSINESS_OWNER),
            asset_business_owner_contact: text_or_default(&row, col::BUSINESS_OWNER_CONTACT),
            asset_tech_owner: text_or_default(&row, col::TECH_OWNER),
            asset_tech_owner_contact: text_or_default(&row, col::TECH_OWNER_CONTACT),
            asset_risk_score_sum: defaults.risk_score_sum,
            asset_last_reported_dt: now.clone(),
            asset_impact_confidentiality: defaults.impact_confidentiality,
            asset_impact_integrity: defaults.impact_integrity,
            asset_impact_availability: defaults.impact_availability,
            asset_impact_criticality: defaults.impact_criticality,
            socia_risk: defaults.socia_risk.clone(),
            socia_risk_updated_dt: now.clone(),
            created_dt: now.clone(),
            updated_dt: now,
            assets_ausers: Vec::new(),
            assets_interfaces: Vec::new(),
            assets_cpes: Vec::new(),
            assets_properties: Vec::new(),
        };

        let Some(key) = asset_key else {
            tracing::warn!(
                asset_id,
                row = row.index(),
                "Asset row has no unique name; no children can be joined"
            );
            return asset;
        };

        asset.assets_ausers = self.join_users(asset_id, &key);
        asset.assets_interfaces = self.join_interfaces(&key);
        asset.assets_cpes = self.join_cpes(&key);
        asset.assets_properties = self.join_properties(&key);

        tracing::debug!(
            asset_id,
            asset_unique_id = %key,
            users = asset.assets_ausers.len(),
            interfaces = asset.assets_interfaces.len(),
            cpes = asset.assets_cpes.len(),
            properties = asset.assets_properties.len(),
            "Assembled asset"
        );

        asset
    }

    fn join_users(&mut self, asset_id: u64, key: &str) -> Vec<AssetUser> {
        let tables = self.tables;
        let sheet = &tables.users;
        let mut links = Vec::new();

        for &pos in self.users_by_asset.lookup(key) {
            let Some(row) = sheet.row(pos) else { continue };

            let Some(username) = row.text(columns::user::USERNAME) else {
                self.link_errors
                    .push(LinkError::MissingUsername { asset_id, row: pos });
                continue;
            };

            let Some(auser_id) = self.registry.resolve(&username) else {
                self.link_errors
                    .push(LinkError::UnresolvedUser { asset_id, username });
                continue;
            };

            let now = self.timestamps.now_string();
            links.push(AssetUser {
                asaus_id: self.ids.asset_users.allocate(),
                auser_id,
                asaus_first_seen_dt: now.clone(),
                asaus_first_seen_by: LINK_FIRST_SEEN_BY.to_string(),
                asaus_last_seen_dt: now.clone(),
                asaus_last_seen_by: LINK_LAST_SEEN_BY.to_string(),
                created_dt: now.clone(),
                updated_dt: now,
            });
        }

        links
    }

    fn join_interfaces(&mut self, key: &str) -> Vec<AssetInterface> {
        let tables = self.tables;
        let sheet = &tables.interfaces;
        let mut interfaces = Vec::new();

        let positions = self.interfaces_by_asset.lookup(key).to_vec();
        for pos in positions {
            let Some(row) = sheet.row(pos) else { continue };

            let asint_id = self.ids.interfaces.allocate();
            let mac = row.text(columns::interface::MAC);
            let ips = match mac.as_deref() {
                Some(mac) => self.join_ips(key, mac),
                None => Vec::new(),
            };

            let now = self.timestamps.now_string();
            interfaces.push(AssetInterface {
                asint_id,
                asint_unique_id: mac.clone(),
                asint_mac_address: mac,
                asint_first_seen_dt: now.clone(),
                asint_first_seen_by: NETWORK_FIRST_SEEN_BY.to_string(),
                asint_last_seen_dt: now.clone(),
                asint_last_seen_by: NETWORK_LAST_SEEN_BY.to_string(),
                created_dt: now.clone(),
                updated_dt: now,
                assets_interfaces_ips: ips,
            });
        }

        interfaces
    }

    fn join_ips(&mut self, asset_key: &str, mac: &str) -> Vec<InterfaceIp> {
        let tables = self.tables;
        let sheet = &tables.ips;
        let mut ips = Vec::new();

        for &pos in self.ips_by_mac.lookup(mac) {
            if self.claimed_ips[pos] {
                tracing::debug!(mac, row = pos, "IP already nested under another interface");
                continue;
            }
            let Some(row) = sheet.row(pos) else { continue };
            self.claimed_ips[pos] = true;

            let value = row.text(columns::interface::IP).unwrap_or_default();
            let now = self.timestamps.now_string();
            ips.push(InterfaceIp {
                ainip_id: self.ids.ips.allocate(),
                ainip_unique_id: ip_unique_id(asset_key, mac),
                ainip_type: ip_type(&value).to_string(),
                ainip_value: value,
                ainip_first_seen_dt: now.clone(),
                ainip_first_seen_by: NETWORK_FIRST_SEEN_BY.to_string(),
                ainip_last_seen_dt: now.clone(),
                ainip_last_seen_by: NETWORK_LAST_SEEN_BY.to_string(),
                created_dt: now.clone(),
                updated_dt: now,
            });
        }

        ips
    }

    fn join_cpes(&mut self, key: &str) -> Vec<AssetCpe> {
        let tables = self.tables;
        let sheet = &tables.cpes;
        let mut cpes = Vec::new();

        for &pos in self.cpes_by_asset.lookup(key) {
            let Some(row) = sheet.row(pos) else { continue };

            let now = self.timestamps.now_string();
            cpes.push(AssetCpe {
                ascpe_id: self.ids.cpes.allocate(),
                ascpe_cpe: text_or_default(&row, columns::cpe::CPE),
                ascpe_first_seen_dt: now.clone(),
                ascpe_first_seen_by: LINK_FIRST_SEEN_BY.to_string(),
                ascpe_last_seen_dt: now.clone(),
                ascpe_last_seen_by: LINK_LAST_SEEN_BY.to_string(),
                created_dt: now.clone(),
                updated_dt: now,
            });
        }

        cpes
    }

    fn join_properties(&mut self, key: &str) -> Vec<AssetProperty> {
        let mut entries = Vec::new();
        collect_properties(
            &self.tables.properties,
            self.properties_by_asset.lookup(key),
            &mut entries,
        );
        collect_hostnames(
            &self.tables.hostnames,
            self.hostnames_by_asset.lookup(key),
            &mut entries,
        );

        let now = self.timestamps.now_string();
        entries
            .into_iter()
            .map(|(name, value)| AssetProperty {
                aspro_id: self.ids.properties.allocate(),
                aspro_name: name,
                aspro_value: value,
                created_dt: now.clone(),
                updated_dt: now.clone(),
            })
            .collect()
    }
}

/// Name/value pairs from the properties sheet.
///
/// A row with a `HostName` cell and no `Propiedad` cell is a host name.
fn collect_properties(sheet: &Sheet, positions: &[usize], out: &mut Vec<(String, String)>) {
    for row in positions.iter().filter_map(|&pos| sheet.row(pos)) {
        let name = row.text(columns::property::NAME);
        let value = row.text(columns::property::VALUE);
        let hostname = row.text(columns::property::HOSTNAME);

        match (name, value, hostname) {
            (Some(name), value, _) => out.push((name, value.unwrap_or_default())),
            (None, Some(value), _) => {
                tracing::debug!(row = row.index(), "Property row has a value but no name");
                out.push((String::new(), value));
            }
            (None, None, Some(host)) => out.push((HOSTNAME_PROPERTY.to_string(), host)),
            (None, None, None) => {}
        }
    }
}

fn collect_hostnames(sheet: &Sheet, positions: &[usize], out: &mut Vec<(String, String)>) {
    for row in positions.iter().filter_map(|&pos| sheet.row(pos)) {
        if let Some(host) = row.text(columns::property::HOSTNAME) {
            out.push((HOSTNAME_PROPERTY.to_string(), host));
        }
    }
}

/// Economic value, `0.0` when absent. Unreadable amounts are logged.
fn asset_value(row: &Row<'_>) -> f64 {
    let cell = row.get(columns::asset::VALUE);
    match cell.as_f64() {
        Some(value) => value,
        None => {
            if !cell.is_empty() {
                tracing::warn!(
                    row = row.index(),
                    column = columns::asset::VALUE,
                    value = ?cell,
                    "Unreadable economic value; using 0"
                );
            }
            0.0
        }
    }
}

fn text_or_default(row: &Row<'_>, label: &str) -> String {
    row.text(label).unwrap_or_default()
}

/// Composite IP identifier: `IP-{asset_key}-{mac}`.
pub fn ip_unique_id(asset_key: &str, mac: &str) -> String {
    format!("IP-{asset_key}-{mac}")
}

/// `IPv6` for addresses that parse as IPv6, `IPv4` otherwise.
pub fn ip_type(value: &str) -> &'static str {
    // Strip a CIDR suffix such as "/64" before parsing.
    let addr = value.split('/').next().unwrap_or(value).trim();
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V6(_)) => "IPv6",
        _ => "IPv4",
    }
}
