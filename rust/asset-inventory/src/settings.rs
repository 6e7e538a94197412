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

//! Transform settings.

use serde::{Deserialize, Serialize};

use crate::identity::IdSeeds;

/// Settings that shape the exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformSettings {
    /// Tenant the document is ingested for.
    #[serde(default = "default_customer_id")]
    pub customer_id: i64,

    /// Read ambiguous text dates as day/month/year.
    #[serde(default = "default_day_first")]
    pub day_first: bool,

    #[serde(default)]
    pub seeds: IdSeeds,

    #[serde(default)]
    pub defaults: AssetDefaults,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            customer_id: default_customer_id(),
            day_first: default_day_first(),
            seeds: IdSeeds::default(),
            defaults: AssetDefaults::default(),
        }
    }
}

/// Placeholder risk and impact scores stamped on every asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDefaults {
    #[serde(default = "default_risk_score_sum")]
    pub risk_score_sum: i64,
    #[serde(default = "default_impact_confidentiality")]
    pub impact_confidentiality: i64,
    #[serde(default = "default_impact_integrity")]
    pub impact_integrity: i64,
    #[serde(default = "default_impact_availability")]
    pub impact_availability: i64,
    #[serde(default = "default_impact_criticality")]
    pub impact_criticality: i64,
    #[serde(default = "default_socia_risk")]
    pub socia_risk: String,
}

impl Default for AssetDefaults {
    fn default() -> Self {
        Self {
            risk_score_sum: default_risk_score_sum(),
            impact_confidentiality: default_impact_confidentiality(),
            impact_integrity: default_impact_integrity(),
            impact_availability: default_impact_availability(),
            impact_criticality: default_impact_criticality(),
            socia_risk: default_socia_risk(),
        }
    }
}

const fn default_customer_id() -> i64 {
    101
}

const fn default_day_first() -> bool {
    true
}

const fn default_risk_score_sum() -> i64 {
    65
}

const fn default_impact_confidentiality() -> i64 {
    3
}

const fn default_impact_integrity() -> i64 {
    4
}

const fn default_impact_availability() -> i64 {
    5
}

const fn default_impact_criticality() -> i64 {
    4
}

fn default_socia_risk() -> String {
    "MEDIO".to_string()
}
