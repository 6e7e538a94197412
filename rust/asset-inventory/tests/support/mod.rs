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

//! Shared inventory fixtures for integration tests.

#![allow(dead_code)]

use asset_inventory::{CellValue, FixedClock, InventoryTables, Sheet};
use chrono::{TimeZone, Utc};

pub const RUN_INSTANT: &str = "2025-01-15T08:30:00.000+00:00";

pub fn frozen_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap())
}

pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

pub fn number(value: f64) -> CellValue {
    CellValue::Number(value)
}

pub fn assets_sheet() -> Sheet {
    Sheet::new(
        "Assets",
        [
            "Nombre único",
            "Nombre",
            "Tipo",
            "Valor económico",
            "Fecha adquisición",
        ],
    )
}

pub fn users_sheet() -> Sheet {
    Sheet::new("Usuarios", ["Usuario", "Nombre único de Asset"])
}

pub fn interfaces_sheet() -> Sheet {
    Sheet::new("Interfaces", ["Nombre único de Asset", "Dirección MAC"])
}

pub fn ips_sheet() -> Sheet {
    Sheet::new("IPs", ["Dirección MAC", "Dirección IP"])
}

pub fn cpes_sheet() -> Sheet {
    Sheet::new("CPEs", ["Nombre único de Asset", "CPE"])
}

pub fn properties_sheet() -> Sheet {
    Sheet::new("Propiedades", ["Nombre único de Asset", "Propiedad", "Valor"])
}

pub fn hostnames_sheet() -> Sheet {
    Sheet::new("HostNames", ["Nombre único de Asset", "HostName"])
}

/// One user, one asset with one interface and one IP, one CPE.
pub fn minimal_tables() -> InventoryTables {
    InventoryTables {
        assets: assets_sheet().with_row(vec![
            text("A1"),
            text("core-router"),
            text("Router"),
            number(1500.0),
            text("15/03/2023"),
        ]),
        users: users_sheet().with_row(vec![text("jdoe"), text("A1")]),
        interfaces: interfaces_sheet().with_row(vec![text("A1"), text("AA:BB:CC:DD:EE:FF")]),
        ips: ips_sheet().with_row(vec![text("AA:BB:CC:DD:EE:FF"), text("10.0.0.5")]),
        cpes: cpes_sheet().with_row(vec![text("A1"), text("cpe:2.3:h:cisco:isr4331:-:*:*:*:*:*:*:*")]),
        properties: properties_sheet(),
        hostnames: hostnames_sheet(),
    }
}
