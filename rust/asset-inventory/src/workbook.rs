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

//! Workbook loading.
//!
//! Reads the inventory sheets from an `.xlsx`, `.xlsm`, `.xls` or `.ods`
//! file. The first row of each sheet is its header row.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::columns::sheets;
use crate::error::{Error, Result};
use crate::table::{CellValue, Sheet};

/// The six related inventory tables.
#[derive(Debug, Clone, Default)]
pub struct InventoryTables {
    pub assets: Sheet,
    pub users: Sheet,
    pub interfaces: Sheet,
    pub ips: Sheet,
    pub cpes: Sheet,
    pub properties: Sheet,
    /// Host names, exported as properties named `hostname`.
    pub hostnames: Sheet,
}

impl InventoryTables {
    /// Pick the inventory tables out of a set of named sheets.
    ///
    /// `Assets` is required. Any other missing sheet is logged and treated
    /// as empty.
    pub fn from_sheets(mut found: Vec<Sheet>) -> Result<Self> {
        let mut take = |name: &str| -> Option<Sheet> {
            let idx = found.iter().position(|s| s.name() == name)?;
            Some(found.swap_remove(idx))
        };

        let assets = take(sheets::ASSETS).ok_or_else(|| Error::MissingSheet {
            sheet: sheets::ASSETS.to_string(),
        })?;

        let mut optional = |name: &str| -> Sheet {
            take(name).unwrap_or_else(|| {
                tracing::warn!(sheet = name, "Sheet not found; treating as empty");
                Sheet::empty(name)
            })
        };

        let users = optional(sheets::USERS);
        let interfaces = optional(sheets::INTERFACES);
        let ips = optional(sheets::IPS);
        let cpes = optional(sheets::CPES);
        let properties = optional(sheets::PROPERTIES);
        let hostnames = optional(sheets::HOSTNAMES);

        Ok(Self {
            assets,
            users,
            interfaces,
            ips,
            cpes,
            properties,
            hostnames,
        })
    }
}

/// Load the inventory tables from a workbook file.
pub fn load_workbook(path: &Path) -> Result<InventoryTables> {
    let workbook_err = |message: String| Error::Workbook {
        path: path.display().to_string(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;

    let wanted = [
        sheets::ASSETS,
        sheets::USERS,
        sheets::INTERFACES,
        sheets::IPS,
        sheets::CPES,
        sheets::PROPERTIES,
        sheets::HOSTNAMES,
    ];

    let mut found = Vec::new();
    for name in workbook.sheet_names() {
        if !wanted.contains(&name.as_str()) {
            tracing::debug!(sheet = %name, "Ignoring unrelated sheet");
            continue;
        }

        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| workbook_err(format!("sheet '{name}': {e}")))?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|header| header.iter().map(|cell| cell.to_string()).collect())
            .unwrap_or_default();

        let mut sheet = Sheet::new(name.clone(), headers);
        for row in rows {
            let cells: Vec<CellValue> = row.iter().map(to_cell).collect();
            if cells.iter().all(CellValue::is_empty) {
                continue;
            }
            sheet.push_row(cells);
        }

        tracing::debug!(sheet = %name, rows = sheet.len(), "Loaded sheet");
        found.push(sheet);
    }

    let tables = InventoryTables::from_sheets(found)?;
    tracing::info!(
        path = %path.display(),
        assets = tables.assets.len(),
        users = tables.users.len(),
        interfaces = tables.interfaces.len(),
        ips = tables.ips.len(),
        cpes = tables.cpes.len(),
        properties = tables.properties.len() + tables.hostnames.len(),
        "Loaded inventory workbook"
    );
    Ok(tables)
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // calamine applies the workbook's 1900/1904 date system.
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) if dt.is_datetime() => CellValue::DateTime(naive),
            _ => CellValue::Number(dt.as_f64()),
        },
        _ => CellValue::Empty,
    }
}
