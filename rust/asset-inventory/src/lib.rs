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

//! Asset inventory export for ServiceRadar.
//!
//! Turns an inventory workbook (sheets `Assets`, `Usuarios`, `Interfaces`,
//! `IPs`, `CPEs`, `Propiedades`/`HostNames`) into the nested JSON document
//! accepted by the asset ingestion API. It supports:
//!
//! - Workbook loading (`.xlsx`, `.xls`, `.ods`)
//! - User deduplication with surrogate ids
//! - Joining interfaces, IPs, CPEs and properties onto their assets
//! - Timestamp normalization against a single run instant
//! - Posting the document to the ingestion API
//! - Committing the document to a git repository
//!
//! # Example
//!
//! ```rust,no_run
//! use asset_inventory::{assemble, load_workbook, SystemClock, TransformSettings};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tables = load_workbook(Path::new("assets_limpio.xlsx"))?;
//!     let assembly = assemble(&tables, &TransformSettings::default(), &SystemClock);
//!
//!     for err in &assembly.link_errors {
//!         eprintln!("skipped link: {err}");
//!     }
//!     assembly.document.write_to(Path::new("resultado.json"))?;
//!     Ok(())
//! }
//! ```

mod assembler;
pub mod columns;
mod document;
mod error;
mod identity;
mod publish;
mod settings;
mod snapshot;
mod table;
mod timestamp;
mod workbook;

pub use assembler::{assemble, ip_type, ip_unique_id, Assembly};
pub use document::{
    Asset, AssetCpe, AssetInterface, AssetProperty, AssetUser, InterfaceIp, InventoryDocument,
    User,
};
pub use error::{Error, LinkError, Result};
pub use identity::{IdSeeds, IdSequence, IdSequences, UserRegistry};
pub use publish::{publish_document, PublishResponse, PublishTarget};
pub use settings::{AssetDefaults, TransformSettings};
pub use snapshot::{commit_snapshot, SnapshotOutcome, SnapshotTarget};
pub use table::{CellValue, JoinIndex, Row, Sheet};
pub use timestamp::{
    format_timestamp, from_excel_serial, Clock, FixedClock, SystemClock, TimestampNormalizer,
};
pub use workbook::{load_workbook, InventoryTables};
