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

//! Error types for the asset inventory export.

use thiserror::Error;

/// Result type for asset inventory operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, exporting or publishing an inventory.
#[derive(Error, Debug)]
pub enum Error {
    /// The workbook could not be opened or decoded.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: String, message: String },

    /// A sheet required by the transform is not present in the workbook.
    #[error("workbook is missing required sheet '{sheet}'")]
    MissingSheet { sheet: String },

    /// Ingestion API rejected the document.
    #[error("ingestion API error ({status}): {message}")]
    IngestApi { status: u16, message: String },

    /// Publish endpoint is required but not configured.
    #[error("publish endpoint URL is required")]
    PublishUrlRequired,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// A git step of the snapshot failed.
    #[error("git {step} failed: {detail}")]
    Git { step: String, detail: String },

    /// Failed to serialize the document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A single asset-user link that could not be assembled.
///
/// These never abort a run; the assembler collects them next to the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The username on a user row was not registered by the identity pass.
    ///
    /// [`assemble`](crate::assemble) registers every non-empty username from
    /// the same sheet before joining, so a run over one set of tables does
    /// not produce this; it surfaces when the registry and the link rows
    /// come from different sources.
    #[error("asset {asset_id}: user '{username}' is not in the user registry")]
    UnresolvedUser { asset_id: u64, username: String },

    /// A user row matched the asset but carries no username.
    #[error("asset {asset_id}: user row {row} has no username")]
    MissingUsername { asset_id: u64, row: usize },
}
