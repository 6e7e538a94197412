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

//! Document upload to the asset ingestion API.

use std::time::Duration;

use crate::error::{Error, Result};

/// Where and for which tenant a document is posted.
#[derive(Debug, Clone)]
pub struct PublishTarget {
    /// Ingestion endpoint, e.g. `https://core:8090/api/assets/import`.
    pub url: String,

    /// Name of the query parameter that selects the tenant.
    pub customer_param: String,

    /// Tenant id sent in `customer_param`.
    pub customer_id: i64,

    /// Whole-request timeout.
    pub timeout: Duration,
}

/// Successful ingestion API response.
#[derive(Debug, Clone)]
pub struct PublishResponse {
    pub status: u16,
    pub body: String,
}

/// POST a serialized document to the ingestion API.
///
/// A single attempt is made. Non-2xx responses are returned as
/// [`Error::IngestApi`] with the response body as the message.
pub fn publish_document(target: &PublishTarget, document: &[u8]) -> Result<PublishResponse> {
    let url = ensure_scheme(&target.url)?;
    let customer_id = target.customer_id.to_string();

    tracing::debug!(
        url = %url,
        customer_param = %target.customer_param,
        customer_id = %customer_id,
        bytes = document.len(),
        "Posting inventory document"
    );

    let agent = ureq::AgentBuilder::new().timeout(target.timeout).build();
    let response = agent
        .post(&url)
        .query(&target.customer_param, &customer_id)
        .set("Content-Type", "application/json")
        .set("Accept", "application/json")
        .send_bytes(document)
        .map_err(|e| match e {
            ureq::Error::Status(status, resp) => {
                let body = resp.into_string().unwrap_or_default();
                Error::IngestApi {
                    status,
                    message: body,
                }
            }
            ureq::Error::Transport(t) => Error::Http(t.to_string()),
        })?;

    let status = response.status();
    let body = response
        .into_string()
        .map_err(|e| Error::Http(e.to_string()))?;

    Ok(PublishResponse { status, body })
}

/// Ensure the URL has a scheme (http:// or https://).
fn ensure_scheme(url: &str) -> Result<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::PublishUrlRequired);
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(url.to_string());
    }
    Ok(format!("http://{}", url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_scheme() {
        assert_eq!(ensure_scheme("core:8090/api").unwrap(), "http://core:8090/api");
        assert_eq!(
            ensure_scheme(" https://core/api ").unwrap(),
            "https://core/api"
        );
        assert!(matches!(ensure_scheme("  "), Err(Error::PublishUrlRequired)));
    }
}
