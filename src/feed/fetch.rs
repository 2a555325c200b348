// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::episode::SourceEpisode;
use crate::error::CatalogError;
use crate::http::{BasicAuth, HttpClient};

use super::parse::parse_source_feed;

/// Fetch and parse the source feed
pub async fn fetch_source_catalog<C: HttpClient>(
    client: &C,
    url: &str,
    auth: &BasicAuth,
) -> Result<Vec<SourceEpisode>, CatalogError> {
    let response = client
        .get(url, auth)
        .await
        .map_err(|e| CatalogError::RequestFailed {
            url: url.to_string(),
            source: e,
        })?;

    if !response.is_success() {
        let body = response.diagnostic_body();
        tracing::warn!(url, status = response.status, %body, "feed fetch failed");
        return Err(CatalogError::FetchFailed {
            url: url.to_string(),
            status: response.status,
            body,
        });
    }

    parse_source_feed(&response.body)
}
