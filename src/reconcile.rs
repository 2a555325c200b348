// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::Endpoints;
use crate::diff::TitleMismatch;
use crate::error::ReconcileError;
use crate::http::{BasicAuth, HttpClient};
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Rename destination entries to their source titles, in order
///
/// Stops at the first rejected rename. Returns the number of renames applied.
pub async fn reconcile_titles<C: HttpClient>(
    client: &C,
    endpoints: &Endpoints,
    auth: &BasicAuth,
    mismatches: &[TitleMismatch],
    reporter: &SharedProgressReporter,
) -> Result<usize, ReconcileError> {
    for mismatch in mismatches {
        let remote_id = &mismatch.destination.remote_id;
        let title = &mismatch.source.title;

        reporter.report(ProgressEvent::Renaming {
            from: mismatch.destination.name.clone(),
            to: title.clone(),
        });

        let url = endpoints.media_url(remote_id);
        let response = client
            .put_form(&url, auth, &[("name", title.as_str())])
            .await
            .map_err(|e| ReconcileError::RequestFailed {
                remote_id: remote_id.clone(),
                title: title.clone(),
                source: e,
            })?;

        if response.status != 200 {
            let body = response.diagnostic_body();
            tracing::warn!(%url, status = response.status, %body, "rename rejected");
            return Err(ReconcileError::MetadataUpdateFailed {
                remote_id: remote_id.clone(),
                title: title.clone(),
                status: response.status,
                body,
            });
        }
    }

    Ok(mismatches.len())
}
