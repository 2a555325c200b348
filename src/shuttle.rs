// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::{Credentials, Endpoints};
use crate::destination::fetch_destination_catalog;
use crate::diff::CatalogDiff;
use crate::error::ShuttleError;
use crate::feed::fetch_source_catalog;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::reconcile::reconcile_titles;
use crate::transfer::{
    TransferContext, TransferOptions, TransferResult, TransferTarget, transfer_episode,
};

/// Options for a shuttle run
#[derive(Debug, Clone, Default)]
pub struct ShuttleOptions {
    /// Maximum number of episodes to transfer (None = all)
    pub limit: Option<usize>,
    /// Compute and report the diff without transferring or renaming
    pub dry_run: bool,
    /// Directory for temporary download files
    pub temp_dir: Option<PathBuf>,
}

/// Result of a shuttle run
#[derive(Debug, Clone)]
pub struct ShuttleReport {
    /// Distinct missing episode numbers, in feed order
    pub missing: Vec<String>,
    /// Completed transfers, in order
    pub transferred: Vec<TransferResult>,
    /// Number of destination entries renamed
    pub renamed: usize,
    /// Missing episodes skipped because of the limit
    pub limited: usize,
    pub dry_run: bool,
}

/// Reconcile the destination catalog with the source feed
///
/// This is the main entry point for the library. It:
/// 1. Fetches the source feed
/// 2. Resolves the destination project and lists its videos
/// 3. Diffs both catalogs by episode number
/// 4. Transfers each missing episode, one at a time
/// 5. Renames destination entries whose titles drifted
///
/// The first failure halts the run; nothing already done is rolled back.
pub async fn shuttle_videos<C: HttpClient>(
    client: &C,
    credentials: &Credentials,
    endpoints: &Endpoints,
    options: &ShuttleOptions,
    reporter: SharedProgressReporter,
) -> Result<ShuttleReport, ShuttleError> {
    let result = run(client, credentials, endpoints, options, &reporter).await;
    if let Err(e) = &result {
        reporter.report(ProgressEvent::Failed {
            error: e.to_string(),
        });
    }
    result
}

async fn run<C: HttpClient>(
    client: &C,
    credentials: &Credentials,
    endpoints: &Endpoints,
    options: &ShuttleOptions,
    reporter: &SharedProgressReporter,
) -> Result<ShuttleReport, ShuttleError> {
    let source_auth = credentials.source_auth();
    let destination_auth = credentials.destination_auth();

    reporter.report(ProgressEvent::FetchingSource {
        url: endpoints.feed_url.clone(),
    });
    let source = fetch_source_catalog(client, &endpoints.feed_url, &source_auth).await?;
    reporter.report(ProgressEvent::SourceFetched {
        total_episodes: source.len(),
    });

    reporter.report(ProgressEvent::FetchingDestination {
        project_name: endpoints.project_name.clone(),
    });
    let (project_id, destination) =
        fetch_destination_catalog(client, endpoints, &destination_auth).await?;
    reporter.report(ProgressEvent::DestinationFetched {
        total_videos: destination.len(),
    });

    let diff = CatalogDiff::compute(&source, &destination);

    let mut seen = HashSet::new();
    let missing: Vec<String> = diff
        .missing_episodes
        .iter()
        .filter(|e| seen.insert(&e.number))
        .map(|e| e.number.to_string())
        .collect();

    let to_transfer: Vec<_> = match options.limit {
        Some(limit) => diff.missing_episodes.iter().take(limit).collect(),
        None => diff.missing_episodes.iter().collect(),
    };
    let limited = diff.missing_episodes.len() - to_transfer.len();

    tracing::info!(?missing, mismatches = diff.mismatches.len(), "catalogs compared");
    reporter.report(ProgressEvent::DiffReady {
        missing: missing.clone(),
        to_transfer: to_transfer.len(),
        mismatches: diff.mismatches.len(),
    });

    if options.dry_run {
        reporter.report(ProgressEvent::ShuttleCompleted {
            transferred_count: 0,
            renamed_count: 0,
            limited_count: limited,
            dry_run: true,
        });

        return Ok(ShuttleReport {
            missing,
            transferred: vec![],
            renamed: 0,
            limited,
            dry_run: true,
        });
    }

    let target = TransferTarget {
        source_auth: &source_auth,
        upload_url: &endpoints.upload_url,
        api_password: &credentials.destination_password,
        project_id: &project_id,
    };
    let transfer_options = TransferOptions {
        temp_dir: options.temp_dir.clone(),
    };

    let total_to_transfer = to_transfer.len();
    let mut transferred = Vec::with_capacity(total_to_transfer);

    // Strictly sequential: each upload completes before the next download starts
    for (episode_index, episode) in to_transfer.into_iter().enumerate() {
        let context = TransferContext {
            episode_index,
            total_to_transfer,
        };
        let result = transfer_episode(
            client,
            episode,
            &target,
            &transfer_options,
            context,
            reporter,
        )
        .await?;
        transferred.push(result);
    }

    let renamed = reconcile_titles(
        client,
        endpoints,
        &destination_auth,
        &diff.mismatches,
        reporter,
    )
    .await?;

    reporter.report(ProgressEvent::ShuttleCompleted {
        transferred_count: transferred.len(),
        renamed_count: renamed,
        limited_count: limited,
        dry_run: false,
    });

    Ok(ShuttleReport {
        missing,
        transferred,
        renamed,
        limited,
        dry_run: false,
    })
}
