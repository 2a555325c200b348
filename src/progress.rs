// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

/// Events emitted during a shuttle run for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Source feed is being fetched
    FetchingSource { url: String },

    /// Source feed has been parsed
    SourceFetched { total_episodes: usize },

    /// Destination project and media list are being fetched
    FetchingDestination { project_name: String },

    /// Destination catalog has been listed
    DestinationFetched { total_videos: usize },

    /// Both catalogs have been compared
    DiffReady {
        /// Distinct missing episode numbers, in feed order
        missing: Vec<String>,
        /// Number of missing episodes that will actually be transferred
        to_transfer: usize,
        mismatches: usize,
    },

    /// A download is starting
    DownloadStarting {
        episode_title: String,
        /// Index of this episode in the transfer queue
        episode_index: usize,
        /// Total number of episodes to transfer
        total_to_transfer: usize,
        /// Expected content length in bytes, if known
        content_length: Option<u64>,
    },

    /// Download progress update
    DownloadProgress {
        episode_title: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// A download finished and its file is ready for upload
    DownloadCompleted {
        episode_title: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// An upload is starting
    UploadStarting { episode_title: String, bytes: u64 },

    /// The destination acknowledged an upload
    UploadCompleted { episode_title: String },

    /// A destination entry is being renamed
    Renaming { from: String, to: String },

    /// The run failed and is halting
    Failed { error: String },

    /// Run completed
    ShuttleCompleted {
        transferred_count: usize,
        renamed_count: usize,
        /// Missing episodes left for a later run because of a limit
        limited_count: usize,
        dry_run: bool,
    },
}

/// Trait for reporting progress events during a run.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

/// Reporter that forwards every event to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::DownloadProgress { .. } => tracing::trace!(?event),
            ProgressEvent::Failed { error } => tracing::error!(%error, "run halted"),
            other => tracing::info!(event = ?other),
        }
    }
}

impl TracingReporter {
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

/// Render an expected length, which may be unknown
pub fn describe_total(total: Option<u64>) -> String {
    total.map_or_else(|| "unknown".to_string(), |bytes| bytes.to_string())
}
