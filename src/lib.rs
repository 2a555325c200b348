// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod config;
pub mod destination;
pub mod diff;
pub mod episode;
pub mod error;
pub mod feed;
pub mod http;
pub mod progress;
pub mod reconcile;
pub mod shuttle;
pub mod transfer;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use config::{Credentials, Endpoints};
pub use diff::{CatalogDiff, TitleMismatch};
pub use episode::{DestinationEpisode, EpisodeId, SourceEpisode, extract_episode_id};
pub use error::{
    CatalogError, ConfigError, IdentifierError, ReconcileError, ShuttleError, TransferError,
};
pub use http::{BasicAuth, HttpClient, ReqwestClient};
pub use progress::{
    NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter, TracingReporter,
};
pub use shuttle::{ShuttleOptions, ShuttleReport, shuttle_videos};
pub use transfer::{TransferResult, transfer_episode};
