// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading credentials before any network I/O
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required credential {key} is not set")]
    AuthConfigMissing { key: &'static str },
}

/// A title that carries no recognisable episode number
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No episode identifier found in title '{title}'")]
pub struct IdentifierError {
    pub title: String,
}

/// Errors that can occur when fetching or parsing either catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Catalog fetch from {url} failed with HTTP {status}: {body}")]
    FetchFailed {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse source feed: {0}")]
    FeedParseFailed(#[from] rss::Error),

    #[error("Feed item is missing its {field}")]
    MalformedFeedItem { field: &'static str },

    #[error("Invalid video URL '{url}': {source}")]
    InvalidVideoUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid catalog JSON from {url}: {source}")]
    InvalidCatalogJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Project '{name}' not found among {available:?}")]
    ProjectNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Project '{name}' has no hashed ID")]
    MissingProjectId { name: String },

    #[error("Video '{name}' has no hashed ID")]
    MissingMediaId { name: String },

    #[error(transparent)]
    NoIdentifierFound(#[from] IdentifierError),
}

/// Errors that can occur while moving a single episode
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Download of '{title}' from {url} failed: {source}")]
    DownloadRequestFailed {
        title: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download of '{title}' failed with HTTP {status} from {url}")]
    DownloadFailed {
        title: String,
        url: String,
        status: u16,
    },

    #[error("Stream error while downloading '{title}': {source}")]
    StreamFailed {
        title: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download of '{title}' ended after {received} of {expected} bytes")]
    IncompleteDownload {
        title: String,
        received: u64,
        expected: u64,
    },

    #[error("Temporary file error at {path}: {source}")]
    TempFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload of '{title}' failed: {source}")]
    UploadRequestFailed {
        title: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upload of '{title}' failed with HTTP {status}: {body}")]
    UploadFailed {
        title: String,
        status: u16,
        body: String,
    },
}

/// Errors that can occur while correcting destination titles
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Rename of {remote_id} to '{title}' failed: {source}")]
    RequestFailed {
        remote_id: String,
        title: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Rename of {remote_id} to '{title}' failed with HTTP {status}: {body}")]
    MetadataUpdateFailed {
        remote_id: String,
        title: String,
        status: u16,
        body: String,
    },
}

/// Top-level errors for a shuttle run
#[derive(Error, Debug)]
pub enum ShuttleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),
}
