// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::episode::SourceEpisode;
use crate::error::TransferError;
use crate::http::{BasicAuth, HttpClient, MultipartUpload};
use crate::progress::{ProgressEvent, SharedProgressReporter, describe_total};

/// Where and with which credentials an episode is moved
#[derive(Debug, Clone)]
pub struct TransferTarget<'a> {
    /// Credentials for downloading from the source
    pub source_auth: &'a BasicAuth,
    pub upload_url: &'a str,
    /// Destination API password sent as a form field
    pub api_password: &'a str,
    pub project_id: &'a str,
}

/// Local settings for a transfer
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    /// Directory for temporary files; the system default when unset
    pub temp_dir: Option<PathBuf>,
}

/// Context for reporting a transfer's position in the run
#[derive(Debug, Clone, Copy)]
pub struct TransferContext {
    /// Index of this episode in the transfer queue
    pub episode_index: usize,
    /// Total number of episodes to transfer
    pub total_to_transfer: usize,
}

/// Outcome of moving one episode
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub episode: SourceEpisode,
    pub bytes_transferred: u64,
    /// Content-Length advertised by the source, if any
    pub expected_bytes: Option<u64>,
    pub succeeded: bool,
}

/// Split the last URL path segment into a temp file prefix and suffix
///
/// `https://host/videos/204-foo.mp4` gives `("204-foo", ".mp4")`.
fn temp_name_parts(episode: &SourceEpisode) -> (String, String) {
    let file_name = episode
        .video_url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or("episode");

    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem.to_string(), format!(".{ext}"))
        }
        _ => (file_name.to_string(), String::new()),
    }
}

fn create_temp_file(
    episode: &SourceEpisode,
    options: &TransferOptions,
) -> Result<NamedTempFile, TransferError> {
    let (prefix, suffix) = temp_name_parts(episode);
    let dir = options.temp_dir.clone().unwrap_or_else(std::env::temp_dir);

    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(&suffix)
        .tempfile_in(&dir)
        .map_err(|e| TransferError::TempFile {
            path: dir.join(format!("{prefix}*{suffix}")),
            source: e,
        })
}

fn temp_error(path: &Path) -> impl FnOnce(std::io::Error) -> TransferError + '_ {
    move |e| TransferError::TempFile {
        path: path.to_path_buf(),
        source: e,
    }
}

/// Stream an episode's media into `path`
///
/// Returns the byte count and the advertised length.
async fn download_to<C: HttpClient>(
    client: &C,
    episode: &SourceEpisode,
    path: &Path,
    auth: &BasicAuth,
    context: TransferContext,
    reporter: &SharedProgressReporter,
) -> Result<(u64, Option<u64>), TransferError> {
    let url = episode.video_url.as_str();

    let response = client
        .get_stream(url, auth)
        .await
        .map_err(|e| TransferError::DownloadRequestFailed {
            title: episode.title.clone(),
            url: url.to_string(),
            source: e,
        })?;

    // Headers decide the outcome before any body byte is touched
    if !(200..300).contains(&response.status) {
        tracing::warn!(url, status = response.status, "download rejected");
        return Err(TransferError::DownloadFailed {
            title: episode.title.clone(),
            url: url.to_string(),
            status: response.status,
        });
    }

    let expected = response.content_length;
    tracing::debug!(url, expected = %describe_total(expected), "expecting bytes");

    reporter.report(ProgressEvent::DownloadStarting {
        episode_title: episode.title.clone(),
        episode_index: context.episode_index,
        total_to_transfer: context.total_to_transfer,
        content_length: expected,
    });

    let mut file = File::create(path).await.map_err(temp_error(path))?;

    let mut bytes_downloaded: u64 = 0;
    let mut stream = response.body;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| TransferError::StreamFailed {
            title: episode.title.clone(),
            source: e,
        })?;

        file.write_all(&chunk).await.map_err(temp_error(path))?;

        bytes_downloaded += chunk.len() as u64;

        reporter.report(ProgressEvent::DownloadProgress {
            episode_title: episode.title.clone(),
            bytes_downloaded,
            total_bytes: expected,
        });
    }

    file.flush().await.map_err(temp_error(path))?;
    drop(file);

    if let Some(expected) = expected
        && expected != bytes_downloaded
    {
        return Err(TransferError::IncompleteDownload {
            title: episode.title.clone(),
            received: bytes_downloaded,
            expected,
        });
    }

    reporter.report(ProgressEvent::DownloadCompleted {
        episode_title: episode.title.clone(),
        bytes_downloaded,
        total_bytes: expected,
    });

    Ok((bytes_downloaded, expected))
}

/// Move one episode from the source to the destination
///
/// Downloads into a temporary file named after the media URL, then uploads
/// that file. The temporary file is removed on every exit path. Any
/// non-success response fails the transfer.
pub async fn transfer_episode<C: HttpClient>(
    client: &C,
    episode: &SourceEpisode,
    target: &TransferTarget<'_>,
    options: &TransferOptions,
    context: TransferContext,
    reporter: &SharedProgressReporter,
) -> Result<TransferResult, TransferError> {
    let temp = create_temp_file(episode, options)?;
    let path = temp.path().to_path_buf();
    tracing::debug!(title = %episode.title, path = %path.display(), "downloading to temp file");

    let (bytes, expected) =
        download_to(client, episode, &path, target.source_auth, context, reporter).await?;

    let file = File::open(&path).await.map_err(temp_error(&path))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    reporter.report(ProgressEvent::UploadStarting {
        episode_title: episode.title.clone(),
        bytes,
    });

    let upload = MultipartUpload {
        fields: vec![
            ("name".to_string(), episode.title.clone()),
            ("api_password".to_string(), target.api_password.to_string()),
            ("project_id".to_string(), target.project_id.to_string()),
        ],
        file_field: "file".to_string(),
        file_name,
        file,
        file_len: bytes,
    };

    let response = client
        .post_multipart(target.upload_url, upload)
        .await
        .map_err(|e| TransferError::UploadRequestFailed {
            title: episode.title.clone(),
            source: e,
        })?;

    if response.status != 200 {
        let body = response.diagnostic_body();
        tracing::warn!(title = %episode.title, status = response.status, %body, "upload rejected");
        return Err(TransferError::UploadFailed {
            title: episode.title.clone(),
            status: response.status,
            body,
        });
    }

    reporter.report(ProgressEvent::UploadCompleted {
        episode_title: episode.title.clone(),
    });

    // Dropping `temp` deletes the file
    drop(temp);

    Ok(TransferResult {
        episode: episode.clone(),
        bytes_transferred: bytes,
        expected_bytes: expected,
        succeeded: true,
    })
}
