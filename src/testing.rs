// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory stand-ins for both catalogs, shared by unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncReadExt;

use crate::config::Endpoints;
use crate::http::{BasicAuth, BufferedResponse, ByteStream, HttpClient, HttpResponse, MultipartUpload};

pub const FEED_URL: &str = "https://feed.test/feed";
pub const API_BASE: &str = "https://api.test/v1";
pub const UPLOAD_URL: &str = "https://upload.test/";
pub const PROJECT_NAME: &str = "RubyTapas Complete";
pub const PROJECT_ID: &str = "proj123";

pub fn endpoints() -> Endpoints {
    Endpoints {
        feed_url: FEED_URL.to_string(),
        api_base: API_BASE.to_string(),
        upload_url: UPLOAD_URL.to_string(),
        project_name: PROJECT_NAME.to_string(),
    }
}

/// A media file served for download
#[derive(Debug, Clone)]
pub struct MockDownload {
    pub status: u16,
    pub chunks: Vec<Vec<u8>>,
    pub content_length: Option<u64>,
}

impl MockDownload {
    pub fn ok(data: &[u8]) -> Self {
        Self {
            status: 200,
            chunks: vec![data.to_vec()],
            content_length: Some(data.len() as u64),
        }
    }
}

/// What the destination received in one upload
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub url: String,
    pub fields: Vec<(String, String)>,
    pub file_field: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl RecordedUpload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One media entry held by the mock destination
#[derive(Debug, Clone)]
pub struct MockMedia {
    pub name: String,
    pub kind: String,
    pub hashed_id: String,
}

#[derive(Default)]
struct State {
    medias: Vec<MockMedia>,
    uploads: Vec<RecordedUpload>,
    renames: Vec<(String, String)>,
    requests: Vec<String>,
    next_id: usize,
}

/// A stateful fake of the feed, the destination API and the upload endpoint
///
/// Uploads append a video to the project and renames rewrite it, so a second
/// run observes the effects of the first.
pub struct MockCatalogs {
    pub feed_xml: String,
    pub feed_status: u16,
    pub projects_status: u16,
    pub project_status: u16,
    pub upload_status: u16,
    pub rename_status: u16,
    pub downloads: HashMap<String, MockDownload>,
    state: Mutex<State>,
}

impl MockCatalogs {
    /// Feed items are `(title, video_url)` pairs
    pub fn new(feed_items: &[(&str, &str)]) -> Self {
        Self {
            feed_xml: feed_xml(feed_items),
            feed_status: 200,
            projects_status: 200,
            project_status: 200,
            upload_status: 200,
            rename_status: 200,
            downloads: HashMap::new(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_video(self, name: &str, hashed_id: &str) -> Self {
        self.with_media(name, "Video", hashed_id)
    }

    pub fn with_media(self, name: &str, kind: &str, hashed_id: &str) -> Self {
        self.state.lock().unwrap().medias.push(MockMedia {
            name: name.to_string(),
            kind: kind.to_string(),
            hashed_id: hashed_id.to_string(),
        });
        self
    }

    pub fn with_download(mut self, url: &str, download: MockDownload) -> Self {
        self.downloads.insert(url.to_string(), download);
        self
    }

    pub fn medias(&self) -> Vec<MockMedia> {
        self.state.lock().unwrap().medias.clone()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.lock().unwrap().uploads.clone()
    }

    /// `(media url, new name)` for each rename received
    pub fn renames(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().renames.clone()
    }

    /// Method and URL of every request, in order
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    fn record(&self, line: String) {
        self.state.lock().unwrap().requests.push(line);
    }

    fn project_json(&self) -> String {
        let medias: Vec<serde_json::Value> = self
            .state
            .lock()
            .unwrap()
            .medias
            .iter()
            .map(|m| {
                serde_json::json!({
                    "name": m.name,
                    "type": m.kind,
                    "hashed_id": m.hashed_id,
                })
            })
            .collect();
        serde_json::json!({
            "name": PROJECT_NAME,
            "hashedId": PROJECT_ID,
            "medias": medias,
        })
        .to_string()
    }
}

pub fn feed_xml(items: &[(&str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, url)| {
            format!(
                r#"<item><title>{title}</title><enclosure url="{url}" type="video/mp4"/></item>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Test</title><description>Test</description>{items}</channel></rss>"#
    )
}

fn buffered(status: u16, body: impl Into<Bytes>) -> BufferedResponse {
    BufferedResponse {
        status,
        body: body.into(),
    }
}

#[async_trait]
impl HttpClient for MockCatalogs {
    async fn get(&self, url: &str, _auth: &BasicAuth) -> Result<BufferedResponse, reqwest::Error> {
        self.record(format!("GET {url}"));
        let response = if url == FEED_URL {
            buffered(self.feed_status, self.feed_xml.clone())
        } else if url == format!("{API_BASE}/projects.json") {
            let projects = serde_json::json!([
                { "name": "Some Other Project", "hashedId": "other1" },
                { "name": PROJECT_NAME, "hashedId": PROJECT_ID },
            ]);
            buffered(self.projects_status, projects.to_string())
        } else if url == format!("{API_BASE}/projects/{PROJECT_ID}.json") {
            buffered(self.project_status, self.project_json())
        } else {
            buffered(404, "Not Found")
        };
        Ok(response)
    }

    async fn get_stream(&self, url: &str, _auth: &BasicAuth) -> Result<HttpResponse, reqwest::Error> {
        self.record(format!("GET {url}"));
        let download = self.downloads.get(url).cloned().unwrap_or(MockDownload {
            status: 404,
            chunks: vec![b"Not Found".to_vec()],
            content_length: Some(9),
        });

        let chunks = download.chunks.into_iter().map(|c| Ok(Bytes::from(c)));
        let body: ByteStream = Box::pin(futures::stream::iter(chunks));

        Ok(HttpResponse {
            status: download.status,
            content_length: download.content_length,
            body,
        })
    }

    async fn put_form(
        &self,
        url: &str,
        _auth: &BasicAuth,
        form: &[(&str, &str)],
    ) -> Result<BufferedResponse, reqwest::Error> {
        self.record(format!("PUT {url}"));
        let name = form
            .iter()
            .find(|(k, _)| *k == "name")
            .map(|(_, v)| v.to_string())
            .unwrap_or_default();

        if self.rename_status != 200 {
            return Ok(buffered(self.rename_status, "Rename rejected"));
        }

        let mut state = self.state.lock().unwrap();
        state.renames.push((url.to_string(), name.clone()));
        let target = state
            .medias
            .iter_mut()
            .find(|m| url == format!("{API_BASE}/medias/{}.json", m.hashed_id));
        match target {
            Some(media) => {
                media.name = name;
                Ok(buffered(200, "{}"))
            }
            None => Ok(buffered(404, "Not Found")),
        }
    }

    async fn post_multipart(
        &self,
        url: &str,
        mut upload: MultipartUpload,
    ) -> Result<BufferedResponse, reqwest::Error> {
        self.record(format!("POST {url}"));
        let mut content = Vec::new();
        upload
            .file
            .read_to_end(&mut content)
            .await
            .expect("temp file should be readable during upload");

        let recorded = RecordedUpload {
            url: url.to_string(),
            fields: upload.fields,
            file_field: upload.file_field,
            file_name: upload.file_name,
            content,
        };

        if self.upload_status != 200 {
            self.state.lock().unwrap().uploads.push(recorded);
            return Ok(buffered(self.upload_status, "Upload rejected"));
        }

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let hashed_id = format!("uploaded{}", state.next_id);
        let name = recorded.field("name").unwrap_or_default().to_string();
        state.medias.push(MockMedia {
            name,
            kind: "Video".to_string(),
            hashed_id: hashed_id.clone(),
        });
        state.uploads.push(recorded);
        Ok(buffered(200, format!(r#"{{"hashed_id":"{hashed_id}"}}"#)))
    }
}
