// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// Maximum number of body bytes kept in error diagnostics
const DIAGNOSTIC_BODY_LIMIT: usize = 512;

/// A streaming response body
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Username/password pair for HTTP basic authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// HTTP response with status, content length, and body stream
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Length header value, if present
    pub content_length: Option<u64>,
    /// Response body as a stream of bytes
    pub body: ByteStream,
}

/// HTTP response whose body has been read completely
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    pub status: u16,
    pub body: Bytes,
}

impl BufferedResponse {
    /// True for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Lossy, length-capped rendering of the body for error messages
    pub fn diagnostic_body(&self) -> String {
        let end = self.body.len().min(DIAGNOSTIC_BODY_LIMIT);
        let mut text = String::from_utf8_lossy(&self.body[..end]).into_owned();
        if self.body.len() > DIAGNOSTIC_BODY_LIMIT {
            text.push_str("...");
        }
        text
    }
}

/// A multipart upload: plain text fields plus a single file part
pub struct MultipartUpload {
    /// Text fields, sent in order before the file part
    pub fields: Vec<(String, String)>,
    /// Name of the form field carrying the file
    pub file_field: String,
    /// File name reported for the file part
    pub file_name: String,
    /// Open handle positioned at the start of the file
    pub file: tokio::fs::File,
    /// Size of the file in bytes
    pub file_len: u64,
}

/// HTTP client abstraction for testability
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch the entire response body
    async fn get(&self, url: &str, auth: &BasicAuth) -> Result<BufferedResponse, reqwest::Error>;

    /// Get a streaming response for large downloads
    async fn get_stream(&self, url: &str, auth: &BasicAuth)
    -> Result<HttpResponse, reqwest::Error>;

    /// Send a PUT with a URL-encoded form body
    async fn put_form(
        &self,
        url: &str,
        auth: &BasicAuth,
        form: &[(&str, &str)],
    ) -> Result<BufferedResponse, reqwest::Error>;

    /// Send a POST with a multipart body
    async fn post_multipart(
        &self,
        url: &str,
        upload: MultipartUpload,
    ) -> Result<BufferedResponse, reqwest::Error>;
}

/// Default HTTP client implementation using reqwest
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new ReqwestClient with default settings
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new ReqwestClient with a custom reqwest::Client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn buffer(response: reqwest::Response) -> Result<BufferedResponse, reqwest::Error> {
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    Ok(BufferedResponse { status, body })
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, auth: &BasicAuth) -> Result<BufferedResponse, reqwest::Error> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .basic_auth(&auth.username, Some(&auth.password))
            .send()
            .await?;
        buffer(response).await
    }

    async fn get_stream(
        &self,
        url: &str,
        auth: &BasicAuth,
    ) -> Result<HttpResponse, reqwest::Error> {
        use futures::StreamExt;

        tracing::debug!(url, "GET (streaming)");
        let response = self
            .client
            .get(url)
            .basic_auth(&auth.username, Some(&auth.password))
            .send()
            .await?;
        let status = response.status().as_u16();
        let content_length = response.content_length();

        let body: ByteStream = Box::pin(response.bytes_stream().map(|result| result));

        Ok(HttpResponse {
            status,
            content_length,
            body,
        })
    }

    async fn put_form(
        &self,
        url: &str,
        auth: &BasicAuth,
        form: &[(&str, &str)],
    ) -> Result<BufferedResponse, reqwest::Error> {
        tracing::debug!(url, "PUT");
        let response = self
            .client
            .put(url)
            .basic_auth(&auth.username, Some(&auth.password))
            .form(form)
            .send()
            .await?;
        buffer(response).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        upload: MultipartUpload,
    ) -> Result<BufferedResponse, reqwest::Error> {
        use reqwest::multipart::{Form, Part};

        tracing::debug!(url, file = %upload.file_name, bytes = upload.file_len, "POST multipart");
        let mut form = Form::new();
        for (name, value) in upload.fields {
            form = form.text(name, value);
        }
        let part = Part::stream_with_length(reqwest::Body::from(upload.file), upload.file_len)
            .file_name(upload.file_name);
        form = form.part(upload.file_field, part);

        let response = self.client.post(url).multipart(form).send().await?;
        buffer(response).await
    }
}
