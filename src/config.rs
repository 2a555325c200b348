// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::ConfigError;
use crate::http::BasicAuth;

pub const SOURCE_LOGIN_KEY: &str = "DPD_USER_LOGIN";
pub const SOURCE_PASSWORD_KEY: &str = "DPD_USER_PASSWORD";
pub const DESTINATION_PASSWORD_KEY: &str = "WISTIA_API_PASSWORD";

pub const DEFAULT_FEED_URL: &str = "https://rubytapas.dpdcart.com/feed";
pub const DEFAULT_API_BASE: &str = "https://api.wistia.com/v1";
pub const DEFAULT_UPLOAD_URL: &str = "https://upload.wistia.com/";
pub const DEFAULT_PROJECT_NAME: &str = "RubyTapas Complete";

/// Username the destination API expects alongside its password
const DESTINATION_API_USER: &str = "api";

/// The three secrets needed for a run
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub source_login: String,
    pub source_password: String,
    pub destination_password: String,
}

impl Credentials {
    /// Load credentials from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary key lookup
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::AuthConfigMissing { key })
        };

        Ok(Self {
            source_login: require(SOURCE_LOGIN_KEY)?,
            source_password: require(SOURCE_PASSWORD_KEY)?,
            destination_password: require(DESTINATION_PASSWORD_KEY)?,
        })
    }

    /// Basic auth for the source feed and its media downloads
    pub fn source_auth(&self) -> BasicAuth {
        BasicAuth::new(&self.source_login, &self.source_password)
    }

    /// Basic auth for the destination API
    pub fn destination_auth(&self) -> BasicAuth {
        BasicAuth::new(DESTINATION_API_USER, &self.destination_password)
    }
}

// Secrets stay out of logs and panics
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("source_login", &self.source_login)
            .field("source_password", &"<redacted>")
            .field("destination_password", &"<redacted>")
            .finish()
    }
}

/// Where both catalogs live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub feed_url: String,
    /// Destination API base without a trailing slash
    pub api_base: String,
    pub upload_url: String,
    /// Destination project holding the episodes
    pub project_name: String,
}

impl Endpoints {
    pub fn projects_url(&self) -> String {
        format!("{}/projects.json", self.api_base.trim_end_matches('/'))
    }

    pub fn project_url(&self, project_id: &str) -> String {
        format!(
            "{}/projects/{}.json",
            self.api_base.trim_end_matches('/'),
            project_id
        )
    }

    pub fn media_url(&self, remote_id: &str) -> String {
        format!(
            "{}/medias/{}.json",
            self.api_base.trim_end_matches('/'),
            remote_id
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn loads_all_three_secrets() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (SOURCE_LOGIN_KEY, "avdi"),
            (SOURCE_PASSWORD_KEY, "s3cret"),
            (DESTINATION_PASSWORD_KEY, "token"),
        ]))
        .unwrap();

        assert_eq!(creds.source_auth(), BasicAuth::new("avdi", "s3cret"));
        assert_eq!(creds.destination_auth(), BasicAuth::new("api", "token"));
    }

    #[test]
    fn missing_key_is_reported_by_name() {
        let err = Credentials::from_lookup(lookup_from(&[
            (SOURCE_LOGIN_KEY, "avdi"),
            (SOURCE_PASSWORD_KEY, "s3cret"),
        ]))
        .unwrap_err();

        match err {
            ConfigError::AuthConfigMissing { key } => assert_eq!(key, DESTINATION_PASSWORD_KEY),
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (SOURCE_LOGIN_KEY, ""),
            (SOURCE_PASSWORD_KEY, "s3cret"),
            (DESTINATION_PASSWORD_KEY, "token"),
        ]))
        .unwrap_err();

        match err {
            ConfigError::AuthConfigMissing { key } => assert_eq!(key, SOURCE_LOGIN_KEY),
        }
    }

    #[test]
    fn debug_redacts_passwords() {
        let creds = Credentials {
            source_login: "avdi".to_string(),
            source_password: "s3cret".to_string(),
            destination_password: "token".to_string(),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("avdi"));
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("token"));
    }

    #[test]
    fn endpoint_urls_tolerate_trailing_slash() {
        let endpoints = Endpoints {
            api_base: "https://api.example.com/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            endpoints.projects_url(),
            "https://api.example.com/v1/projects.json"
        );
        assert_eq!(
            endpoints.project_url("abc"),
            "https://api.example.com/v1/projects/abc.json"
        );
        assert_eq!(
            endpoints.media_url("xyz"),
            "https://api.example.com/v1/medias/xyz.json"
        );
    }
}
