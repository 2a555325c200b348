// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

use crate::episode::DestinationEpisode;
use crate::error::CatalogError;

pub const VIDEO_MEDIA_TYPE: &str = "Video";

/// A project as returned by the project listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(rename = "hashedId", alias = "hashed_id", default)]
    pub hashed_id: Option<String>,
}

/// A single project with its media
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(default)]
    pub medias: Vec<Media>,
}

/// A media item inside a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub hashed_id: Option<String>,
}

impl Media {
    pub fn is_video(&self) -> bool {
        self.kind == VIDEO_MEDIA_TYPE
    }

    /// Convert a video into a catalog entry
    ///
    /// Fails if the video has no hashed ID or its name has no episode number.
    pub fn to_episode(&self) -> Result<DestinationEpisode, CatalogError> {
        let remote_id = self
            .hashed_id
            .as_deref()
            .ok_or_else(|| CatalogError::MissingMediaId {
                name: self.name.clone(),
            })?;
        Ok(DestinationEpisode::new(&self.name, remote_id)?)
    }
}
