// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod id;

pub use id::{EpisodeId, extract_episode_id};

use url::Url;

use crate::error::IdentifierError;

/// An episode offered by the source feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEpisode {
    pub title: String,
    pub video_url: Url,
    pub number: EpisodeId,
}

impl SourceEpisode {
    /// Build an episode, deriving its number from the title
    pub fn new(title: impl Into<String>, video_url: Url) -> Result<Self, IdentifierError> {
        let title = title.into();
        let number = extract_episode_id(&title)?;
        Ok(Self {
            title,
            video_url,
            number,
        })
    }
}

/// A video already hosted at the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationEpisode {
    pub name: String,
    pub number: EpisodeId,
    /// Hashed ID used by the destination API
    pub remote_id: String,
}

impl DestinationEpisode {
    /// Build an entry, deriving its number from the stored name
    pub fn new(
        name: impl Into<String>,
        remote_id: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        let name = name.into();
        let number = extract_episode_id(&name)?;
        Ok(Self {
            name,
            number,
            remote_id: remote_id.into(),
        })
    }
}
