// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashSet;

use crate::episode::{DestinationEpisode, EpisodeId, SourceEpisode};

/// A destination entry whose name disagrees with the source title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMismatch {
    pub source: SourceEpisode,
    pub destination: DestinationEpisode,
}

/// Difference between the source feed and the destination catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogDiff {
    /// Source identifiers absent from the destination
    pub missing: HashSet<EpisodeId>,
    /// Source episodes whose identifier is missing, in feed order
    pub missing_episodes: Vec<SourceEpisode>,
    /// Episodes present on both sides with differing titles
    pub mismatches: Vec<TitleMismatch>,
}

impl CatalogDiff {
    /// Compare both catalogs by episode identifier
    ///
    /// Each destination entry is matched against the first source episode with
    /// the same identifier; entries without a source counterpart are left alone.
    pub fn compute(source: &[SourceEpisode], destination: &[DestinationEpisode]) -> Self {
        let posted: HashSet<&EpisodeId> = destination.iter().map(|e| &e.number).collect();

        let missing_episodes: Vec<SourceEpisode> = source
            .iter()
            .filter(|e| !posted.contains(&e.number))
            .cloned()
            .collect();

        let missing = missing_episodes.iter().map(|e| e.number.clone()).collect();

        let mismatches = destination
            .iter()
            .filter_map(|dest| {
                let src = source.iter().find(|s| s.number == dest.number)?;
                (src.title != dest.name).then(|| TitleMismatch {
                    source: src.clone(),
                    destination: dest.clone(),
                })
            })
            .collect();

        Self {
            missing,
            missing_episodes,
            mismatches,
        }
    }

    /// True when nothing needs transferring or renaming
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.mismatches.is_empty()
    }
}
