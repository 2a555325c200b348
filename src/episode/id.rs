// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::IdentifierError;

/// Maximal runs of ASCII digits
///
/// The regex crate has no lookaround, so adjacency is enforced by matching whole
/// digit runs and inspecting the bytes that follow.
static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Canonical episode number: three digits and an optional lowercase letter
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpisodeId(String);

impl EpisodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for EpisodeId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        extract_episode_id(s)
            .ok()
            .filter(|id| id.0 == s)
            .ok_or_else(|| IdentifierError {
                title: s.to_string(),
            })
    }
}

/// Extract the first episode number embedded in a title
///
/// Matches exactly three digits that are not part of a longer run of digits.
/// A directly following lowercase letter is included unless a digit comes
/// right after it ("204a" in "204a: Foo", but only "204" in "204a5").
pub fn extract_episode_id(title: &str) -> Result<EpisodeId, IdentifierError> {
    let bytes = title.as_bytes();

    DIGIT_RUN_RE
        .find_iter(title)
        .filter(|run| run.len() == 3)
        .map(|run| {
            let letter = bytes.get(run.end()).filter(|b| b.is_ascii_lowercase());
            let after_letter = bytes.get(run.end() + 1);
            match letter {
                Some(&letter) if !after_letter.is_some_and(u8::is_ascii_digit) => {
                    EpisodeId(format!("{}{}", run.as_str(), letter as char))
                }
                _ => EpisodeId(run.as_str().to_string()),
            }
        })
        .next()
        .ok_or_else(|| IdentifierError {
            title: title.to_string(),
        })
}
