// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use url::Url;

use crate::episode::SourceEpisode;
use crate::error::CatalogError;

/// Parse RSS feed XML bytes into source episodes, preserving feed order
///
/// Every item must carry a title with an episode number and an enclosure URL.
pub fn parse_source_feed(xml_bytes: &[u8]) -> Result<Vec<SourceEpisode>, CatalogError> {
    let channel = rss::Channel::read_from(xml_bytes)?;

    channel.items().iter().map(parse_episode).collect()
}

fn parse_episode(item: &rss::Item) -> Result<SourceEpisode, CatalogError> {
    let title = item
        .title()
        .ok_or(CatalogError::MalformedFeedItem { field: "title" })?;

    let enclosure = item
        .enclosure()
        .ok_or(CatalogError::MalformedFeedItem { field: "enclosure" })?;

    let video_url = Url::parse(enclosure.url()).map_err(|e| CatalogError::InvalidVideoUrl {
        url: enclosure.url().to_string(),
        source: e,
    })?;

    Ok(SourceEpisode::new(title, video_url)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>RubyTapas</title>
    <description>Screencasts</description>
    <link>https://example.com</link>
    <item>
      <title>204 Foo</title>
      <enclosure url="https://example.com/videos/204-foo.mp4" length="1234567" type="video/mp4"/>
    </item>
    <item>
      <title>205a Bar</title>
      <enclosure url="https://example.com/videos/205a-bar.mp4" type="video/mp4"/>
    </item>
  </channel>
</rss>"#;

    fn feed_with_item(item: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <description>Test</description>
    <item>{item}</item>
  </channel>
</rss>"#
        )
    }

    #[test]
    fn parse_feed_extracts_episodes_in_order() {
        let episodes = parse_source_feed(SAMPLE_FEED.as_bytes()).unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].title, "204 Foo");
        assert_eq!(episodes[0].number.as_str(), "204");
        assert_eq!(
            episodes[0].video_url.as_str(),
            "https://example.com/videos/204-foo.mp4"
        );
        assert_eq!(episodes[1].number.as_str(), "205a");
    }

    #[test]
    fn parse_feed_allows_empty_channel() {
        let feed = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>T</title><description>D</description></channel></rss>"#;
        assert!(parse_source_feed(feed.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn parse_feed_rejects_item_without_enclosure() {
        let feed = feed_with_item("<title>204 No Video</title>");
        let err = parse_source_feed(feed.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MalformedFeedItem { field: "enclosure" }
        ));
    }

    #[test]
    fn parse_feed_rejects_item_without_title() {
        let feed = feed_with_item(r#"<enclosure url="https://example.com/x.mp4" type="video/mp4"/>"#);
        let err = parse_source_feed(feed.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedFeedItem { field: "title" }));
    }

    #[test]
    fn parse_feed_fails_on_title_without_number() {
        let feed = feed_with_item(
            r#"<title>Bonus Episode</title><enclosure url="https://example.com/x.mp4" type="video/mp4"/>"#,
        );
        let err = parse_source_feed(feed.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::NoIdentifierFound(_)));
    }

    #[test]
    fn parse_feed_rejects_invalid_enclosure_url() {
        let feed = feed_with_item(
            r#"<title>204 Foo</title><enclosure url="not a url" type="video/mp4"/>"#,
        );
        let err = parse_source_feed(feed.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidVideoUrl { .. }));
    }

    #[test]
    fn parse_feed_rejects_garbage() {
        assert!(matches!(
            parse_source_feed(b"this is not xml"),
            Err(CatalogError::FeedParseFailed(_))
        ));
    }
}
