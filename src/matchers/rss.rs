use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::cancel::CancelToken;
use crate::error::{MatcherError, RegistryError};
use crate::feed::{Feed, SearchResult};
use crate::registry::Registry;
use crate::traits::Matcher;

/// Feed type handled by [`RssMatcher`].
pub const FEED_TYPE: &str = "rss";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Install [`RssMatcher`] under `"rss"`.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(FEED_TYPE, RssMatcher::default())
}

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: Channel,
}

#[derive(Debug, Default, Deserialize)]
struct Channel {
    #[serde(default)]
    title: String,

    #[serde(default, rename = "item")]
    items: Vec<Item>,
}

#[derive(Debug, Default, Deserialize)]
struct Item {
    #[serde(default)]
    title: String,

    #[serde(default)]
    description: String,
}

// ---------------------------------------------------------------------------
// RssMatcher
// ---------------------------------------------------------------------------

/// Fetches an RSS 2.0 document over HTTP and matches `term`, as a regular
/// expression, against each item's title and description.
///
/// Results come out in document order, title before description within an
/// item.
/// Each request is bounded by the agent timeout and by whatever remains of
/// the run's deadline, whichever is shorter.
pub struct RssMatcher {
    agent:   ureq::Agent,
    timeout: Duration,
}

impl Default for RssMatcher {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

impl RssMatcher {
    /// A matcher whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            timeout,
        }
    }

    fn retrieve(&self, feed: &Feed, cancel: &CancelToken) -> Result<RssDocument, MatcherError> {
        feed.validate()?;

        if cancel.is_cancelled() {
            return Err(MatcherError::Cancelled);
        }
        let budget = match cancel.remaining() {
            Some(left) => left.min(self.timeout),
            None       => self.timeout,
        };

        let mut response = self
            .agent
            .get(feed.uri.as_str())
            .config()
            .timeout_global(Some(budget))
            .build()
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(code) => MatcherError::Status(code),
                _ if cancel.is_cancelled() => MatcherError::Cancelled,
                other => MatcherError::Http(Box::new(other)),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(MatcherError::Status(status));
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| MatcherError::Http(Box::new(e)))?;
        decode(&body)
    }
}

impl Matcher for RssMatcher {
    fn search(
        &self,
        feed: &Feed,
        term: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<SearchResult>, MatcherError> {
        let pattern = Regex::new(term)?;

        tracing::info!(
            feed_type = %feed.feed_type,
            site = %feed.name,
            uri = %feed.uri,
            "searching feed"
        );

        let document = self.retrieve(feed, cancel)?;
        if cancel.is_cancelled() {
            return Err(MatcherError::Cancelled);
        }

        tracing::debug!(
            site = %feed.name,
            channel = %document.channel.title,
            items = document.channel.items.len(),
            "decoded rss document"
        );
        Ok(match_items(&document.channel.items, &pattern))
    }
}

fn decode(body: &str) -> Result<RssDocument, MatcherError> {
    quick_xml::de::from_str(body).map_err(|e| MatcherError::Decode(e.to_string()))
}

fn match_items(items: &[Item], pattern: &Regex) -> Vec<SearchResult> {
    let mut results = Vec::new();
    for item in items {
        if pattern.is_match(&item.title) {
            results.push(SearchResult::new("Title", item.title.clone()));
        }
        if pattern.is_match(&item.description) {
            results.push(SearchResult::new("Description", item.description.clone()));
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Instant;

    /// Answer one request on a local port with `status` and `body`.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}/feed.xml", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/rss+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        });
        (uri, handle)
    }

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>News</title>
    <link>http://example.com/</link>
    <description>Top stories</description>
    <item>
      <title>President visits factory</title>
      <description>A short trip.</description>
      <link>http://example.com/1</link>
    </item>
    <item>
      <title>Weather</title>
      <description><![CDATA[The president says <b>rain</b>.]]></description>
      <link>http://example.com/2</link>
    </item>
    <item>
      <title>Sports</title>
      <description>Nothing to see.</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn decodes_items_in_document_order() {
        let document = decode(DOCUMENT).unwrap();
        assert_eq!(document.channel.title, "News");
        let titles: Vec<_> = document.channel.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["President visits factory", "Weather", "Sports"]);
    }

    #[test]
    fn matches_title_then_description() {
        let document = decode(DOCUMENT).unwrap();
        let pattern = Regex::new("(?i)president").unwrap();

        let results = match_items(&document.channel.items, &pattern);

        assert_eq!(
            results,
            vec![
                SearchResult::new("Title", "President visits factory"),
                SearchResult::new("Description", "The president says <b>rain</b>."),
            ]
        );
    }

    #[test]
    fn items_separated_by_other_channel_elements_are_all_kept() {
        let document = decode(
            "<rss><channel><title>N</title>\
             <item><title>first president</title></item>\
             <link>http://x</link>\
             <item><title>second president</title></item>\
             </channel></rss>",
        )
        .unwrap();
        let titles: Vec<_> = document.channel.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["first president", "second president"]);
    }

    #[test]
    fn fetches_and_matches_over_http() {
        let (uri, server) = serve_once("200 OK", DOCUMENT);
        let feed = Feed::new("local", uri, FEED_TYPE);

        let results = RssMatcher::default()
            .search(&feed, "(?i)president", &CancelToken::new())
            .unwrap();
        server.join().unwrap();

        assert_eq!(
            results,
            vec![
                SearchResult::new("Title", "President visits factory"),
                SearchResult::new("Description", "The president says <b>rain</b>."),
            ]
        );
    }

    #[test]
    fn server_error_maps_to_status() {
        let (uri, server) = serve_once("500 Internal Server Error", "oops");
        let feed = Feed::new("local", uri, FEED_TYPE);

        let err = RssMatcher::default()
            .search(&feed, "president", &CancelToken::new())
            .unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, MatcherError::Status(500)));
        assert!(err.is_transient());
    }

    #[test]
    fn expired_deadline_skips_the_request() {
        let feed = Feed::new("npr", "http://127.0.0.1:9/unreachable", FEED_TYPE);
        let cancel = CancelToken::with_deadline(Instant::now());
        let err = RssMatcher::default().search(&feed, "president", &cancel).unwrap_err();
        assert!(matches!(err, MatcherError::Cancelled));
    }

    #[test]
    fn deadline_bounds_a_stalled_request() {
        // Accepts the connection but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}/feed.xml", listener.local_addr().unwrap());
        let feed = Feed::new("stalled", uri, FEED_TYPE);

        let start = Instant::now();
        let cancel = CancelToken::new().child_with_timeout(Duration::from_millis(200));
        let err = RssMatcher::default().search(&feed, "president", &cancel).unwrap_err();

        assert!(matches!(err, MatcherError::Cancelled), "got {err:?}");
        assert!(start.elapsed() < Duration::from_secs(10));
        drop(listener);
    }

    #[test]
    fn malformed_document_is_a_decode_error() {
        let err = decode("<rss><channel><item>").unwrap_err();
        assert!(matches!(err, MatcherError::Decode(_)));
    }

    #[test]
    fn invalid_pattern_fails_before_any_request() {
        let feed = Feed::new("npr", "http://127.0.0.1:9/unreachable", FEED_TYPE);
        let err = RssMatcher::default()
            .search(&feed, "(unclosed", &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, MatcherError::InvalidPattern(_)));
    }

    #[test]
    fn blank_uri_is_rejected_without_a_request() {
        let feed = Feed::new("npr", " ", FEED_TYPE);
        let err = RssMatcher::default()
            .search(&feed, "president", &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, MatcherError::MissingUri(name) if name == "npr"));
    }
}
