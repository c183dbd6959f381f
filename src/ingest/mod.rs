// src/ingest/mod.rs
//! Feed ingest: Atom feed → related CAP documents, fetched one at a time.

pub mod atom;
pub mod cap;

use metrics::counter;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::sync::Arc;
use thiserror::Error;

use crate::transport::Fetcher;
pub use cap::CapDocument;

/// Top-level feed failure. Fatal to the whole run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    #[error("feed unavailable: {0}")]
    Fetch(String),
    #[error("feed unavailable: unparsable feed document: {0}")]
    Parse(String),
}

/// Why one feed entry produced no alert. Never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntrySkipped {
    #[error("fetching {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{url} is not well-formed CAP: {reason}")]
    Malformed { url: String, reason: String },
    #[error("{url} has no CAP info block")]
    MissingInfo { url: String },
}

/// Lazy cursor over the linked CAP documents of one feed fetch.
/// Each call to [`FeedEntries::next_document`] performs one fetch; it cannot be rewound.
pub struct FeedEntries {
    fetcher: Arc<dyn Fetcher>,
    links: std::vec::IntoIter<String>,
    without_link: usize,
}

impl FeedEntries {
    pub fn remaining(&self) -> usize {
        self.links.len()
    }

    /// Entries dropped at parse time for lacking a `rel="related"` link.
    pub fn without_link(&self) -> usize {
        self.without_link
    }

    pub async fn next_document(&mut self) -> Option<Result<CapDocument, EntrySkipped>> {
        let url = self.links.next()?;
        let outcome = match self.fetcher.fetch_text(&url).await {
            Ok(body) => CapDocument::parse(&url, &body),
            Err(e) => Err(EntrySkipped::Fetch {
                url: url.clone(),
                reason: format!("{e:#}"),
            }),
        };
        if let Err(skip) = &outcome {
            tracing::debug!(target: "feed", reason = %skip, "entry skipped");
            counter!("alerts_entries_skipped_total").increment(1);
        }
        Some(outcome)
    }
}

/// Fetch and parse the feed. Linked documents are fetched later, on demand.
pub async fn fetch_alert_documents(
    fetcher: Arc<dyn Fetcher>,
    feed_source: &str,
) -> Result<FeedEntries, FeedError> {
    let body = match fetcher.fetch_text(feed_source).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(target: "feed", error = ?e, url = feed_source, "feed http error");
            counter!("alerts_feed_failures_total").increment(1);
            return Err(FeedError::Fetch(format!("{e:#}")));
        }
    };

    let parsed = atom::parse_feed_links(&scrub_html_entities_for_xml(&body)).map_err(|e| {
        counter!("alerts_feed_failures_total").increment(1);
        FeedError::Parse(e.to_string())
    })?;

    counter!("alerts_feed_entries_total")
        .increment((parsed.links.len() + parsed.without_link) as u64);
    if parsed.without_link > 0 {
        tracing::debug!(target: "feed", count = parsed.without_link, "entries without related link");
    }

    Ok(FeedEntries {
        fetcher,
        links: parsed.links.into_iter(),
        without_link: parsed.without_link,
    })
}

/// Namespace URI of the root element, resolved through default and prefixed
/// declarations. `None` for an unbound root or unreadable XML.
pub(crate) fn root_namespace(xml: &str) -> Option<String> {
    let mut reader = NsReader::from_str(xml);
    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(_) | Event::Empty(_))) => {
                return match ns {
                    ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
                    _ => None,
                };
            }
            Ok((_, Event::Eof)) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}

/// HTML entities that show up in feed text but are not defined in XML.
pub(crate) fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&deg;", "°")
}
