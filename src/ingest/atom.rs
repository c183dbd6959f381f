// src/ingest/atom.rs
use quick_xml::de::from_str;
use serde::Deserialize;

use super::root_namespace;

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@rel", default)]
    rel: Option<String>,
    #[serde(rename = "@href", default)]
    href: Option<String>,
}

impl AtomEntry {
    fn related_href(&self) -> Option<String> {
        self.links
            .iter()
            .find(|l| l.rel.as_deref() == Some("related"))
            .and_then(|l| l.href.as_deref())
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
    }
}

/// Related links in entry order, and how many entries had none.
#[derive(Debug, Default, PartialEq)]
pub struct FeedLinks {
    pub links: Vec<String>,
    pub without_link: usize,
}

pub fn parse_feed_links(xml: &str) -> Result<FeedLinks, quick_xml::de::DeError> {
    let feed: AtomFeed = from_str(xml)?;

    // Only Atom entries count; an unbound or foreign root has none.
    let ns = root_namespace(xml);
    if ns.as_deref() != Some(ATOM_NS) {
        tracing::warn!(target: "feed", xmlns = ?ns, "feed is not an Atom document");
        return Ok(FeedLinks::default());
    }

    let mut out = FeedLinks::default();
    for entry in &feed.entries {
        match entry.related_href() {
            Some(href) => out.links.push(href),
            None => out.without_link += 1,
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_links_in_order_and_missing_counted() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Alerts</title>
  <entry>
    <id>1</id>
    <link rel="alternate" href="https://x.test/1.html"/>
    <title>One</title>
    <link rel="related" href="https://x.test/1.xml"/>
  </entry>
  <entry><id>2</id><title>No link</title></entry>
  <entry><id>3</id><link rel="related" href=" https://x.test/3.xml "/></entry>
</feed>"#;
        let got = parse_feed_links(xml).unwrap();
        assert_eq!(got.links, vec!["https://x.test/1.xml", "https://x.test/3.xml"]);
        assert_eq!(got.without_link, 1);
    }

    #[test]
    fn empty_feed_yields_no_links() {
        let got = parse_feed_links(r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#).unwrap();
        assert!(got.links.is_empty());
    }

    #[test]
    fn foreign_namespace_has_no_entries() {
        let xml = r#"<feed xmlns="http://example.test/not-atom"><entry><link rel="related" href="https://x.test/1.xml"/></entry></feed>"#;
        assert!(parse_feed_links(xml).unwrap().links.is_empty());
        let bare = r#"<feed><entry><link rel="related" href="https://x.test/1.xml"/></entry></feed>"#;
        assert!(parse_feed_links(bare).unwrap().links.is_empty());
    }
}
