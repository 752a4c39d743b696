//! arXiv Atom entries → [`Entity`].
//!
//! An entry is mapped to its first author: the entity's name is the author,
//! the headline is the paper title.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use super::text::{collapse_whitespace, non_empty, summary};
use crate::error::ProviderError;
use crate::types::{Entity, EntityType};

/// Provider short name and id namespace.
pub const SOURCE: &str = "arxiv";

/// Maximum summary (abstract) length.
pub const SUMMARY_MAX_CHARS: usize = 500;

/// One `<entry>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArxivEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(rename = "author", default)]
    pub authors: Vec<ArxivAuthor>,
    #[serde(rename = "link", default)]
    pub links: Vec<ArxivLink>,
    #[serde(rename = "category", default)]
    pub categories: Vec<ArxivCategory>,
    #[serde(rename = "primary_category", alias = "arxiv:primary_category", default)]
    pub primary_category: Option<ArxivCategory>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArxivAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "affiliation", alias = "arxiv:affiliation", default)]
    pub affiliation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArxivLink {
    #[serde(rename = "@href", default)]
    pub href: Option<String>,
    #[serde(rename = "@rel", default)]
    pub rel: Option<String>,
    #[serde(rename = "@type", default)]
    pub media_type: Option<String>,
    #[serde(rename = "@title", default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArxivCategory {
    #[serde(rename = "@term", default)]
    pub term: Option<String>,
}

/// Parse an Atom document into its entries.
///
/// Entries are deserialized one at a time. An entry whose shape cannot be
/// read (markup inside a text field, a repeated singular element) is
/// skipped and logged; its siblings are still returned.
///
/// # Errors
///
/// Returns [`ProviderError::Parse`] if the body is not well-formed XML or
/// its root element is not `<feed>`.
pub fn parse_feed(xml: &str) -> Result<Vec<ArxivEntry>, ProviderError> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut saw_feed = false;
    let mut entries = Vec::new();
    let mut index = 0usize;

    loop {
        match reader.read_event().map_err(feed_error)? {
            Event::Start(start) if depth == 0 => {
                if start.local_name().as_ref() != b"feed" {
                    return Err(unexpected_root(start.local_name().as_ref()));
                }
                saw_feed = true;
                depth += 1;
            }
            Event::Empty(start) if depth == 0 => {
                if start.local_name().as_ref() != b"feed" {
                    return Err(unexpected_root(start.local_name().as_ref()));
                }
                return Ok(entries);
            }
            Event::Start(start) if depth == 1 && start.local_name().as_ref() == b"entry" => {
                let end = start.to_end().into_owned();
                let span = reader.read_to_end(end.name()).map_err(feed_error)?;
                let inner = usize::try_from(span.start)
                    .ok()
                    .zip(usize::try_from(span.end).ok())
                    .and_then(|(from, to)| xml.get(from..to))
                    .ok_or_else(|| ProviderError::Parse("arxiv feed: entry out of bounds".into()))?;

                match quick_xml::de::from_str::<ArxivEntry>(&format!("<entry>{inner}</entry>")) {
                    Ok(entry) => entries.push(entry),
                    Err(err) => {
                        tracing::warn!(index, error = %err, "skipping unreadable arxiv entry");
                    }
                }
                index += 1;
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if saw_feed {
        Ok(entries)
    } else {
        Err(ProviderError::Parse("arxiv feed: no <feed> element".into()))
    }
}

fn feed_error(err: quick_xml::Error) -> ProviderError {
    ProviderError::Parse(format!("arxiv feed: {err}"))
}

fn unexpected_root(name: &[u8]) -> ProviderError {
    ProviderError::Parse(format!(
        "arxiv feed: unexpected root element <{}>",
        String::from_utf8_lossy(name)
    ))
}

impl ArxivEntry {
    fn pdf_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| {
                l.title.as_deref() == Some("pdf")
                    || l.media_type.as_deref() == Some("application/pdf")
            })
            .and_then(|l| non_empty(l.href.as_deref()))
    }

    fn alternate_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .and_then(|l| non_empty(l.href.as_deref()))
    }

    fn category_terms(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter_map(|c| non_empty(c.term.as_deref()))
            .map(str::to_owned)
            .collect()
    }
}

/// Map one entry into an [`Entity`].
pub fn normalize(entry: &ArxivEntry) -> Entity {
    let entry_id = non_empty(entry.id.as_deref());
    let mut entity = Entity::new(SOURCE, EntityType::People, entry_id);

    let authors: Vec<&str> = entry
        .authors
        .iter()
        .filter_map(|a| non_empty(a.name.as_deref()))
        .collect();

    entity.name = authors.first().map(|a| collapse_whitespace(a)).unwrap_or_default();
    entity.headline = collapse_whitespace(entry.title.as_deref().unwrap_or_default());
    entity.summary = summary(entry.summary.as_deref(), SUMMARY_MAX_CHARS);
    entity.url = entry_id.or_else(|| entry.alternate_link()).map(str::to_owned);

    let tags = entry.category_terms();
    let primary = entry
        .primary_category
        .as_ref()
        .and_then(|c| non_empty(c.term.as_deref()))
        .map(str::to_owned)
        .or_else(|| tags.first().cloned());

    let pdf = entry.pdf_link();
    entity.set_media("pdf", pdf);

    entity.set_attr("primary_category", primary);
    entity.set_attr("published", non_empty(entry.published.as_deref()));
    entity.set_attr("updated", non_empty(entry.updated.as_deref()));
    entity.set_attr(
        "authors",
        (!authors.is_empty()).then(|| authors.join(", ")),
    );
    entity.set_attr(
        "affiliation",
        entry
            .authors
            .first()
            .and_then(|a| non_empty(a.affiliation.as_deref())),
    );
    entity.set_attr("pdf", pdf);

    entity.set_metric("authors", authors.len() as f64);
    entity.set_metric("categories", tags.len() as f64);
    entity.tags = tags;

    entity
}
