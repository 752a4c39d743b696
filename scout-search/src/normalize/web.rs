//! Scraped web profile hits → [`Entity`].
//!
//! Search result pages carry no stable identifier, so every normalization
//! synthesizes a fresh random id.

use super::text::{collapse_whitespace, summary};
use crate::types::{Entity, EntityType};

/// Provider short name and id namespace.
pub const SOURCE: &str = "web";

/// Maximum summary (snippet) length.
pub const SUMMARY_MAX_CHARS: usize = 300;

/// Separators profile sites put between a person's name and the rest of the title.
const TITLE_SEPARATORS: &[&str] = &[" - ", " | ", " – ", " — "];

/// One organic hit from the HTML results page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebHit {
    /// Result title as displayed.
    pub title: String,
    /// Unwrapped target URL.
    pub url: String,
    /// Result snippet.
    pub snippet: String,
    /// 1-based position on the results page.
    pub rank: usize,
}

/// Split `"Jane Doe - Staff Engineer - Acme | LinkedIn"` into the leading
/// name and the remaining segments.
fn split_title(title: &str) -> (String, Vec<String>) {
    let mut segments = vec![collapse_whitespace(title)];
    for sep in TITLE_SEPARATORS {
        segments = segments
            .iter()
            .flat_map(|s| s.split(sep))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
    }
    let mut segments = segments.into_iter();
    let name = segments.next().unwrap_or_default();
    (name, segments.collect())
}

/// Map one hit into an [`Entity`].
pub fn normalize(hit: &WebHit) -> Entity {
    let mut entity = Entity::new(SOURCE, EntityType::People, None);

    let (name, rest) = split_title(&hit.title);
    entity.name = name;
    entity.headline = rest.join(" · ");
    entity.summary = summary(Some(&hit.snippet), SUMMARY_MAX_CHARS);

    let parsed = url::Url::parse(hit.url.trim()).ok();
    let domain = parsed
        .as_ref()
        .and_then(|u| u.host_str())
        .map(|h| h.trim_start_matches("www.").to_owned());
    let link = parsed.as_ref().map(|u| u.to_string());
    entity.set_media("link", link.as_deref());
    entity.url = link;

    let title = collapse_whitespace(&hit.title);
    entity.set_attr("domain", domain);
    entity.set_attr("title", (!title.is_empty()).then_some(title));
    entity.set_metric("rank", hit.rank as f64);

    entity
}
