//! GitHub user search records → [`Entity`].

use serde::Deserialize;

use super::lenient;
use super::text::{count_metric, non_empty, non_empty_owned, summary};
use crate::geo::distance::{distance_km, round_km};
use crate::types::{Coordinates, Entity, EntityType, GeoPoint};

/// Provider short name and id namespace.
pub const SOURCE: &str = "github";

/// Maximum summary (bio) length.
pub const SUMMARY_MAX_CHARS: usize = 240;

/// `GET /search/users` response body.
#[derive(Debug, Default, Deserialize)]
pub struct GithubSearchResponse {
    /// Raw items; non-object entries are skipped by [`GithubSearchResponse::users`].
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

impl GithubSearchResponse {
    /// The well-formed user items, in upstream order.
    pub fn users(self) -> Vec<GithubUserItem> {
        self.items
            .into_iter()
            .filter(serde_json::Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()
    }
}

/// A shallow search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubUserItem {
    #[serde(default, deserialize_with = "lenient")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub html_url: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub account_type: Option<String>,
}

/// `GET /users/{login}` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubUserDetail {
    #[serde(default, deserialize_with = "lenient")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blog: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hireable: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub public_repos: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub followers: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub following: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub html_url: Option<String>,
}

/// Enrichment gathered for one search hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubContext<'a> {
    /// Detail record, when the lookup ran and succeeded.
    pub detail: Option<&'a GithubUserDetail>,
    /// Resolved detail location.
    pub geo: Option<&'a GeoPoint>,
    /// Caller-supplied reference point. Ignored unless [`Coordinates::is_valid`].
    pub reference: Option<Coordinates>,
}

/// Map a search hit plus whatever enrichment is available into an [`Entity`].
pub fn normalize(item: &GithubUserItem, ctx: &GithubContext<'_>) -> Entity {
    let detail = ctx.detail;
    let login = non_empty(item.login.as_deref())
        .or_else(|| detail.and_then(|d| non_empty(d.login.as_deref())));
    let numeric_id = item
        .id
        .or_else(|| detail.and_then(|d| d.id))
        .map(|id| id.to_string());
    let native_id = numeric_id.as_deref().or(login);

    let mut entity = Entity::new(SOURCE, EntityType::People, native_id);

    let detail_str =
        |f: fn(&GithubUserDetail) -> Option<&str>| detail.and_then(|d| non_empty(f(d)));

    entity.name = detail_str(|d| d.name.as_deref())
        .or(login)
        .unwrap_or_default()
        .to_owned();
    let company =
        detail_str(|d| d.company.as_deref()).map(|c| c.trim_start_matches('@').trim());
    entity.headline = match (company, login) {
        (Some(company), _) if !company.is_empty() => company.to_owned(),
        (_, Some(login)) => format!("@{login}"),
        _ => String::new(),
    };
    entity.summary = summary(detail.and_then(|d| d.bio.as_deref()), SUMMARY_MAX_CHARS);
    entity.location = detail_str(|d| d.location.as_deref()).map(str::to_owned);

    let html_url = non_empty_owned(item.html_url.as_deref())
        .or_else(|| detail_str(|d| d.html_url.as_deref()).map(str::to_owned));
    let avatar_url = non_empty_owned(item.avatar_url.as_deref())
        .or_else(|| detail_str(|d| d.avatar_url.as_deref()).map(str::to_owned));
    entity.url = html_url.clone();
    entity.image = avatar_url.clone();
    entity.set_media("avatar", avatar_url.as_deref());
    entity.set_media("github", html_url.as_deref());

    let hireable = detail.and_then(|d| d.hireable);
    if hireable == Some(true) {
        entity.tags.push("hireable".to_owned());
    }

    entity.set_attr("login", login);
    entity.set_attr("company", company.filter(|c| !c.is_empty()));
    entity.set_attr("blog", detail_str(|d| d.blog.as_deref()));
    entity.set_attr("email", detail_str(|d| d.email.as_deref()));
    entity.set_attr("hireable", hireable);
    entity.set_attr("public_repos", detail.and_then(|d| d.public_repos));
    entity.set_attr("followers", detail.and_then(|d| d.followers));
    entity.set_attr("following", detail.and_then(|d| d.following));
    entity.set_attr("account_type", non_empty(item.account_type.as_deref()));
    entity.set_attr("created_at", detail_str(|d| d.created_at.as_deref()));
    entity.set_attr("enriched", detail.is_some());

    entity.set_attr("geo_label", ctx.geo.map(|g| g.label.as_str()));
    entity.set_attr("lat", ctx.geo.map(|g| g.lat));
    entity.set_attr("lon", ctx.geo.map(|g| g.lon));
    let reference = ctx.reference.filter(Coordinates::is_valid);
    let distance = match (ctx.geo, reference) {
        (Some(geo), Some(reference)) => {
            Some(round_km(distance_km(reference, geo.coordinates())))
        }
        _ => None,
    };
    entity.set_attr("distance_km", distance);

    entity.set_metric("followers", count_metric(detail.and_then(|d| d.followers)));
    entity.set_metric("following", count_metric(detail.and_then(|d| d.following)));
    entity.set_metric("public_repos", count_metric(detail.and_then(|d| d.public_repos)));

    entity
}
