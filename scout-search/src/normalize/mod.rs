//! Per-source normalization mappers.
//!
//! Each submodule owns one upstream's raw record shape and a total
//! `normalize` function from that shape into [`Entity`](crate::types::Entity).
//! Raw shapes use `Option`/`Vec` fields with serde defaults so partial
//! upstream records still deserialize; the mappers then read them through the
//! helpers in [`text`].

pub mod arxiv;
pub mod github;
pub mod text;
pub mod web;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Deserialize a JSON field into `T`, turning a type mismatch into `None`
/// instead of failing the whole record.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
