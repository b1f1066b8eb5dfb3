//! Core data structures for a digest run
//!
//! This module defines the documents received from the Reader API and the
//! display-ready records the newspaper template is rendered from.

use serde::{Deserialize, Deserializer, Serialize};

/// A document as returned by the Reader list endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    /// `None` when the field is absent or null
    #[serde(default)]
    pub published_date: Option<PublishedDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub html_content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[allow(dead_code)] // not shown in the newspaper
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub word_count: u64,
}

/// The shapes the API uses for `published_date`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PublishedDate {
    Text(String),
    /// Unix epoch, in seconds
    Epoch(f64),
    /// Anything else (booleans, objects, arrays)
    Unrecognized(serde_json::Value),
}

/// One page of the list endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    /// Empty once the listing is exhausted
    #[serde(rename = "nextPageCursor", default, deserialize_with = "null_as_default")]
    pub next_page_cursor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<RemoteDocument>,
}

/// A document prepared for the newspaper template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub published_date: String,
    /// Sanitized HTML, embedded without escaping
    pub content: String,
    pub word_count: u64,
}

/// Render model for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestPage {
    pub title: String,
    pub date: String,
    pub articles: Vec<Article>,
    pub total_word_count: u64,
}

impl DigestPage {
    pub fn article_count(&self) -> usize {
        self.articles.len()
    }
}

/// Read JSON `null` as the type's default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
