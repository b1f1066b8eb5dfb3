//! API module for the Readwise Reader list endpoint
//!
//! This module provides the paginated document fetch: one request per page,
//! following `nextPageCursor` until it comes back empty. Any failure aborts
//! the whole fetch.

use crate::error::DigestError;
use crate::types::{ListResponse, RemoteDocument};
use chrono::{DateTime, Utc};
use log::debug;
use std::time::Duration;

const USER_AGENT: &str = concat!("readwise-digest/", env!("CARGO_PKG_VERSION"));

/// Location filter for the Reader inbox
pub const INBOX_LOCATION: &str = "new";

/// Query for a single page of the list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub updated_after: DateTime<Utc>,
    pub location: &'static str,
    pub with_html_content: bool,
    pub page_cursor: Option<String>,
}

impl ListQuery {
    /// First-page query for documents updated after `updated_after`
    pub fn first_page(updated_after: DateTime<Utc>) -> Self {
        ListQuery { updated_after, location: INBOX_LOCATION, with_html_content: true, page_cursor: None }
    }

    /// The same query, continued from `cursor`
    pub fn next_page(&self, cursor: &str) -> Self {
        ListQuery { page_cursor: Some(cursor.to_string()), ..self.clone() }
    }

    /// Query parameters in request order
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("withHtmlContent", self.with_html_content.to_string()),
            ("updatedAfter", self.updated_after.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            ("location", self.location.to_string()),
        ];
        if let Some(ref cursor) = self.page_cursor {
            params.push(("pageCursor", cursor.clone()));
        }
        params
    }
}

/// Anything that can answer a single list-page query
pub trait PageSource {
    fn fetch_page(&self, query: &ListQuery) -> Result<ListResponse, DigestError>;
}

/// Fetch every document updated after `updated_after`, in API order
pub fn fetch_documents<S: PageSource + ?Sized>(
    source: &S,
    updated_after: DateTime<Utc>,
) -> Result<Vec<RemoteDocument>, DigestError> {
    let mut all_documents = Vec::new();
    let mut query = ListQuery::first_page(updated_after);
    let mut page = 1;

    loop {
        debug!("fetching page {} (cursor {:?})", page, query.page_cursor);

        let response = source.fetch_page(&query)?;
        debug!("got {} documents on page {} (count {})", response.results.len(), page, response.count);

        all_documents.extend(response.results);

        if response.next_page_cursor.is_empty() {
            break;
        }
        query = query.next_page(&response.next_page_cursor);
        page += 1;
    }

    debug!("fetched {} documents in {} pages", all_documents.len(), page);
    Ok(all_documents)
}

/// Blocking HTTP client for the Reader API
pub struct ReadwiseClient {
    agent: ureq::Agent,
    token: String,
    base_url: String,
}

impl ReadwiseClient {
    /// Create a client; `timeout` bounds each page request
    pub fn new(token: &str, base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).user_agent(USER_AGENT).build();
        ReadwiseClient { agent, token: token.to_string(), base_url: base_url.trim_end_matches('/').to_string() }
    }

    fn list_url(&self) -> String {
        format!("{}/list/", self.base_url)
    }
}

impl PageSource for ReadwiseClient {
    fn fetch_page(&self, query: &ListQuery) -> Result<ListResponse, DigestError> {
        let mut request = self
            .agent
            .get(&self.list_url())
            .set("Authorization", &format!("Token {}", self.token))
            .set("Content-Type", "application/json");
        for (key, value) in query.params() {
            request = request.query(key, &value);
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                return Err(DigestError::ApiStatus { status, body: error_body(response) });
            }
            Err(ureq::Error::Transport(transport)) => return Err(DigestError::Transport(transport.to_string())),
        };

        if response.status() != 200 {
            let status = response.status();
            return Err(DigestError::ApiStatus { status, body: error_body(response) });
        }

        Ok(serde_json::from_reader(response.into_reader())?)
    }
}

/// Body of a failed response, or a note saying why it could not be read
fn error_body(response: ureq::Response) -> String {
    response.into_string().unwrap_or_else(|e| format!("<unreadable body: {}>", e))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
