//! Conversion of fetched documents into the newspaper render model
//!
//! This module handles:
//! - Dropping documents without a title or body
//! - Sanitizing bodies and formatting dates
//! - Totalling word counts over the kept articles

use crate::dates::{format_masthead_date, format_published_date};
use crate::sanitize::neutralize_html;
use crate::types::{Article, DigestPage, RemoteDocument};
use chrono::NaiveDate;
use log::debug;

pub const DIGEST_TITLE: &str = "Daily Tech Digest";

/// Build the digest for `today` from documents in arrival order
pub fn build_digest(documents: &[RemoteDocument], today: NaiveDate) -> DigestPage {
    let articles: Vec<Article> = documents.iter().filter_map(to_article).collect();
    let total_word_count = articles.iter().map(|a| a.word_count).sum();

    DigestPage {
        title: DIGEST_TITLE.to_string(),
        date: format_masthead_date(today),
        articles,
        total_word_count,
    }
}

fn to_article(doc: &RemoteDocument) -> Option<Article> {
    if doc.title.is_empty() || doc.html_content.is_empty() {
        debug!("skipping document {:?} without title or content", doc.id);
        return None;
    }

    Some(Article {
        title: doc.title.clone(),
        author: doc.author.clone(),
        summary: doc.summary.clone(),
        published_date: format_published_date(doc.published_date.as_ref()),
        content: neutralize_html(&doc.html_content),
        word_count: doc.word_count,
    })
}
