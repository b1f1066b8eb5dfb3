//! HTML rendering of a digest page
//!
//! The layout is a fixed Tera template compiled into the binary. Text fields
//! are autoescaped; article bodies were sanitized upstream and are emitted
//! as-is.

use crate::error::DigestError;
use crate::types::DigestPage;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "newspaper.html";
const NEWSPAPER_TEMPLATE: &str = include_str!("../templates/newspaper.html");

/// Render the newspaper page for a digest
pub fn render_digest(page: &DigestPage) -> Result<String, DigestError> {
    render_with_template(TEMPLATE_NAME, NEWSPAPER_TEMPLATE, page)
}

fn render_with_template(name: &str, template: &str, page: &DigestPage) -> Result<String, DigestError> {
    let mut tera = Tera::default();
    tera.add_raw_template(name, template)?;

    let context = Context::from_serialize(page)?;
    Ok(tera.render(name, &context)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Article;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            author: "Grace Hopper".to_string(),
            summary: "A summary".to_string(),
            published_date: "June 15, 2023".to_string(),
            content: r#"<p>Body with <a href="https://example.com">a link</a></p>"#.to_string(),
            word_count: 1200,
        }
    }

    fn page(articles: Vec<Article>) -> DigestPage {
        let total_word_count = articles.iter().map(|a| a.word_count).sum();
        DigestPage {
            title: "Daily Tech Digest".to_string(),
            date: "Friday, March 1, 2024".to_string(),
            articles,
            total_word_count,
        }
    }

    #[test]
    fn test_masthead_and_layout() {
        let html = render_digest(&page(vec![article("One"), article("Two")])).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Daily Tech Digest - Friday, March 1, 2024</title>"));
        assert!(html.contains("2 articles &bull; 2400 words total"));
        assert!(html.contains("column-count: 3;"));
        assert!(html.contains("column-count: 4 !important;"));
        assert!(html.contains("column-count: 1;"));
    }

    #[test]
    fn test_body_is_not_escaped() {
        let html = render_digest(&page(vec![article("One")])).unwrap();
        assert!(html.contains(r#"<p>Body with <a href="https://example.com">a link</a></p>"#));
    }

    #[test]
    fn test_text_fields_are_escaped() {
        let mut a = article("Tom & Jerry <3");
        a.summary = "<b>bold</b>".to_string();
        let html = render_digest(&page(vec![a])).unwrap();

        assert!(html.contains("Tom &amp; Jerry &lt;3"));
        assert!(!html.contains("<b>bold"));
    }

    #[test]
    fn test_optional_sections_are_omitted() {
        let mut a = article("Bare");
        a.author = String::new();
        a.published_date = String::new();
        a.summary = String::new();
        a.word_count = 0;
        let html = render_digest(&page(vec![a])).unwrap();

        assert!(!html.contains(r#"<span class="author">"#));
        assert!(!html.contains(r#"<span class="date">"#));
        assert!(!html.contains(r#"<span class="word-count">"#));
        assert!(!html.contains(r#"<div class="article-summary">"#));
    }

    #[test]
    fn test_optional_sections_are_present() {
        let html = render_digest(&page(vec![article("Full")])).unwrap();

        assert!(html.contains(r#"<span class="author">By Grace Hopper</span>"#));
        assert!(html.contains(r#"<span class="date">June 15, 2023</span>"#));
        assert!(html.contains(r#"<span class="word-count">(1200 words)</span>"#));
        assert!(html.contains(r#"<div class="article-summary">"#));
    }

    #[test]
    fn test_article_order_is_preserved() {
        let html = render_digest(&page(vec![article("Alpha"), article("Beta"), article("Gamma")])).unwrap();
        let alpha = html.find("Alpha").unwrap();
        let beta = html.find("Beta").unwrap();
        let gamma = html.find("Gamma").unwrap();
        assert!(alpha < beta && beta < gamma);
        assert_eq!(html.matches(r#"<article class="article">"#).count(), 3);
    }

    #[test]
    fn test_malformed_template_is_an_error() {
        let result = render_with_template("broken.html", "{% for a in articles %}<p>", &page(vec![]));
        assert!(matches!(result, Err(DigestError::Template(_))));
    }
}
