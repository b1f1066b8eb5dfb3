//! Run orchestration
//!
//! This module handles the sequential run: fetch, build the digest, render,
//! write the HTML artifact, then hand it to the PDF converter.

use crate::api::{PageSource, fetch_documents};
use crate::digest::build_digest;
use crate::error::DigestError;
use crate::pdf::PdfConverter;
use crate::render::render_digest;
use crate::ui;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// What a finished run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub documents: usize,
    pub articles: usize,
    pub total_word_count: u64,
    pub html_path: PathBuf,
    pub pdf_path: Option<PathBuf>,
}

pub struct Pipeline<'a> {
    source: &'a dyn PageSource,
    converter: Option<&'a dyn PdfConverter>,
    html_path: PathBuf,
}

impl<'a> Pipeline<'a> {
    /// `converter` is `None` when only HTML should be produced
    pub fn new(source: &'a dyn PageSource, converter: Option<&'a dyn PdfConverter>, html_path: PathBuf) -> Self {
        Pipeline { source, converter, html_path }
    }

    pub fn html_path(&self) -> &Path {
        &self.html_path
    }

    /// Fetch documents updated after `cutoff` and publish the digest for `today`
    pub fn run(&self, cutoff: DateTime<Utc>, today: NaiveDate) -> Result<RunSummary, DigestError> {
        ui::status(&format!("Fetching articles since {}", cutoff.to_rfc3339()));
        let documents = fetch_documents(self.source, cutoff)?;
        ui::status(&format!("Fetched {} documents", documents.len()));

        let page = build_digest(&documents, today);
        let html = render_digest(&page)?;

        fs::write(&self.html_path, html)
            .map_err(|e| DigestError::Output { path: self.html_path.clone(), source: e })?;
        info!("wrote {} bytes of HTML", fs::metadata(&self.html_path).map(|m| m.len()).unwrap_or(0));
        ui::status(&format!("Generated newspaper with {} articles", page.article_count()));
        ui::status(&format!("Output written to: {}", self.html_path.display()));

        let pdf_path = match self.converter {
            Some(converter) => {
                ui::status("Generating PDF from HTML...");
                let pdf = converter.convert(&self.html_path)?;
                ui::status(&format!("PDF generated and saved to: {}", pdf.display()));
                Some(pdf)
            }
            None => None,
        };

        Ok(RunSummary {
            documents: documents.len(),
            articles: page.article_count(),
            total_word_count: page.total_word_count,
            html_path: self.html_path.clone(),
            pdf_path,
        })
    }
}
