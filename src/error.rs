//! Error type shared by every stage of a digest run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("{name} is required\n{hint}")]
    MissingSetting { name: &'static str, hint: String },

    #[error("invalid {name} '{value}': {reason}")]
    InvalidSetting { name: &'static str, value: String, reason: String },

    #[error("failed to read settings file {}: {source}", .path.display())]
    SettingsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to make request: {0}")]
    Transport(String),

    #[error("API request failed with status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("template rendering failed: {0}")]
    Template(String),

    #[error("failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("browser not found: {0}")]
    BrowserNotFound(String),

    #[error("failed to generate PDF ({status})\nOutput: {output}")]
    Conversion { status: String, output: String },

    #[error("browser exited successfully but no PDF was written to {}", .0.display())]
    MissingPdf(PathBuf),
}

impl DigestError {
    /// Errors raised by the PDF stage, after the HTML artifact is on disk
    pub fn is_conversion(&self) -> bool {
        matches!(
            self,
            DigestError::BrowserNotFound(_) | DigestError::Conversion { .. } | DigestError::MissingPdf(_)
        )
    }
}

impl From<tera::Error> for DigestError {
    fn from(e: tera::Error) -> Self {
        // tera keeps the useful detail (line, missing variable) in the source chain
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = std::error::Error::source(inner);
        }
        DigestError::Template(message)
    }
}
