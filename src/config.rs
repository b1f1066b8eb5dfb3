//! Configuration resolution module
//!
//! This module handles:
//! - Resolving the token and cutoff from flags, environment and settings file
//! - Parsing the KEY=VALUE settings file
//! - Building the run configuration that replaces hard-coded constants

use crate::cli::CliArgs;
use crate::error::DigestError;
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TOKEN_VAR: &str = "READWISE_TOKEN";
pub const CUTOFF_VAR: &str = "CUTOFF_DATETIME";

pub const DEFAULT_API_BASE: &str = "https://readwise.io/api/v3";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_VIRTUAL_TIME_BUDGET: Duration = Duration::from_millis(15_000);
pub const HTML_OUTPUT: &str = "daily-tech-digest.html";
pub const PDF_OUTPUT: &str = "daily-tech-digest.pdf";

/// Required settings for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub token: String,
    pub cutoff: DateTime<Utc>,
}

/// Everything else a run needs, passed into the components that use it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestConfig {
    pub api_base: String,
    pub request_timeout: Duration,
    pub html_path: PathBuf,
    pub pdf_path: PathBuf,
    pub browser: Option<PathBuf>,
    pub virtual_time_budget: Duration,
    pub skip_pdf: bool,
}

impl Default for DigestConfig {
    fn default() -> Self {
        DigestConfig {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            html_path: PathBuf::from(HTML_OUTPUT),
            pdf_path: PathBuf::from(PDF_OUTPUT),
            browser: None,
            virtual_time_budget: DEFAULT_VIRTUAL_TIME_BUDGET,
            skip_pdf: false,
        }
    }
}

/// Build the run configuration from CLI arguments
pub fn build_config(args: &CliArgs) -> DigestConfig {
    let defaults = DigestConfig::default();
    DigestConfig {
        api_base: args.api_base.clone().unwrap_or(defaults.api_base),
        browser: args.browser.clone(),
        skip_pdf: args.html_only,
        ..defaults
    }
}

/// Resolve the token and cutoff
///
/// Each value comes from the first non-empty source of: command-line flag,
/// `env` lookup, settings file. Values already in the environment win over
/// the settings file.
pub fn resolve_settings<F>(args: &CliArgs, env: F) -> Result<Settings, DigestError>
where
    F: Fn(&str) -> Option<String>,
{
    let file_values = load_env_file(&args.env_file)?;

    let lookup = |flag: &Option<String>, name: &str| -> Option<String> {
        flag.clone()
            .filter(|v| !v.is_empty())
            .or_else(|| env(name).filter(|v| !v.is_empty()))
            .or_else(|| file_values.get(name).filter(|v| !v.is_empty()).cloned())
    };

    let token = lookup(&args.token, TOKEN_VAR).ok_or_else(|| DigestError::MissingSetting {
        name: TOKEN_VAR,
        hint: format!(
            "You can either set it as an environment variable or create a {} file with:\n\
             {}=your_token_here\n\n\
             Get your token from: https://readwise.io/access_token",
            args.env_file.display(),
            TOKEN_VAR
        ),
    })?;

    let cutoff_str = lookup(&args.cutoff, CUTOFF_VAR).ok_or_else(|| DigestError::MissingSetting {
        name: CUTOFF_VAR,
        hint: format!(
            "You can either set it as an environment variable or create a {} file with:\n\
             {}=1234567890  # Unix timestamp\n\n\
             To get a timestamp for 7 days ago, run:\n  \
             date -d '7 days ago' +%s  # Linux\n  \
             date -v-7d +%s           # macOS",
            args.env_file.display(),
            CUTOFF_VAR
        ),
    })?;

    let cutoff = parse_cutoff(&cutoff_str)?;
    debug!("resolved cutoff {}", cutoff);

    Ok(Settings { token, cutoff })
}

/// Parse a Unix timestamp in seconds
pub fn parse_cutoff(value: &str) -> Result<DateTime<Utc>, DigestError> {
    let invalid = |reason: String| DigestError::InvalidSetting { name: CUTOFF_VAR, value: value.to_string(), reason };

    let seconds: i64 = value.trim().parse().map_err(|e| invalid(format!("expected unix timestamp: {}", e)))?;
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| invalid("timestamp out of range".to_string()))
}

/// Read a settings file; a missing file yields no values
pub fn load_env_file(path: &Path) -> Result<HashMap<String, String>, DigestError> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            debug!("loaded settings from {:?}", path);
            Ok(parse_env_file(&contents))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("no settings file at {:?}", path);
            Ok(HashMap::new())
        }
        Err(e) => Err(DigestError::SettingsFile { path: path.to_path_buf(), source: e }),
    }
}

/// Parse KEY=VALUE lines
///
/// Blank lines and `#` comments are skipped, an `export ` prefix is allowed,
/// and one layer of matching quotes is removed. Anything after the closing
/// quote is ignored; unquoted values lose any trailing ` # comment`.
pub fn parse_env_file(contents: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        values.insert(key.to_string(), unquote(value.trim()));
    }

    values
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(end) = value.strip_prefix(quote).and_then(|rest| rest.find(quote)) {
            return value[1..end + 1].to_string();
        }
    }

    match value.find(" #") {
        Some(idx) => value[..idx].trim_end().to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
