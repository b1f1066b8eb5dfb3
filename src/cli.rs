use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "readwise-digest")]
#[command(about = "Render your Readwise Reader inbox as a newspaper (HTML and PDF)")]
#[command(version)]
pub struct CliArgs {
    /// Readwise access token (falls back to READWISE_TOKEN, then the settings file)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Only include documents updated after this Unix timestamp
    /// (falls back to CUTOFF_DATETIME, then the settings file)
    #[arg(long, value_name = "UNIX_SECONDS")]
    pub cutoff: Option<String>,

    /// Settings file with KEY=VALUE lines; ignored when missing
    #[arg(long, value_name = "PATH", default_value = ".env")]
    pub env_file: PathBuf,

    /// Browser executable used for PDF conversion (default: auto-detect Chrome/Chromium)
    #[arg(long, value_name = "PATH")]
    pub browser: Option<PathBuf>,

    /// Only write the HTML page, skip PDF conversion
    #[arg(long)]
    pub html_only: bool,

    /// Reader API base address
    #[arg(long, value_name = "URL", hide = true)]
    pub api_base: Option<String>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["readwise-digest"]).unwrap();
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert!(args.token.is_none());
        assert!(args.cutoff.is_none());
        assert!(!args.html_only);
    }

    #[test]
    fn test_all_flags() {
        let args = CliArgs::try_parse_from([
            "readwise-digest",
            "--token",
            "abc",
            "--cutoff",
            "1700000000",
            "--env-file",
            "conf/digest.env",
            "--browser",
            "/usr/bin/chromium",
            "--html-only",
            "--api-base",
            "http://localhost:9000",
        ])
        .unwrap();

        assert_eq!(args.token.as_deref(), Some("abc"));
        assert_eq!(args.cutoff.as_deref(), Some("1700000000"));
        assert_eq!(args.env_file, PathBuf::from("conf/digest.env"));
        assert_eq!(args.browser, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(args.html_only);
        assert_eq!(args.api_base.as_deref(), Some("http://localhost:9000"));
    }
}
