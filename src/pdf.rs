//! PDF export through a headless Chrome/Chromium process.
//!
//! The pipeline only sees the [`PdfConverter`] trait; [`ChromeConverter`] is
//! the real implementation and shells out to the browser's `--print-to-pdf`.

use crate::error::DigestError;
use log::debug;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// macOS application bundle, checked before searching PATH
const MACOS_CHROME: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

/// Executable names searched for on PATH, in order
const BROWSER_NAMES: &[&str] = &["google-chrome", "google-chrome-stable", "chromium", "chromium-browser", "chrome"];

/// Converts a rendered HTML file into a PDF.
pub trait PdfConverter {
    /// Convert `html_path`, returning the path of the written PDF.
    fn convert(&self, html_path: &Path) -> Result<PathBuf, DigestError>;
}

/// Headless browser conversion with print-media emulation.
#[derive(Debug, Clone)]
pub struct ChromeConverter {
    binary: PathBuf,
    pdf_path: PathBuf,
    virtual_time_budget: Duration,
}

impl ChromeConverter {
    pub fn new(binary: PathBuf, pdf_path: PathBuf, virtual_time_budget: Duration) -> Self {
        ChromeConverter { binary, pdf_path, virtual_time_budget }
    }

    /// Build a converter for `explicit` or the first browser found on this system.
    pub fn locate(
        explicit: Option<&Path>,
        pdf_path: PathBuf,
        virtual_time_budget: Duration,
    ) -> Result<Self, DigestError> {
        let binary = match explicit {
            Some(path) => find_executable(path)
                .ok_or_else(|| DigestError::BrowserNotFound(format!("{} does not exist", path.display())))?,
            None => find_browser().ok_or_else(|| {
                DigestError::BrowserNotFound(format!(
                    "no Chrome or Chromium found (looked for {} and {} on PATH); pass --browser <PATH>",
                    MACOS_CHROME,
                    BROWSER_NAMES.join(", ")
                ))
            })?,
        };

        debug!("using browser {:?}", binary);
        Ok(ChromeConverter::new(binary, pdf_path, virtual_time_budget))
    }

    /// Browser arguments for converting `html_url`
    pub fn args(&self, html_url: &str) -> Vec<String> {
        vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-extensions".to_string(),
            "--disable-plugins".to_string(),
            format!("--print-to-pdf={}", self.pdf_path.display()),
            "--print-to-pdf-no-header".to_string(),
            "--enable-print-preview".to_string(),
            "--run-all-compositor-stages-before-draw".to_string(),
            // Columns need time to settle before printing
            format!("--virtual-time-budget={}", self.virtual_time_budget.as_millis()),
            "--disable-background-timer-throttling".to_string(),
            "--disable-renderer-backgrounding".to_string(),
            "--disable-backgrounding-occluded-windows".to_string(),
            "--force-color-profile=srgb".to_string(),
            "--media=print".to_string(),
            html_url.to_string(),
        ]
    }
}

impl PdfConverter for ChromeConverter {
    fn convert(&self, html_path: &Path) -> Result<PathBuf, DigestError> {
        let absolute = fs::canonicalize(html_path).map_err(|e| DigestError::Conversion {
            status: format!("cannot resolve {}", html_path.display()),
            output: e.to_string(),
        })?;
        let html_url = format!("file://{}", absolute.display());

        // A leftover PDF from an earlier run would hide a silent failure
        match fs::remove_file(&self.pdf_path) {
            Ok(()) => debug!("removed stale {:?}", self.pdf_path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(DigestError::Output { path: self.pdf_path.clone(), source: e }),
        }

        let args = self.args(&html_url);
        debug!("running {:?} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => DigestError::BrowserNotFound(format!("{}: {}", self.binary.display(), e)),
                _ => DigestError::Conversion { status: "failed to start browser".to_string(), output: e.to_string() },
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(DigestError::Conversion { status: output.status.to_string(), output: combined });
        }

        if !self.pdf_path.exists() {
            return Err(DigestError::MissingPdf(self.pdf_path.clone()));
        }

        debug!("browser wrote {:?}", self.pdf_path);
        Ok(self.pdf_path.clone())
    }
}

/// First known browser on this system
fn find_browser() -> Option<PathBuf> {
    let macos = Path::new(MACOS_CHROME);
    if macos.is_file() {
        return Some(macos.to_path_buf());
    }

    BROWSER_NAMES.iter().find_map(|name| find_on_path(name))
}

/// Resolve an explicit browser: paths must exist, bare names are looked up on PATH
fn find_executable(path: &Path) -> Option<PathBuf> {
    if path.components().count() > 1 || path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }
    find_on_path(path.to_str()?)
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).map(|dir| dir.join(name)).find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn converter(binary: &Path, pdf_path: &Path) -> ChromeConverter {
        ChromeConverter::new(binary.to_path_buf(), pdf_path.to_path_buf(), Duration::from_millis(15_000))
    }

    #[test]
    fn test_args() {
        let c = converter(Path::new("chromium"), Path::new("/tmp/out.pdf"));
        let args = c.args("file:///tmp/digest.html");

        assert_eq!(args.first().map(String::as_str), Some("--headless"));
        assert_eq!(args.last().map(String::as_str), Some("file:///tmp/digest.html"));
        assert!(args.contains(&"--print-to-pdf=/tmp/out.pdf".to_string()));
        assert!(args.contains(&"--virtual-time-budget=15000".to_string()));
        assert!(args.contains(&"--media=print".to_string()));
        assert!(args.contains(&"--disable-gpu".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
    }

    #[test]
    fn test_locate_explicit_missing() {
        let dir = TempDir::new().unwrap();
        let result =
            ChromeConverter::locate(Some(dir.path().join("no-chrome").as_path()), dir.path().join("o.pdf"), Duration::ZERO);
        assert!(matches!(result, Err(DigestError::BrowserNotFound(_))));
    }

    #[test]
    fn test_locate_explicit_existing() {
        let dir = TempDir::new().unwrap();
        let fake = dir.path().join("my-chrome");
        fs::write(&fake, "").unwrap();

        let c = ChromeConverter::locate(Some(fake.as_path()), dir.path().join("o.pdf"), Duration::ZERO).unwrap();
        assert_eq!(c.binary, fake);
    }

    #[test]
    fn test_missing_binary_is_not_found() {
        let dir = TempDir::new().unwrap();
        let html = dir.path().join("digest.html");
        fs::write(&html, "<html></html>").unwrap();

        let c = converter(&dir.path().join("absent-browser"), &dir.path().join("digest.pdf"));
        assert!(matches!(c.convert(&html), Err(DigestError::BrowserNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_convert_with_fake_browser() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let html = dir.path().join("digest.html");
        let pdf = dir.path().join("digest.pdf");
        fs::write(&html, "<html></html>").unwrap();

        let write_script = |name: &str, body: &str| -> PathBuf {
            let path = dir.path().join(name);
            fs::write(&path, body).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        };

        // Writes the file named by --print-to-pdf=
        let good = write_script(
            "good-browser",
            "#!/bin/sh\nfor a in \"$@\"; do\n  case \"$a\" in\n    --print-to-pdf=*) printf '%%PDF-1.4' > \"${a#--print-to-pdf=}\" ;;\n  esac\ndone\n",
        );
        let written = converter(&good, &pdf).convert(&html).unwrap();
        assert_eq!(written, pdf);
        assert!(pdf.exists());

        // Exits cleanly without producing anything
        let lazy = write_script("lazy-browser", "#!/bin/sh\nexit 0\n");
        assert!(matches!(converter(&lazy, &pdf).convert(&html), Err(DigestError::MissingPdf(_))));
        assert!(!pdf.exists(), "stale PDF should have been removed");

        let failing = write_script("failing-browser", "#!/bin/sh\necho 'renderer crashed' >&2\nexit 3\n");
        match converter(&failing, &pdf).convert(&html) {
            Err(DigestError::Conversion { output, .. }) => assert!(output.contains("renderer crashed")),
            other => panic!("expected conversion failure, got {:?}", other),
        }
        assert!(html.exists());
    }
}
