//! Headless Chromium PDF renderer

use crate::error::RenderError;
use crate::traits::PdfRenderer;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Budget (ms) of virtual time Chromium gives the page to settle before printing
const SETTLE_BUDGET_MS: u64 = 5_000;

/// Prints HTML to PDF with one short-lived headless Chromium process per call.
///
/// The page is written to a scratch directory that also holds the browser profile, so
/// concurrent renders never share state. The directory is removed when the call returns and
/// the browser is killed if the call is dropped or times out.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    chromium_path: String,
    timeout: Duration,
}

impl ChromiumRenderer {
    pub fn new(chromium_path: impl Into<String>, timeout: Duration) -> Result<Self, RenderError> {
        let chromium_path = chromium_path.into();

        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if chromium_path.chars().any(|c| dangerous_chars.contains(&c)) {
            return Err(RenderError::Config(
                "Invalid chromium_path: contains dangerous characters".to_string(),
            ));
        }
        if timeout.is_zero() {
            return Err(RenderError::Config("Render timeout cannot be 0".to_string()));
        }

        Ok(Self {
            chromium_path,
            timeout,
        })
    }

    fn command(&self, workdir: &Path, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.chromium_path);
        cmd.arg("--headless")
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-pdf-header-footer")
            .arg("--run-all-compositor-stages-before-draw")
            .arg(format!("--virtual-time-budget={}", SETTLE_BUDGET_MS))
            .arg(format!("--user-data-dir={}", workdir.join("profile").display()))
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError> {
        let workdir = tempfile::TempDir::new()?;
        let input = workdir.path().join("document.html");
        let output = workdir.path().join("document.pdf");
        tokio::fs::write(&input, html).await?;

        let start = std::time::Instant::now();
        let child = self
            .command(workdir.path(), &input, &output)
            .spawn()
            .map_err(|e| RenderError::Launch(format!("{}: {}", self.chromium_path, e)))?;

        let result = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::error!(
                    timeout_secs = self.timeout.as_secs(),
                    "Browser render timed out"
                );
                return Err(RenderError::Timeout(self.timeout.as_secs()));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RenderError::BrowserFailed {
                status: result.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let pdf = match tokio::fs::read(&output).await {
            Ok(pdf) => pdf,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::InvalidOutput(
                    "browser exited without writing a PDF".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        if !pdf.starts_with(PDF_MAGIC) {
            return Err(RenderError::InvalidOutput(
                "output does not start with %PDF-".to_string(),
            ));
        }

        tracing::debug!(
            size_bytes = pdf.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Browser render finished"
        );

        Ok(Bytes::from(pdf))
    }
}
