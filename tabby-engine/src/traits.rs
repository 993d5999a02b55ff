//! Collaborator traits used by the request loop

use crate::error::{TabbyError, TabbyResult};
use crate::format::IterationReport;
use crate::types::{HttpRequestData, HttpResponseData, RunSummary};
use async_trait::async_trait;
use std::path::Path;

/// Sends one HTTP request and reads the full response.
///
/// Connection handling, TLS, redirects and timeouts belong to the
/// implementation. Failures before a status line map to
/// [`TabbyError::TransportError`]; body read failures map to
/// [`TabbyError::ResponseReadError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequestData) -> TabbyResult<HttpResponseData>;
}

/// Supplies template file contents
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn read_template(&self, path: &Path) -> TabbyResult<String>;
}

/// Reads templates from the local file system
#[derive(Debug, Default, Clone, Copy)]
pub struct FsTemplateSource;

#[async_trait]
impl TemplateSource for FsTemplateSource {
    async fn read_template(&self, path: &Path) -> TabbyResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TabbyError::TemplateUnreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

/// Receives per-iteration output
pub trait Reporter: Send {
    /// A successful iteration
    fn report(&mut self, report: &IterationReport);

    /// A failed iteration the loop will retry on its next tick
    fn report_failure(&mut self, index: u64, error: &TabbyError);

    /// End of a loop-mode run
    fn summary(&mut self, summary: &RunSummary);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_fs_template_source_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"id":"{{{{uuid}}}}"}}"#).unwrap();

        let contents = FsTemplateSource.read_template(file.path()).await.unwrap();
        assert_eq!(contents, r#"{"id":"{{uuid}}"}"#);
    }

    #[test]
    fn test_fs_template_source_missing_file() {
        let error = tokio_test::block_on(
            FsTemplateSource.read_template(Path::new("/definitely/not/here.json")),
        )
        .unwrap_err();

        assert!(matches!(error, TabbyError::TemplateUnreadable { .. }));
        assert!(!error.is_recoverable());
    }
}
