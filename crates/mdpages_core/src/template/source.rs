use async_trait::async_trait;
use std::path::Path;

/// Where templates and pages are read from.
///
/// A missing file must be reported as [`std::io::ErrorKind::NotFound`], which
/// is what distinguishes a missing template from an unreadable one.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

#[async_trait]
impl TemplateSource for FsSource {
    async fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}
