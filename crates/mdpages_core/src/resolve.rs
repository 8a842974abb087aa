//! Mapping request paths onto the markdown tree.

use crate::document::is_markdown_path;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A markdown file to render.
    Page {
        file: PathBuf,
        /// Directory URL of the page, e.g. `/docs/`.
        url_base: String,
    },
    NotFound,
}

/// Resolves `url_path` against the markdown tree at `root`.
///
/// - A directory resolves to the first of `index_files` present in it.
/// - A path naming a markdown file resolves to that file.
/// - Otherwise `<path>.md` is tried, so `/guide/setup` serves `guide/setup.md`.
///
/// Paths trying to leave `root` never resolve.
pub async fn resolve(root: &Path, url_path: &str, index_files: &[String]) -> Resolved {
    let Some(segments) = decode_segments(url_path) else {
        tracing::debug!(url_path, "Rejected request path");
        return Resolved::NotFound;
    };

    let candidate = root.join(segments.iter().collect::<PathBuf>());

    if is_dir(&candidate).await {
        for index in index_files {
            let file = candidate.join(index);
            if is_file(&file).await {
                return Resolved::Page {
                    file,
                    url_base: dir_url(&segments),
                };
            }
        }
        tracing::debug!(dir = %candidate.display(), "Directory has no index file");
        return Resolved::NotFound;
    }

    let url_base = dir_url(&segments[..segments.len().saturating_sub(1)]);

    if is_markdown_path(&candidate) && is_file(&candidate).await {
        return Resolved::Page {
            file: candidate,
            url_base,
        };
    }

    if let Some(file_name) = candidate.file_name() {
        let mut with_extension = file_name.to_os_string();
        with_extension.push(".md");
        let file = candidate.with_file_name(with_extension);
        if is_file(&file).await {
            return Resolved::Page { file, url_base };
        }
    }

    Resolved::NotFound
}

/// Percent-decodes `url_path` and splits it into plain path segments.
///
/// Returns `None` for paths with `..` or anything else that would not stay
/// below the root.
fn decode_segments(url_path: &str) -> Option<Vec<String>> {
    let decoded = percent_decode_str(url_path).decode_utf8().ok()?;

    let segments: Vec<String> = decoded
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(String::from)
        .collect();

    let stays_below_root = segments.iter().all(|segment| {
        !segment.contains('\\')
            && !segment.contains('\0')
            && Path::new(segment)
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
    });

    stays_below_root.then_some(segments)
}

fn dir_url(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}
