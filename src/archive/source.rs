//! Where archive documents come from: a local site directory or a remote base URL.
//!
//! Every path handed to a source is treated as rooted at the site root, the
//! same way the site's pages fetch `"/" + path_html`.

use std::path::PathBuf;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// User agent sent to remote archives.
const USER_AGENT: &str = concat!("haiku-explorer/", env!("CARGO_PKG_VERSION"));

/// A static site root.
#[derive(Debug, Clone)]
pub enum ArchiveSource {
    /// A directory holding the built site.
    Local(PathBuf),
    /// An `http(s)://` base URL; always ends with `/`.
    Remote { client: Client, base: Url },
}

impl ArchiveSource {
    /// Resolve a root given as a directory path or an `http(s)://` URL.
    pub fn from_root(root: &str) -> Result<Self> {
        if root.starts_with("http://") || root.starts_with("https://") {
            let mut base = Url::parse(root)
                .map_err(|e| AppError::InvalidPath(format!("{}: {}", root, e)))?;
            if !base.path().ends_with('/') {
                let path = format!("{}/", base.path());
                base.set_path(&path);
            }
            let client = Client::builder().user_agent(USER_AGENT).build()?;
            return Ok(Self::Remote { client, base });
        }

        let path = PathBuf::from(root)
            .canonicalize()
            .map_err(|_| AppError::InvalidPath(format!("{} does not exist", root)))?;
        if !path.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "{} is not a directory",
                path.display()
            )));
        }
        Ok(Self::Local(path))
    }

    /// Human-readable root, for titles and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Local(root) => root.display().to_string(),
            Self::Remote { base, .. } => base.to_string(),
        }
    }

    /// Fetch a document as text.
    pub async fn fetch_text(&self, path: &str) -> Result<String> {
        let rel = archive_relative(path)?;
        match self {
            Self::Local(root) => Ok(tokio::fs::read_to_string(root.join(&rel)).await?),
            Self::Remote { client, base } => {
                let url = base
                    .join(&rel)
                    .map_err(|e| AppError::InvalidPath(format!("{}: {}", rel, e)))?;
                let text = client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                Ok(text)
            }
        }
    }

    /// Fetch and decode a JSON document.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let text = self.fetch_text(path).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Normalize a site path to a root-relative one.
///
/// Drops any query string or fragment, leading `/`, `.` and empty segments.
/// Parent segments are rejected so a local source never escapes its root.
pub fn archive_relative(path: &str) -> Result<String> {
    let without_query = path.split(['?', '#']).next().unwrap_or("");
    let mut parts = Vec::new();
    for segment in without_query.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(AppError::InvalidPath(path.to_string())),
            s => parts.push(s),
        }
    }
    if parts.is_empty() {
        return Err(AppError::InvalidPath(path.to_string()));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn relative_strips_root_and_query() {
        assert_eq!(archive_relative("/2020/01/a.html").unwrap(), "2020/01/a.html");
        assert_eq!(archive_relative("./data/tags.json").unwrap(), "data/tags.json");
        assert_eq!(archive_relative("a.html?embed=1").unwrap(), "a.html");
        assert_eq!(archive_relative("a//b.html#top").unwrap(), "a/b.html");
    }

    #[test]
    fn relative_rejects_parent_and_empty() {
        assert!(matches!(
            archive_relative("../etc/passwd"),
            Err(AppError::InvalidPath(_))
        ));
        assert!(archive_relative("/").is_err());
        assert!(archive_relative("").is_err());
    }

    #[test]
    fn from_root_missing_directory_is_invalid() {
        let err = ArchiveSource::from_root("/definitely/not/here").unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
    }

    #[test]
    fn from_root_remote_gets_trailing_slash() {
        let source = ArchiveSource::from_root("https://example.org/site").unwrap();
        assert_eq!(source.describe(), "https://example.org/site/");
    }

    #[tokio::test]
    async fn local_fetch_reads_files_under_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(
            dir.path().join("data").join("manifest.json"),
            r#"{"items":[{"id":1,"path_html":"a.html"}]}"#,
        )
        .unwrap();

        let source = ArchiveSource::from_root(dir.path().to_str().unwrap()).unwrap();
        let text = source.fetch_text("/data/manifest.json").await.unwrap();
        assert!(text.contains("a.html"));

        let doc: crate::archive::model::ManifestDocument =
            source.fetch_json("data/manifest.json").await.unwrap();
        assert_eq!(doc.items.len(), 1);
    }

    #[tokio::test]
    async fn local_fetch_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let source = ArchiveSource::from_root(dir.path().to_str().unwrap()).unwrap();
        let err = source.fetch_text("nope.html").await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[tokio::test]
    async fn local_fetch_bad_json_is_json_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tags.json"), "{ not json").unwrap();
        let source = ArchiveSource::from_root(dir.path().to_str().unwrap()).unwrap();
        let err = source
            .fetch_json::<crate::archive::model::TagsDocument>("tags.json")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }
}
