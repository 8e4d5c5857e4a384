//! Bulk download of result links, filtered by file extension.
//!
//! Files are fetched one at a time into a single directory. The name of each
//! file is the last `/`-separated segment of its URL, taken verbatim: query
//! strings and fragments are not stripped, and a later file with the same
//! name replaces an earlier one.
//!
//! A failing URL never stops the batch. Every URL gets an entry in the
//! returned [`DownloadReport`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;

use crate::ui::{format_file_size, status_icon, Status};
use crate::utils::HttpClient;

/// Directory used when none is configured
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

/// Sentinel that disables extension filtering
pub const ALL_EXTENSIONS: &str = "all";

/// Which URLs to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionFilter {
    /// Download every URL
    All,
    /// Download URLs ending in `.<ext>` for one of these extensions
    Only(Vec<String>),
}

impl ExtensionFilter {
    /// Parse `"all"` or a comma-separated list such as `"pdf,doc,sql"`.
    ///
    /// Returns `None` when no extension is given, meaning nothing should be
    /// downloaded. Only the whole value `all` selects every URL; inside a
    /// list, `all` is just another extension. Entries are trimmed and a
    /// leading dot is dropped; matching itself stays case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim() == ALL_EXTENSIONS {
            return Some(ExtensionFilter::All);
        }

        let extensions: Vec<String> = value
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect();

        if extensions.is_empty() {
            None
        } else {
            Some(ExtensionFilter::Only(extensions))
        }
    }

    /// Suffix match on the raw URL string: `a.pdf?x=1` does not match `pdf`.
    pub fn matches(&self, url: &str) -> bool {
        match self {
            ExtensionFilter::All => true,
            ExtensionFilter::Only(extensions) => extensions
                .iter()
                .any(|ext| url.ends_with(&format!(".{}", ext))),
        }
    }
}

/// Last path segment of a URL, or `None` if it cannot name a file.
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let name = url.rsplit('/').next().unwrap_or(url);
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// Outcome for one URL of a batch
#[derive(Debug)]
pub enum DownloadOutcome {
    Saved {
        url: String,
        path: PathBuf,
        bytes: u64,
    },
    /// Excluded by the extension filter
    Skipped { url: String },
    Failed { url: String, error: DownloadError },
}

/// Per-URL results of a batch, in input order
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub outcomes: Vec<DownloadOutcome>,
}

impl DownloadReport {
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Saved { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Failed { .. }))
    }

    /// URLs that passed the filter and were attempted
    pub fn attempted(&self) -> usize {
        self.outcomes.len() - self.skipped()
    }

    fn count(&self, pred: impl Fn(&DownloadOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(*o)).count()
    }
}

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Cannot create download directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("URL has no file name: {0}")]
    NoFileName(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        DownloadError::Network(err.to_string())
    }
}

/// Fetches files into a target directory
#[derive(Debug, Clone)]
pub struct FileDownloader {
    client: HttpClient,
    directory: PathBuf,
    quiet: bool,
}

impl FileDownloader {
    pub fn new(client: HttpClient, directory: impl Into<PathBuf>) -> Self {
        Self {
            client,
            directory: directory.into(),
            quiet: false,
        }
    }

    /// Suppress the per-file status lines (logging is unaffected)
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Create the target directory (and parents) if needed
    pub fn ensure_directory(&self) -> Result<(), DownloadError> {
        std::fs::create_dir_all(&self.directory).map_err(|source| DownloadError::CreateDir {
            path: self.directory.clone(),
            source,
        })
    }

    /// Download every URL accepted by `filter`, one after another.
    ///
    /// Only a failure to create the directory aborts; per-URL failures are
    /// recorded in the report.
    pub async fn download<I, S>(
        &self,
        urls: I,
        filter: &ExtensionFilter,
    ) -> Result<DownloadReport, DownloadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_directory()?;

        let mut report = DownloadReport::default();
        let mut seen_names = HashSet::new();

        for url in urls {
            let url = url.as_ref();

            if !filter.matches(url) {
                tracing::debug!(url, "Skipping URL excluded by extension filter");
                report.outcomes.push(DownloadOutcome::Skipped {
                    url: url.to_string(),
                });
                continue;
            }

            if let Some(name) = file_name_from_url(url) {
                if !seen_names.insert(name.to_string()) {
                    tracing::warn!(file = name, url, "File name already used in this batch, overwriting");
                }
            }

            let outcome = match self.download_file(url).await {
                Ok((path, bytes)) => {
                    self.print_saved(&path, bytes);
                    DownloadOutcome::Saved {
                        url: url.to_string(),
                        path,
                        bytes,
                    }
                }
                Err(error) => {
                    tracing::warn!(url, error = %error, "Download failed");
                    if !self.quiet {
                        eprintln!(
                            "{} Error downloading {}: {}",
                            status_icon(Status::Error).red().bold(),
                            url,
                            error
                        );
                    }
                    DownloadOutcome::Failed {
                        url: url.to_string(),
                        error,
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        tracing::info!(
            saved = report.saved(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Download batch finished"
        );

        Ok(report)
    }

    /// Fetch a single URL into the target directory
    pub async fn download_file(&self, url: &str) -> Result<(PathBuf, u64), DownloadError> {
        let name =
            file_name_from_url(url).ok_or_else(|| DownloadError::NoFileName(url.to_string()))?;
        let path = self.directory.join(name);

        tracing::debug!(url, path = %path.display(), "Downloading file");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status()));
        }
        let bytes = response.bytes().await?;

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| DownloadError::Write {
                path: path.clone(),
                source,
            })?;

        Ok((path, bytes.len() as u64))
    }

    fn print_saved(&self, path: &Path, bytes: u64) {
        if self.quiet {
            return;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(
            "{} File {} downloaded to {} ({})",
            status_icon(Status::Download).magenta(),
            name.yellow(),
            path.display(),
            format_file_size(bytes)
        );
    }
}
