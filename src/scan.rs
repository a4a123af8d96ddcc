//! Content scanning and manifest assembly.
//!
//! Reads every post in the content directory and turns it into a
//! [`ManifestEntry`]:
//!
//! ```text
//! content/
//! ├── hello-world.mdx        → slug "hello-world", url "/blog/hello-world"
//! ├── rust-ownership.mdx     → slug "rust-ownership"
//! ├── notes.md               # wrong extension, ignored
//! ├── .draft.mdx             # hidden, ignored
//! └── drafts/                # subdirectories are not descended into
//!     └── wip.mdx
//! ```
//!
//! ## Validation
//!
//! Scanning stops at the first post that cannot be read or whose front matter
//! is malformed. The error names the file. No partial manifest is produced.

use crate::config::BuildConfig;
use crate::frontmatter::{self, Document, FrontMatterError};
use crate::manifest::{Manifest, ManifestEntry};
use crate::metadata::{self, ReadingTime};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("content directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("post file name is not valid UTF-8: {0}")]
    NonUtf8FileName(PathBuf),
    #[error("malformed front matter in {path}: {source}")]
    MalformedFrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

/// Scan `content_dir` and build the sorted manifest.
///
/// Files are processed in name order, so posts sharing a date always come out
/// in the same order regardless of how the filesystem lists them.
pub fn scan(content_dir: &Path, config: &BuildConfig) -> Result<Manifest, ScanError> {
    let mut paths = discover(content_dir, &config.extension)?;
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut entries = Vec::with_capacity(paths.len());
    for path in &paths {
        let document = read_document(path)?;
        log::debug!(
            "parsed {} ({:?}, {} words)",
            path.display(),
            document.front_matter.title,
            metadata::word_count(&document.body)
        );
        entries.push(build_entry(path, document, config)?);
    }

    Ok(Manifest::from_entries(entries))
}

/// List post files directly inside `dir`, in directory-listing order.
///
/// Only regular files (or symlinks to them) with exactly `extension` are
/// returned. Hidden files and subdirectories are skipped. Entries are filtered
/// by name before anything is resolved, so a broken symlink only matters when
/// it looks like a post.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ScanError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;

        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || path.extension().is_none_or(|e| e != extension) {
            continue;
        }

        let is_file = if entry.path_is_symlink() {
            fs::metadata(path)
                .map_err(|source| ScanError::Io {
                    path: path.to_path_buf(),
                    source,
                })?
                .is_file()
        } else {
            entry.file_type().is_file()
        };
        if is_file {
            found.push(path.to_path_buf());
        } else {
            log::debug!("skipping {}", path.display());
        }
    }

    Ok(found)
}

/// Read one post from disk and parse its front matter.
pub fn read_document(path: &Path) -> Result<Document, ScanError> {
    let raw = fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    frontmatter::parse_front_matter(&raw).map_err(|source| ScanError::MalformedFrontMatter {
        path: path.to_path_buf(),
        source,
    })
}

/// Derive a manifest entry from a parsed post. Pure: no disk access.
pub fn build_entry(
    path: &Path,
    document: Document,
    config: &BuildConfig,
) -> Result<ManifestEntry, ScanError> {
    let Document { front_matter, body } = document;
    let slug = metadata::slug_from_path(path)
        .ok_or_else(|| ScanError::NonUtf8FileName(path.to_path_buf()))?;
    let word_count = metadata::word_count(&body);

    Ok(ManifestEntry {
        url: metadata::post_url(&config.urls.prefix, &slug),
        slug,
        published_at: front_matter.date.to_published_at(),
        reading_time: ReadingTime::estimate(word_count, config.reading.words_per_minute),
        word_count,
        date: front_matter.date,
        front_matter: front_matter.fields,
        content: body,
    })
}
