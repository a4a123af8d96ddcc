//! The post manifest: the sorted list of every post's metadata.
//!
//! The manifest is a JSON array, one object per post, newest first. Each object
//! carries the post's front-matter keys in the order they were written,
//! followed by the derived fields:
//!
//! ```json
//! {
//!   "title": "Example Post",
//!   "date": "2024-01-02",
//!   "url": "/blog/example-post",
//!   "slug": "example-post",
//!   "publishedAt": "Jan 02, 2024",
//!   "readingTime": "1 min read",
//!   "wordCount": 42,
//!   "content": "Body content..."
//! }
//! ```
//!
//! A front-matter key that collides with a derived field is dropped in favor
//! of the derived value.
//!
//! Writing is atomic: the JSON is staged in a temp file next to the target
//! and renamed over it, so readers see either the previous manifest or the new
//! one, never a truncated file.

use crate::frontmatter::Fields;
use crate::metadata::{PublishDate, ReadingTime};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Keys the builder derives itself, in output order.
const DERIVED_KEYS: &[&str] = &[
    "url",
    "slug",
    "publishedAt",
    "readingTime",
    "wordCount",
    "content",
];

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One post as it appears in the manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct ManifestEntry {
    /// Front-matter fields as written, passed through unchanged.
    pub front_matter: Fields,
    /// Parsed `date`; the sort key.
    pub date: PublishDate,
    pub url: String,
    pub slug: String,
    pub published_at: String,
    pub reading_time: ReadingTime,
    pub word_count: usize,
    /// Post body with the front matter removed.
    pub content: String,
}

impl ManifestEntry {
    pub fn title(&self) -> &str {
        self.front_matter.get("title").unwrap_or_default()
    }
}

impl Serialize for ManifestEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let passthrough = self
            .front_matter
            .iter()
            .filter(|(key, _)| !DERIVED_KEYS.contains(key));

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in passthrough {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("url", &self.url)?;
        map.serialize_entry("slug", &self.slug)?;
        map.serialize_entry("publishedAt", &self.published_at)?;
        map.serialize_entry("readingTime", &self.reading_time.to_string())?;
        map.serialize_entry("wordCount", &self.word_count)?;
        map.serialize_entry("content", &self.content)?;
        map.end()
    }
}

/// On-disk shape of an entry, before the front matter is re-validated.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    url: String,
    slug: String,
    published_at: String,
    reading_time: String,
    word_count: usize,
    content: String,
    #[serde(flatten)]
    front_matter: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<RawEntry> for ManifestEntry {
    type Error = String;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let mut front_matter = Fields::new();
        for (key, value) in raw.front_matter {
            match value {
                serde_json::Value::String(s) => front_matter.insert(key, s),
                other => return Err(format!("front-matter key `{key}` is not a string: {other}")),
            }
        }

        let date_text = front_matter
            .get("date")
            .ok_or_else(|| format!("entry `{}` has no `date`", raw.slug))?;
        let date = PublishDate::parse(date_text)
            .ok_or_else(|| format!("entry `{}` has an invalid date {date_text:?}", raw.slug))?;
        let reading_time = raw.reading_time.parse().map_err(|e| format!("{e}"))?;

        Ok(Self {
            front_matter,
            date,
            url: raw.url,
            slug: raw.slug,
            published_at: raw.published_at,
            reading_time,
            word_count: raw.word_count,
            content: raw.content,
        })
    }
}

/// All posts, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Sort entries by date, most recent first.
    ///
    /// The sort is stable: posts published at the same instant keep the order
    /// they were given in, whatever offset their dates were written with.
    pub fn from_entries(mut entries: Vec<ManifestEntry>) -> Self {
        entries.sort_by(|a, b| b.date.instant().cmp(&a.date.instant()));
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a post by slug, as the per-post page does.
    pub fn find_by_slug(&self, slug: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.slug == slug)
    }

    /// Compact JSON, byte-for-byte deterministic for the same entries.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write the manifest to `path`, replacing any previous file in full.
    ///
    /// Creates the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let json = self.to_json()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write_err = |source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(dir).map_err(write_err)?;
        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        staged.write_all(json.as_bytes()).map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;
        staged.persist(path).map_err(|e| write_err(e.error))?;

        log::debug!("wrote {} bytes to {}", json.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
