//! Front-matter parsing for post documents.
//!
//! Every post starts with a header block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: "Example Post"
//! date: "2024-01-02"
//! thumbnail: /images/example.png
//! ---
//! Body content...
//! ```
//!
//! ## Grammar
//!
//! The header is deliberately *not* YAML. Each line is one `key: value` pair:
//!
//! - The line is split on the **first** `": "`, so values may contain `": "` themselves.
//! - Keys and values are trimmed; one matching pair of surrounding `"` or `'` is
//!   stripped from the value.
//! - Blank lines are skipped.
//! - Anything else (a bare `key:`, a list item, an indented continuation) is an
//!   error. There are no multi-line values, lists, or nested tables.
//!
//! `title` and `date` are required. All other keys pass through to the manifest
//! untouched, in the order they were written.

use crate::metadata::PublishDate;
use thiserror::Error;

/// Line that opens and closes the header block.
const DELIMITER: &str = "---";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrontMatterError {
    #[error("document does not start with a `---` front-matter block")]
    MissingOpeningDelimiter,
    #[error("front-matter block is never closed by a `---` line")]
    UnclosedBlock,
    #[error("front-matter line {line} is not `key: value`: {text:?}")]
    MalformedLine { line: usize, text: String },
    #[error("front-matter line {line} has an empty key")]
    EmptyKey { line: usize },
    #[error("required front-matter key `{0}` is missing or empty")]
    MissingKey(&'static str),
    #[error("front-matter `date` is not a valid date: {0:?}")]
    InvalidDate(String),
}

/// Ordered string-to-string front-matter fields.
///
/// Keeps insertion order so the manifest reproduces keys as the author wrote
/// them. Re-inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

/// Validated header: the two required keys, typed, plus every raw field.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    pub date: PublishDate,
    /// All fields as written, including `title` and `date`.
    pub fields: Fields,
}

/// A parsed post: header plus the trimmed body that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub front_matter: FrontMatter,
    pub body: String,
}

/// Split raw text into the header block (between the delimiters) and the body.
///
/// The opening `---` must be the first non-blank line; a UTF-8 BOM is
/// tolerated. The block ends at the next line that is exactly `---` (trailing
/// whitespace and `\r` ignored). The returned body is trimmed.
pub fn split_front_matter(raw: &str) -> Result<(&str, &str), FrontMatterError> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw).trim_start();

    let mut lines = text.split_inclusive('\n');
    let opening = lines
        .next()
        .filter(|line| is_delimiter(line))
        .ok_or(FrontMatterError::MissingOpeningDelimiter)?;

    let block_start = opening.len();
    let mut offset = block_start;
    for line in lines {
        if is_delimiter(line) {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return Ok((block, body.trim()));
        }
        offset += line.len();
    }

    Err(FrontMatterError::UnclosedBlock)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Parse the lines of a header block into ordered fields.
///
/// Line numbers in errors are 1-based and relative to the block.
pub fn parse_fields(block: &str) -> Result<Fields, FrontMatterError> {
    let mut fields = Fields::new();

    for (index, line) in block.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;
        let (key, value) =
            line.split_once(": ")
                .ok_or_else(|| FrontMatterError::MalformedLine {
                    line: number,
                    text: line.trim().to_string(),
                })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(FrontMatterError::EmptyKey { line: number });
        }
        fields.insert(key, strip_quotes(value.trim()));
    }

    Ok(fields)
}

/// Strip one matching pair of surrounding single or double quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Parse a whole document: split, read fields, and validate `title` and `date`.
pub fn parse_front_matter(raw: &str) -> Result<Document, FrontMatterError> {
    let (block, body) = split_front_matter(raw)?;
    let fields = parse_fields(block)?;

    let title = fields
        .get("title")
        .filter(|t| !t.is_empty())
        .ok_or(FrontMatterError::MissingKey("title"))?
        .to_string();

    let date_text = fields
        .get("date")
        .filter(|d| !d.is_empty())
        .ok_or(FrontMatterError::MissingKey("date"))?;
    let date = PublishDate::parse(date_text)
        .ok_or_else(|| FrontMatterError::InvalidDate(date_text.to_string()))?;

    Ok(Document {
        front_matter: FrontMatter {
            title,
            date,
            fields,
        },
        body: body.to_string(),
    })
}
