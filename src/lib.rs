//! # Postmark
//!
//! Builds the post manifest for an MDX blog. Every page of the site (the blog
//! index, each post's layout and metadata) reads one JSON file instead of
//! touching the content directory itself:
//!
//! ```text
//! content/*.mdx  →  scan  →  Manifest  →  save  →  generated/content.json
//! ```
//!
//! Scanning and saving are separate steps. [`scan::scan`] is a function from a
//! directory to an in-memory [`manifest::Manifest`]; [`manifest::Manifest::save`]
//! persists it. Everything between (parsing, deriving, sorting) can be tested
//! without touching disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | `---` header parsing: ordered `key: value` fields plus required `title` / `date` |
//! | [`scan`] | Post discovery, per-post derivation, manifest assembly |
//! | [`metadata`] | Derived fields: slug, URL, `publishedAt`, word count, reading time |
//! | [`manifest`] | Manifest types, JSON shape, atomic save, load, lookup by slug |
//! | [`config`] | `postmark.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Minimal Front-Matter Grammar
//!
//! The header is one `key: value` per line, not YAML. Posts only need flat
//! string metadata (title, date, thumbnail, description), and a line grammar
//! has no surprising coercions: `date: 2024-01-02` stays the string the author
//! wrote. Lines that do not fit the grammar are errors rather than silently
//! dropped, so a YAML list in a header fails the build instead of vanishing.
//!
//! ## All or Nothing
//!
//! A build either represents every post or fails. The first unreadable file or
//! malformed header aborts with the offending path, and the previous manifest
//! is left in place. The manifest itself is written through a temp file and an
//! atomic rename, so a crash mid-write cannot leave a truncated file behind.
//!
//! ## Deterministic Output
//!
//! Posts are read in file-name order and sorted newest first with a stable
//! sort, and the JSON has no timestamps or other build-specific fields.
//! Rebuilding unchanged content produces a byte-identical manifest.

pub mod config;
pub mod frontmatter;
pub mod manifest;
pub mod metadata;
pub mod output;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
