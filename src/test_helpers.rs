//! Shared test utilities for the postmark test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_post(tmp.path(), "a.mdx", "A", "2024-01-01", "hello world");
//! let manifest = scan(tmp.path(), &BuildConfig::default()).unwrap();
//!
//! assert_eq!(slugs(&manifest), vec!["a"]);
//! assert_eq!(find_entry(&manifest, "a").word_count, 2);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::manifest::{Manifest, ManifestEntry};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Source text of a post with a `title`/`date` header.
pub fn post_source(title: &str, date: &str, body: &str) -> String {
    format!("---\ntitle: \"{title}\"\ndate: \"{date}\"\n---\n{body}\n")
}

/// Write a post file into `dir`.
pub fn write_post(dir: &Path, file_name: &str, title: &str, date: &str, body: &str) {
    std::fs::write(dir.join(file_name), post_source(title, date, body)).unwrap();
}

// =========================================================================
// Manifest lookups: panic with a clear message on miss
// =========================================================================

/// Find an entry by slug. Panics if not found.
pub fn find_entry<'a>(manifest: &'a Manifest, slug: &str) -> &'a ManifestEntry {
    manifest.find_by_slug(slug).unwrap_or_else(|| {
        panic!("entry '{slug}' not found. Available: {:?}", slugs(manifest))
    })
}

/// All slugs in manifest order.
pub fn slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.iter().map(|e| e.slug.as_str()).collect()
}
