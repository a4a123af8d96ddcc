//! CLI output formatting.
//!
//! Output is information-first: each post leads with its positional index and
//! title, with the source file and derived metadata as indented context lines.
//!
//! ## Build / Check
//!
//! ```text
//! Posts
//! 001 Understanding Ownership
//!     Source: rust-ownership.mdx
//!     Jun 15, 2024 · 412 words · 3 min read
//!     URL: /blog/rust-ownership
//! 002 Hello, World
//!     Source: hello-world.mdx
//!     Jan 02, 2024 · 57 words · 1 min read
//!     URL: /blog/hello-world
//!
//! Wrote 2 posts → generated/content.json
//! ```
//!
//! ## List
//!
//! ```text
//! Jun 15, 2024  Understanding Ownership  /blog/rust-ownership
//! Jan 02, 2024  Hello, World             /blog/hello-world
//! ```
//!
//! Each `format_*` function returns lines for testability; the `print_*`
//! wrappers write them to stdout.

use crate::manifest::Manifest;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Format the posts discovered by a scan.
pub fn format_scan_output(manifest: &Manifest, extension: &str) -> Vec<String> {
    let mut lines = vec!["Posts".to_string()];

    if manifest.is_empty() {
        lines.push("    (none)".to_string());
        return lines;
    }

    for (i, entry) in manifest.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), entry.title()));
        lines.push(format!("    Source: {}.{}", entry.slug, extension));
        lines.push(format!(
            "    {} · {} · {}",
            entry.published_at,
            plural(entry.word_count, "word", "words"),
            entry.reading_time
        ));
        lines.push(format!("    URL: {}", entry.url));
    }

    lines
}

/// Closing line after a manifest has been written.
pub fn format_build_summary(manifest: &Manifest, output: &Path) -> String {
    format!(
        "Wrote {} → {}",
        plural(manifest.len(), "post", "posts"),
        output.display()
    )
}

/// One aligned line per post: date, title, URL.
pub fn format_list_output(manifest: &Manifest) -> Vec<String> {
    let date_width = manifest
        .iter()
        .map(|e| e.published_at.chars().count())
        .max()
        .unwrap_or(0);
    let title_width = manifest
        .iter()
        .map(|e| e.title().chars().count())
        .max()
        .unwrap_or(0);

    manifest
        .iter()
        .map(|e| {
            format!(
                "{:<dw$}  {:<tw$}  {}",
                e.published_at,
                e.title(),
                e.url,
                dw = date_width,
                tw = title_width
            )
        })
        .collect()
}

pub fn print_scan_output(manifest: &Manifest, extension: &str) {
    for line in format_scan_output(manifest, extension) {
        println!("{}", line);
    }
}

pub fn print_list_output(manifest: &Manifest) {
    for line in format_list_output(manifest) {
        println!("{}", line);
    }
}
