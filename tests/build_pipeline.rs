//! End-to-end builds: content directory in, manifest file out.

use postmark_manifest::config::{self, BuildConfig, CONFIG_FILENAME};
use postmark_manifest::frontmatter::FrontMatterError;
use postmark_manifest::manifest::{Manifest, ManifestError};
use postmark_manifest::scan::{self, ScanError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_post(dir: &Path, file_name: &str, date: &str, body: &str) {
    let title = file_name.trim_end_matches(".mdx");
    fs::write(
        dir.join(file_name),
        format!("---\ntitle: \"{title}\"\ndate: \"{date}\"\n---\n{body}\n"),
    )
    .unwrap();
}

/// Scan `content` and save the manifest to `output`, like `postmark build`.
fn build(content: &Path, output: &Path) -> Result<Manifest, Box<dyn std::error::Error>> {
    let manifest = scan::scan(content, &BuildConfig::default())?;
    manifest.save(output)?;
    Ok(manifest)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

struct Project {
    _tmp: TempDir,
    content: PathBuf,
    output: PathBuf,
}

fn project() -> Project {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    fs::create_dir_all(&content).unwrap();
    let output = tmp.path().join("generated/content.json");
    Project {
        _tmp: tmp,
        content,
        output,
    }
}

#[test]
fn two_posts_produce_sorted_manifest() {
    let p = project();
    write_post(&p.content, "a.mdx", "2024-01-01", "hello world");
    write_post(&p.content, "b.mdx", "2024-06-15", "a b c d e");

    build(&p.content, &p.output).unwrap();
    let json = read_json(&p.output);
    let entries = json.as_array().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["slug"], "b");
    assert_eq!(entries[0]["publishedAt"], "Jun 15, 2024");
    assert_eq!(entries[0]["wordCount"], 5);
    assert_eq!(entries[1]["slug"], "a");
    assert_eq!(entries[1]["publishedAt"], "Jan 01, 2024");
    assert_eq!(entries[1]["wordCount"], 2);
}

#[test]
fn entry_has_documented_shape() {
    let p = project();
    fs::write(
        p.content.join("example-post.mdx"),
        "---\ntitle: \"Example Post\"\ndate: \"2024-01-02\"\n---\nBody content...\n",
    )
    .unwrap();

    build(&p.content, &p.output).unwrap();

    assert_eq!(
        fs::read_to_string(&p.output).unwrap(),
        concat!(
            r#"[{"title":"Example Post","date":"2024-01-02","url":"/blog/example-post","#,
            r#""slug":"example-post","publishedAt":"Jan 02, 2024","readingTime":"1 min read","#,
            r#""wordCount":2,"content":"Body content..."}]"#
        )
    );
}

#[test]
fn unclosed_front_matter_fails_without_touching_output() {
    let p = project();
    write_post(&p.content, "good.mdx", "2024-01-01", "fine");
    fs::write(p.content.join("broken.mdx"), "---\ntitle: Broken\ndate: 2024-01-02\nno end").unwrap();

    let err = scan::scan(&p.content, &BuildConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ScanError::MalformedFrontMatter {
            source: FrontMatterError::UnclosedBlock,
            ..
        }
    ));

    assert!(build(&p.content, &p.output).is_err());
    assert!(!p.output.exists(), "manifest written despite failure");

    fs::create_dir_all(p.output.parent().unwrap()).unwrap();
    fs::write(&p.output, "[\"previous\"]").unwrap();
    assert!(build(&p.content, &p.output).is_err());
    assert_eq!(fs::read_to_string(&p.output).unwrap(), "[\"previous\"]");
}

#[test]
fn empty_content_directory_writes_empty_array() {
    let p = project();
    build(&p.content, &p.output).unwrap();
    assert_eq!(fs::read_to_string(&p.output).unwrap(), "[]");
}

#[test]
fn unwritable_output_fails_and_leaves_no_temp_file() {
    let p = project();
    write_post(&p.content, "a.mdx", "2024-01-01", "x");
    fs::create_dir_all(&p.output).unwrap();

    let err = build(&p.content, &p.output).unwrap_err();
    let err = err.downcast::<ManifestError>().unwrap();
    assert!(matches!(*err, ManifestError::Write { .. }));
    assert!(err.to_string().contains("content.json"));

    let generated = p.output.parent().unwrap();
    assert_eq!(fs::read_dir(generated).unwrap().count(), 1, "temp file left behind");
    assert!(p.output.is_dir());
}

#[test]
fn missing_content_directory_fails() {
    let p = project();
    let result = build(&p.content.join("missing"), &p.output);
    assert!(result.is_err());
    assert!(!p.output.exists());
}

#[test]
fn rebuild_is_byte_identical() {
    let p = project();
    write_post(&p.content, "one.mdx", "2024-03-01", "first post");
    write_post(&p.content, "two.mdx", "2024-03-01", "same day, different post");
    write_post(&p.content, "three.mdx", "2023-12-31T23:59:59Z", "end of year");

    build(&p.content, &p.output).unwrap();
    let first = fs::read(&p.output).unwrap();
    build(&p.content, &p.output).unwrap();
    let second = fs::read(&p.output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn every_entry_newer_than_the_next() {
    let p = project();
    let dates = [
        "2022-07-04",
        "2024-02-29",
        "2023-01-15T08:00:00Z",
        "2023-01-15",
        "2024-11-30T18:45:00+01:00",
        "2021-12-25",
    ];
    for (i, date) in dates.iter().enumerate() {
        write_post(&p.content, &format!("post-{i}.mdx"), date, "words");
    }

    let manifest = build(&p.content, &p.output).unwrap();

    assert_eq!(manifest.len(), dates.len());
    for pair in manifest.entries().windows(2) {
        assert!(
            pair[0].date.instant() >= pair[1].date.instant(),
            "{} ({}) listed before {} ({})",
            pair[0].slug,
            pair[0].published_at,
            pair[1].slug,
            pair[1].published_at
        );
    }
}

#[test]
fn slugs_match_file_stems_and_are_unique() {
    let p = project();
    let names = ["hello-world", "v2.0-release", "notes_on_rust", "Capitalized"];
    for name in names {
        write_post(&p.content, &format!("{name}.mdx"), "2024-01-01", "x");
    }

    let manifest = build(&p.content, &p.output).unwrap();
    let mut slugs: Vec<&str> = manifest.iter().map(|e| e.slug.as_str()).collect();
    slugs.sort_unstable();
    slugs.dedup();

    let mut expected = names.to_vec();
    expected.sort_unstable();
    assert_eq!(slugs, expected);
    for entry in &manifest {
        assert_eq!(entry.url, format!("/blog/{}", entry.slug));
    }
}

#[test]
fn longer_posts_never_read_faster() {
    let p = project();
    let short = "word ".repeat(150);
    let long = "word ".repeat(1_150);
    write_post(&p.content, "short.mdx", "2024-01-01", &short);
    write_post(&p.content, "long.mdx", "2024-01-02", &long);

    let manifest = build(&p.content, &p.output).unwrap();
    let short = manifest.find_by_slug("short").unwrap();
    let long = manifest.find_by_slug("long").unwrap();

    assert!(short.word_count < long.word_count);
    assert!(short.reading_time <= long.reading_time);
    assert_eq!(short.reading_time.to_string(), "1 min read");
    assert_eq!(long.reading_time.to_string(), "6 min read");
}

#[test]
fn saved_manifest_loads_back_for_lookup() {
    let p = project();
    fs::write(
        p.content.join("with-thumb.mdx"),
        "---\ntitle: Thumb\ndate: 2024-05-05\nthumbnail: /images/t.png\n---\nbody\n",
    )
    .unwrap();
    let built = build(&p.content, &p.output).unwrap();

    let loaded = Manifest::load(&p.output).unwrap();
    assert_eq!(loaded, built);

    let entry = loaded.find_by_slug("with-thumb").unwrap();
    assert_eq!(entry.front_matter.get("thumbnail"), Some("/images/t.png"));
    assert_eq!(entry.published_at, "May 05, 2024");
}

#[test]
fn config_file_sets_paths_and_prefix() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::write(
        root.join(CONFIG_FILENAME),
        "content_dir = \"posts\"\noutput = \"public/posts.json\"\n\n[urls]\nprefix = \"/writing\"\n",
    )
    .unwrap();
    let posts = root.join("posts");
    fs::create_dir_all(&posts).unwrap();
    write_post(&posts, "first.mdx", "2024-01-01", "x");

    let config = config::load_config(root).unwrap();
    let manifest = scan::scan(&config.content_path(root), &config).unwrap();
    manifest.save(&config.output_path(root)).unwrap();

    let json = read_json(&root.join("public/posts.json"));
    assert_eq!(json[0]["url"], "/writing/first");
}
