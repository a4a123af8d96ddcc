use clap::{Parser, Subcommand};
use postmark_manifest::config::{self, BuildConfig};
use postmark_manifest::manifest::Manifest;
use postmark_manifest::{output, scan};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "postmark")]
#[command(about = "Build the JSON post manifest for an MDX blog")]
#[command(long_about = "\
Build the JSON post manifest for an MDX blog

Every .mdx file directly inside the content directory becomes one manifest
entry. Posts start with a front-matter block:

  ---
  title: \"Example Post\"
  date: \"2024-01-02\"
  thumbnail: /images/example.png
  ---
  Body content...

The manifest is a JSON array sorted newest first. Each entry holds the
front-matter keys plus url, slug, publishedAt, readingTime, wordCount and
content.

Settings are read from postmark.toml in the project root. Run
'postmark gen-config' to print a documented one.")]
#[command(version)]
struct Cli {
    /// Project root; postmark.toml and relative paths are resolved here
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Content directory (overrides `content_dir` in postmark.toml)
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Manifest path (overrides `output` in postmark.toml)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory and write the manifest
    Build,
    /// Validate every post without writing anything
    Check,
    /// List the posts in an existing manifest
    List,
    /// Print one manifest entry as JSON
    Show {
        /// Post slug (file name without extension)
        slug: String,
    },
    /// Print a stock postmark.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Build => {
            let config = resolve_config(&cli)?;
            let content_dir = config.content_path(&cli.root);
            let manifest_path = config.output_path(&cli.root);

            println!("==> Scanning {}", content_dir.display());
            let manifest = scan::scan(&content_dir, &config)?;
            output::print_scan_output(&manifest, &config.extension);

            manifest.save(&manifest_path)?;
            log::info!("manifest written to {}", manifest_path.display());
            println!();
            println!("{}", output::format_build_summary(&manifest, &manifest_path));
        }
        Command::Check => {
            let config = resolve_config(&cli)?;
            let content_dir = config.content_path(&cli.root);

            println!("==> Checking {}", content_dir.display());
            let manifest = scan::scan(&content_dir, &config)?;
            output::print_scan_output(&manifest, &config.extension);
            println!("==> Content is valid");
        }
        Command::List => {
            let manifest_path = resolve_config(&cli)?.output_path(&cli.root);
            let manifest = Manifest::load(&manifest_path)?;
            output::print_list_output(&manifest);
        }
        Command::Show { slug } => {
            let manifest_path = resolve_config(&cli)?.output_path(&cli.root);
            let manifest = Manifest::load(&manifest_path)?;
            let entry = manifest
                .find_by_slug(slug)
                .ok_or_else(|| not_found(slug, &manifest_path))?;
            println!("{}", serde_json::to_string_pretty(entry)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `postmark.toml` and apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<BuildConfig, Box<dyn std::error::Error>> {
    let mut config = config::load_config(&cli.root)?;
    if let Some(content) = &cli.content {
        config.content_dir = content.clone();
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    Ok(config)
}

fn not_found(slug: &str, manifest_path: &Path) -> String {
    format!(
        "no post with slug '{slug}' in {}",
        manifest_path.display()
    )
}
