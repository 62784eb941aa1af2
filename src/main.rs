use chapter_frontmatter::config::{self, Config};
use chapter_frontmatter::frontmatter::Collection;
use chapter_frontmatter::{inject, output};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chapter-frontmatter")]
#[command(about = "Prepend navigation frontmatter to markdown book chapters")]
#[command(long_about = "\
Prepend navigation frontmatter to markdown book chapters

Every markdown file under --doc-path gets a header block for the static site
generator. Files that already start with `---` are left alone, so the tool is
safe to re-run.

Document structure:

  docs/
  ├── frontmatter.toml     # Optional config (layout, index file, marker prefix)
  ├── index.md             # Index: title = --doc-name, nav_order = --nav-order
  ├── ch1.md               # Chapter: contains `# Chapter 1: Intro`
  └── part-two/
      └── ch2.md           # Chapter: contains `# Chapter 2: Setup`

Metadata resolution:
  Index:    title and nav_order from the command line, has_children: true
  Chapter:  first `# Chapter N: Title` line → nav_order N, title, parent = --doc-name

Set RUST_LOG (e.g. RUST_LOG=chapter_frontmatter=debug) for diagnostics.")]
#[command(version)]
struct Cli {
    /// Collection display name: index title and chapter parent
    #[arg(long)]
    doc_name: String,

    /// Documents directory to scan recursively
    #[arg(long)]
    doc_path: PathBuf,

    /// Navigation order of the index document
    #[arg(long, allow_negative_numbers = true)]
    nav_order: i64,

    /// Config file (defaults to <doc-path>/frontmatter.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report what would be written without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Show derived metadata and enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Per-document failures still yield `Ok`, with a failing exit code.
fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config(&cli.doc_path, cli.config.as_deref())?;
    init_thread_pool(&config.processing);

    let collection = Collection {
        doc_name: cli.doc_name,
        nav_order: cli.nav_order,
    };
    let report = inject::run(&cli.doc_path, &collection, &config, cli.dry_run)?;
    output::print_report(&report, cli.dry_run, cli.verbose);

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "chapter_frontmatter=debug"
        } else {
            "chapter_frontmatter=warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Explicit `--config` must exist; the implicit root config is optional.
fn load_config(doc_path: &Path, explicit: Option<&Path>) -> Result<Config, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(doc_path),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
