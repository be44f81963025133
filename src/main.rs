use clap::{Parser, Subcommand};
use diagram_docs::check::{self, HttpFetcher};
use diagram_docs::config::{self, SiteConfig};
use diagram_docs::convert::{self, ConvertError};
use diagram_docs::{index, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// Shared flags for commands that render diagrams.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the render cache and re-render every diagram
    #[arg(long)]
    no_cache: bool,
}

/// Overrides for the `[site_check]` config section.
#[derive(clap::Args, Clone)]
struct CheckArgs {
    /// Site root to check (trailing slash added if missing)
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "TIMEOUT")]
    timeout: Option<u64>,

    /// Liveness attempts before giving up
    #[arg(long, env = "RETRIES")]
    retries: Option<u32>,

    /// Seconds between liveness attempts
    #[arg(long, env = "RETRY_DELAY")]
    retry_delay: Option<u64>,
}

impl CheckArgs {
    fn apply(self, site_check: &mut config::SiteCheckConfig) {
        if let Some(base_url) = self.base_url {
            site_check.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            site_check.timeout_secs = timeout;
        }
        if let Some(retries) = self.retries {
            site_check.retries = retries;
        }
        if let Some(delay) = self.retry_delay {
            site_check.retry_delay_secs = delay;
        }
    }
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "diagram-docs")]
#[command(about = "Diagram pages, assets and site checks for a documentation site")]
#[command(long_about = "\
Diagram pages, assets and site checks for a documentation site

Diagram sources are the data source. Every file in the source directory
becomes a catalog entry, a page and (after conversion) a set of images.

Project structure:

  ./
  ├── diagram-docs.toml                    # Optional config overrides
  ├── 40-resources/diagrams/               # Sources (one level, not recursive)
  │   ├── 01-complete-system-architecture.drawio
  │   └── 07-network-topology.drawio
  ├── diagrams/assets/                     # Written by `convert`
  │   ├── png/{id}.png, png/{id}_thumb.png
  │   └── svg/{id}.svg
  ├── diagrams/pages/{id}.md               # Written by `index`
  └── _data/
      ├── diagrams.yml                     # Written by `index`
      └── diagram_categories.yml

Metadata resolution (first available wins):
  Catalog entry for the filename → title from id
  (07-network-topology → \"07 Network Topology\", category General)

Run 'diagram-docs gen-config' to generate a documented diagram-docs.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root containing the sources and the site
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/diagram-docs.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate diagram pages and data files from the sources
    Index,
    /// Render PNG, SVG and thumbnail assets for every diagram
    Convert(CacheArgs),
    /// Run the full pipeline: convert → index
    Build(CacheArgs),
    /// Smoke-check the deployed site and print a JSON report
    CheckSite(CheckArgs),
    /// Print a stock diagram-docs.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(ExitCode::SUCCESS);
    }

    let mut site_config = config::load_config(&cli.root, cli.config.as_deref())?;

    match cli.command {
        Command::Index => {
            let summary = index::build_index(&cli.root, &site_config)?;
            output::print_index_summary(&summary, &cli.root);
            Ok(ExitCode::SUCCESS)
        }
        Command::Convert(cache_args) => run_convert(&cli.root, &site_config, &cache_args),
        Command::Build(cache_args) => {
            println!("==> Stage 1: Converting diagrams");
            let converted = run_convert(&cli.root, &site_config, &cache_args)?;

            println!("==> Stage 2: Indexing diagrams");
            let summary = index::build_index(&cli.root, &site_config)?;
            output::print_index_summary(&summary, &cli.root);

            println!("==> Build complete: {}", cli.root.display());
            Ok(converted)
        }
        Command::CheckSite(check_args) => {
            check_args.apply(&mut site_config.site_check);
            let settings = &site_config.site_check;
            let fetcher = HttpFetcher::new(Duration::from_secs(settings.timeout_secs))?;
            let report = check::run_check(&fetcher, settings);
            println!("{}", report.to_json()?);
            output::print_check_summary(&report);
            Ok(ExitCode::from(report.exit_code()))
        }
        Command::GenConfig => Ok(ExitCode::SUCCESS),
    }
}

/// Convert all diagrams, streaming progress from the rayon workers.
///
/// A missing source directory or a run where nothing succeeded is exit 1.
fn run_convert(
    root: &Path,
    site_config: &SiteConfig,
    cache_args: &CacheArgs,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_thread_pool(&site_config.processing);
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_convert_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = convert::convert(root, site_config, !cache_args.no_cache, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    match result {
        Ok(result) => {
            output::print_convert_summary(&result);
            Ok(if result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(ConvertError::SourceNotFound(dir)) => {
            eprintln!("Error: Source directory {} not found", dir.display());
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can constrain
/// down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
