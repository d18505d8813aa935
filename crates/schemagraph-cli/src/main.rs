//! Schemagraph CLI
//!
//! Command-line driver for:
//! - Generating one JSON-LD document per page from a request file
//! - Validating the generated documents against the field tables
//! - Enriching a request with AI suggestions
//! - Pre-filling a request from a fact sheet or the business's website

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use schemagraph_core::output::{script_tag, write_archive};
use schemagraph_core::fields::BusinessFields;
use schemagraph_core::{generate, Generation, GenerationRequest};
use schemagraph_enrich::scrape::DEFAULT_SCRAPE_TIMEOUT_SECS;
use schemagraph_enrich::{prefill_from_website, ConfigError, Enricher, LlmConfig};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod report;

#[derive(Parser)]
#[command(name = "schemagraph")]
#[command(author, version, about = "Schemagraph: linked schema.org JSON-LD for whole sites")]
struct Cli {
    /// Log progress to stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one JSON-LD file per requested page.
    Generate {
        #[command(flatten)]
        input: RequestInput,
        /// Directory for the generated files
        #[arg(short, long, default_value = "schema-output")]
        out: PathBuf,
        /// Also write every file into this ZIP archive
        #[arg(long)]
        zip: Option<PathBuf>,
        /// Also write `<script type="application/ld+json">` snippets as `.html`
        #[arg(long)]
        html: bool,
    },

    /// Report missing required and recommended fields per document.
    ///
    /// Findings are printed, never fatal.
    Validate {
        #[command(flatten)]
        input: RequestInput,
        /// Also list cross-document link problems
        #[arg(long)]
        links: bool,
    },

    /// Fill empty business fields from AI suggestions.
    ///
    /// Reads SCHEMAGRAPH_API_KEY (or OPENROUTER_API_KEY / OPENAI_API_KEY),
    /// SCHEMAGRAPH_MODEL, SCHEMAGRAPH_BASE_URL and SCHEMAGRAPH_TIMEOUT_SECS.
    Enrich {
        #[command(flatten)]
        input: RequestInput,
        #[command(flatten)]
        llm: LlmArgs,
        /// Where to write the enriched request (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Pre-fill a request from a fact-sheet text file.
    Extract {
        /// Fact sheet (plain text or markdown); `-` reads stdin
        fact_sheet: PathBuf,
        /// Request to fill in; starts empty when omitted
        #[arg(long)]
        request: Option<PathBuf>,
        #[command(flatten)]
        llm: LlmArgs,
        /// Where to write the filled request (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Pre-fill a request from what the business's website already publishes.
    ///
    /// Reads JSON-LD, Open Graph tags, the logo, tel:/mailto: links and a
    /// Google Maps link. Fields already in the request are kept.
    Scrape {
        /// Page to read, usually the homepage
        url: String,
        /// Request to fill in; starts from the URL alone when omitted
        #[arg(long)]
        request: Option<PathBuf>,
        /// Fetch timeout
        #[arg(long, default_value_t = DEFAULT_SCRAPE_TIMEOUT_SECS)]
        timeout_secs: u64,
        /// Where to write the filled request (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RequestInput {
    /// Generation request JSON; `-` reads stdin
    request: PathBuf,
}

#[derive(Args)]
struct LlmArgs {
    /// Override SCHEMAGRAPH_MODEL
    #[arg(long)]
    model: Option<String>,
    /// Override SCHEMAGRAPH_TIMEOUT_SECS
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl LlmArgs {
    /// `None` when no provider is configured; the request then passes through unchanged.
    fn enricher(&self) -> Result<Option<Enricher>> {
        self.enricher_from(LlmConfig::from_env())
    }

    fn enricher_from(&self, config: Result<LlmConfig, ConfigError>) -> Result<Option<Enricher>> {
        let mut config = match config {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "AI enrichment is not configured; request left unchanged");
                return Ok(None);
            }
        };
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout_secs(secs);
        }
        Enricher::from_config(config)
            .map(Some)
            .context("failed to build the AI client")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate { input, out, zip, html } => {
            cmd_generate(&read_request(&input.request)?, &out, zip.as_deref(), html)
        }
        Commands::Validate { input, links } => cmd_validate(&read_request(&input.request)?, links),
        Commands::Enrich { input, llm, out } => {
            let request = read_request(&input.request)?;
            let enriched = match llm.enricher()? {
                Some(enricher) => runtime()?.block_on(enricher.enrich_request(request)),
                None => request,
            };
            write_request(&enriched, out.as_deref())
        }
        Commands::Extract {
            fact_sheet,
            request,
            llm,
            out,
        } => {
            let text = read_input(&fact_sheet)?;
            let base = match request {
                Some(path) => read_request(&path)?,
                None => GenerationRequest::default(),
            };
            let filled = match llm.enricher()? {
                Some(enricher) => runtime()?.block_on(enricher.prefill_from_fact_sheet(base, &text)),
                None => base,
            };
            write_request(&filled, out.as_deref())
        }
        Commands::Scrape {
            url,
            request,
            timeout_secs,
            out,
        } => {
            let base = match request {
                Some(path) => read_request(&path)?,
                None => GenerationRequest::new(BusinessFields::new("", url.as_str())),
            };
            let timeout = Duration::from_secs(timeout_secs);
            let filled = runtime()?.block_on(prefill_from_website(base, &url, timeout));
            write_request(&filled, out.as_deref())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize tokio runtime")
}

// ============================================================================
// Input / output
// ============================================================================

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_request(path: &Path) -> Result<GenerationRequest> {
    let text = read_input(path)?;
    serde_json::from_str(&text).with_context(|| format!("{} is not a valid generation request", path.display()))
}

fn write_request(request: &GenerationRequest, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(request).context("failed to serialize request")?;
    match out {
        Some(path) => {
            fs::write(path, json + "\n").with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_generate(request: &GenerationRequest, out: &Path, zip: Option<&Path>, html: bool) -> Result<()> {
    let run = generate(request);
    let files = run.files().context("failed to render documents")?;

    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    for (name, json) in &files {
        let path = out.join(name);
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }
    if html {
        write_snippets(&run, &files, out)?;
    }
    println!(
        "{} {} document(s) into {}",
        "Generated".green().bold(),
        files.len(),
        out.display()
    );

    if let Some(zip_path) = zip {
        let file = fs::File::create(zip_path).with_context(|| format!("failed to create {}", zip_path.display()))?;
        write_archive(&files, file).with_context(|| format!("failed to write {}", zip_path.display()))?;
        println!("  {} {}", "→".yellow(), zip_path.display());
    }

    report::print_summary(&run.validate());
    report::print_links(&run.audit());
    Ok(())
}

fn write_snippets(run: &Generation, files: &[(String, String)], out: &Path) -> Result<()> {
    for (doc, (name, _)) in run.documents.iter().zip(files) {
        let snippet = script_tag(doc).context("failed to render script tag")?;
        let path = out.join(Path::new(name).with_extension("html"));
        fs::write(&path, snippet).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn cmd_validate(request: &GenerationRequest, links: bool) -> Result<()> {
    let run = generate(request);
    report::print_reports(&run.validate());
    if links {
        report::print_links(&run.audit());
    }
    Ok(())
}
