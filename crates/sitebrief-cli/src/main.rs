use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sitebrief_client::{ConfiguredBackend, HtmlParser, ReqwestFetcher};
use sitebrief_core::config::{BackendConfig, BackendKind};
use sitebrief_core::output::drain_to;
use sitebrief_core::{BrochurePipeline, PageExtractor, SummaryPipeline, is_valid_url, normalize_url};

#[derive(Parser)]
#[command(
    name = "sitebrief",
    version,
    about = "Summarize web pages and write company brochures with an LLM"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a single web page
    Summarize {
        /// Page to summarize (prompted for if omitted)
        #[arg(short, long)]
        url: Option<String>,

        /// Print the summary as it is generated
        #[arg(long, default_value_t = false)]
        stream: bool,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Write a company brochure from a landing page and its relevant links
    Brochure {
        /// Company landing page (prompted for if omitted)
        #[arg(short, long)]
        url: Option<String>,

        /// Print the brochure as it is generated
        #[arg(long, default_value_t = false)]
        stream: bool,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Show which links of a page the model considers brochure-relevant
    Links {
        /// Company landing page (prompted for if omitted)
        #[arg(short, long)]
        url: Option<String>,

        #[command(flatten)]
        backend: BackendArgs,
    },
}

#[derive(Args)]
struct BackendArgs {
    /// Model backend to use
    #[arg(long, value_enum, env = "SITEBRIEF_BACKEND", default_value_t = BackendArg::Openai)]
    backend: BackendArg,

    /// Model name (defaults: "gpt-4o-mini" for openai, "llama3.2" for local backends)
    #[arg(short, long, env = "SITEBRIEF_MODEL")]
    model: Option<String>,

    /// Backend base URL (defaults to the backend's standard endpoint)
    #[arg(short, long, env = "SITEBRIEF_BASE_URL")]
    base_url: Option<String>,

    /// API key for the hosted backend
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    /// Hosted OpenAI API
    Openai,
    /// Local Ollama daemon, native API
    Ollama,
    /// Local Ollama daemon, OpenAI-compatible API
    OllamaOpenai,
}

impl BackendArgs {
    fn into_config(self) -> BackendConfig {
        let kind = match self.backend {
            BackendArg::Openai => BackendKind::OpenAi,
            BackendArg::Ollama => BackendKind::Ollama,
            BackendArg::OllamaOpenai => BackendKind::OllamaOpenAi,
        };

        let mut config = BackendConfig::new(kind);
        if let Some(model) = self.model {
            config = config.with_model(model);
        }
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        // OPENAI_API_KEY is only meant for the hosted backend
        if let Some(api_key) = self.api_key.filter(|_| kind.requires_api_key()) {
            config = config.with_api_key(api_key);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sitebrief=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            url,
            stream,
            backend,
        } => {
            let backend = connect_backend(backend)?;
            let url = resolve_url(url, "summarize")?;
            cmd_summarize(&url, stream, backend).await?;
        }
        Commands::Brochure {
            url,
            stream,
            backend,
        } => {
            let backend = connect_backend(backend)?;
            let url = resolve_url(url, "make a brochure for")?;
            cmd_brochure(&url, stream, backend).await?;
        }
        Commands::Links { url, backend } => {
            let backend = connect_backend(backend)?;
            let url = resolve_url(url, "analyze")?;
            cmd_links(&url, backend).await?;
        }
    }

    Ok(())
}

/// Build the backend from CLI/env settings. Runs before any network call.
fn connect_backend(args: BackendArgs) -> Result<ConfiguredBackend> {
    let config = args.into_config();
    ConfiguredBackend::from_config(&config)
        .with_context(|| format!("Invalid {} backend configuration", config.kind))
}

fn extractor() -> Result<PageExtractor<ReqwestFetcher, HtmlParser>> {
    let fetcher = ReqwestFetcher::new().context("Failed to create HTTP client")?;
    Ok(PageExtractor::new(fetcher, HtmlParser::new()))
}

/// Use the URL given on the command line, or ask for one on stdin.
fn resolve_url(url: Option<String>, action: &str) -> Result<String> {
    match url {
        Some(url) => {
            let url = url.trim();
            if !is_valid_url(url) {
                anyhow::bail!(
                    "Invalid URL format: {url}. Please include a valid domain (e.g., example.com or www.example.com)"
                );
            }
            Ok(normalize_url(url))
        }
        None => prompt_for_url(std::io::stdin().lock(), &mut std::io::stderr(), action),
    }
}

/// Ask on `out` until `input` yields a valid URL; returns it normalized.
fn prompt_for_url<R: BufRead, W: Write>(input: R, out: &mut W, action: &str) -> Result<String> {
    let mut lines = input.lines();

    loop {
        write!(out, "Enter the URL to {action} (e.g., www.example.com): ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            anyhow::bail!("No URL provided");
        };
        let input = line.context("Failed to read URL from stdin")?;
        let input = input.trim();

        if input.is_empty() {
            writeln!(out, "Error: URL cannot be empty. Please try again.\n")?;
            continue;
        }
        if !is_valid_url(input) {
            writeln!(
                out,
                "Error: Invalid URL format. Please include a valid domain (e.g., example.com or www.example.com)\n"
            )?;
            continue;
        }

        return Ok(normalize_url(input));
    }
}

async fn cmd_summarize(url: &str, stream: bool, backend: ConfiguredBackend) -> Result<()> {
    let pipeline = SummaryPipeline::new(extractor()?, backend);

    if stream {
        let chunks = pipeline
            .summarize_url_stream(url)
            .await
            .with_context(|| format!("Failed to summarize {url}"))?;
        print_stream(chunks).await?;
    } else {
        let summary = pipeline
            .summarize_url(url)
            .await
            .with_context(|| format!("Failed to summarize {url}"))?;
        println!("{summary}");
    }

    Ok(())
}

async fn cmd_brochure(url: &str, stream: bool, backend: ConfiguredBackend) -> Result<()> {
    let pipeline = BrochurePipeline::new(extractor()?, backend);

    if stream {
        let chunks = pipeline
            .create_brochure_stream(url)
            .await
            .with_context(|| format!("Failed to make a brochure for {url}"))?;
        print_stream(chunks).await?;
    } else {
        let brochure = pipeline
            .create_brochure(url)
            .await
            .with_context(|| format!("Failed to make a brochure for {url}"))?;
        println!("{brochure}");
    }

    Ok(())
}

async fn cmd_links(url: &str, backend: ConfiguredBackend) -> Result<()> {
    let extractor = extractor()?;
    let page = extractor
        .extract(url)
        .await
        .with_context(|| format!("Failed to fetch {url}"))?;

    let pipeline = BrochurePipeline::new(extractor, backend);
    let links = pipeline
        .classify_links(&page)
        .await
        .context("Failed to classify links")?;

    println!("{}", serde_json::to_string_pretty(&links)?);
    Ok(())
}

async fn print_stream(chunks: sitebrief_core::ChatStream) -> Result<()> {
    let mut stdout = std::io::stdout();
    let text = drain_to(chunks, &mut stdout)
        .await
        .context("Stream interrupted")?;
    if !text.ends_with('\n') {
        writeln!(stdout)?;
    }
    tracing::info!("Streamed {} bytes", text.len());
    Ok(())
}
