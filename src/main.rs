// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Registry Submit
//!
//! Submits a goods introduction document to the registry from the command
//! line, under the same rate budget a long-running caller would use.
//!
//! ## Configuration
//!
//! Defaults are loaded from environment variables (see `Config::from_env`)
//! and can be overridden with flags:
//!
//! - `REGISTRY_BASE_URL`: API base URL
//! - `RATE_LIMIT_CAPACITY`: max requests per window
//! - `RATE_LIMIT_PER`: window unit
//! - `RATE_LIMIT_UNITS`: window length in `RATE_LIMIT_PER` units
//! - `RATE_LIMIT_MODE`: fail_fast or blocking
//! - `LOG_FORMAT`: `json` for JSON log lines

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use registry_client::{AcquireMode, ApiClient, Config, Document, TimeUnit};

#[derive(Parser)]
#[command(name = "registry-submit", about = "Submit a document to the product registry")]
struct Args {
    /// Path to the document JSON
    document: PathBuf,

    /// Detached document signature
    #[arg(long, conflicts_with = "signature_file")]
    signature: Option<String>,

    /// Path to a file containing the signature
    #[arg(long, conflicts_with = "signature")]
    signature_file: Option<PathBuf>,

    /// Registry base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Max requests per window
    #[arg(long)]
    capacity: Option<u32>,

    /// Window unit (second, minute, hour, day)
    #[arg(long)]
    per: Option<TimeUnit>,

    /// Number of units per window
    #[arg(long)]
    units: Option<u32>,

    /// Wait for capacity instead of failing fast
    #[arg(long)]
    blocking: bool,

    /// Print the request body instead of sending it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = load_config(&args)?;

    let raw = tokio::fs::read(&args.document)
        .await
        .with_context(|| format!("reading {}", args.document.display()))?;
    let document: Document = serde_json::from_slice(&raw)
        .with_context(|| format!("parsing {}", args.document.display()))?;
    let signature = load_signature(&args).await?;

    let client = ApiClient::new(config)?;

    if args.dry_run {
        let request = client.build_request(&document, &signature)?;
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    info!(doc_id = %document.doc_id, endpoint = %client.endpoint(), "Submitting document");
    let body = client.create_document(&document, &signature).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&body)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;

    if let Some(url) = &args.base_url {
        config.registry.base_url = url.clone();
    }
    if let Some(capacity) = args.capacity {
        config.rate_limit.capacity = capacity;
    }
    if let Some(per) = args.per {
        config.rate_limit.per = per;
    }
    if let Some(units) = args.units {
        config.rate_limit.units = units;
    }
    if args.blocking {
        config.rate_limit.mode = AcquireMode::Blocking;
    }

    config.rate_limit.validate()?;
    Ok(config)
}

async fn load_signature(args: &Args) -> anyhow::Result<String> {
    match (&args.signature, &args.signature_file) {
        (Some(signature), _) => Ok(signature.clone()),
        (None, Some(path)) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(raw.trim().to_string())
        }
        (None, None) => anyhow::bail!("either --signature or --signature-file is required"),
    }
}
