mod catalog;
mod error;
mod fetch;
mod model;
mod normalize;
mod parser;
mod writer;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

use model::PricingDocument;

const SOURCE_URL: &str = "https://aws.amazon.com/ec2/capacityblocks/pricing/";
const DEFAULT_OUTPUT: &str = "data/pricing.json";

#[derive(Parser)]
#[command(name = "cb_pricing", about = "EC2 Capacity Blocks pricing scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the pricing page and rewrite the JSON artifact
    Run {
        /// Source page URL
        #[arg(long, default_value = SOURCE_URL)]
        url: String,
        /// Artifact path
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Run the pipeline against a saved HTML file (no network)
    Parse {
        /// Saved page HTML
        file: PathBuf,
        /// Artifact path
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Summarize an existing pricing artifact
    Show {
        /// Artifact path
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { url, output } => {
            let html = fetch::fetch_page(&url).await?;
            let doc = run_pipeline(&html, &url)?;
            let path = writer::write_document(&doc, &output)?;
            print_summary(&doc, Some(&path));
            Ok(())
        }
        Commands::Parse { file, output } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let doc = run_pipeline(&html, SOURCE_URL)?;
            let path = writer::write_document(&doc, &output)?;
            print_summary(&doc, Some(&path));
            Ok(())
        }
        Commands::Show { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let doc: PricingDocument = serde_json::from_str(&json)
                .with_context(|| format!("Malformed artifact at {}", file.display()))?;
            println!("Last updated: {}", doc.metadata.last_updated);
            println!("Source:       {}", doc.metadata.source_url);
            println!("Schema:       v{}\n", doc.metadata.version);
            print_summary(&doc, None);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

/// HTML in, validated document out. The timestamp is taken once, at run
/// start; no I/O happens here.
fn run_pipeline(html: &str, source_url: &str) -> Result<PricingDocument, error::PricingError> {
    let rows = parser::parse_page(html)?;
    normalize::build_document(rows, source_url, Utc::now())
}

fn print_summary(doc: &PricingDocument, path: Option<&Path>) {
    println!(
        "Scraped {} instance types, {} pricing entries.",
        doc.instance_types.len(),
        doc.entry_count()
    );
    if let Some(path) = path {
        println!("Artifact: {}", path.display());
    }

    println!(
        "\n{:<18} | {:<8} | {:<10} | {:>5} | {:>7}",
        "Instance type", "Family", "Accel", "Count", "Regions"
    );
    println!("{}", "-".repeat(60));
    for (instance_type, record) in &doc.instance_types {
        println!(
            "{:<18} | {:<8} | {:<10} | {:>5} | {:>7}",
            instance_type,
            record.instance_family,
            record.accelerator_type,
            record.accelerator_count,
            record.pricing.len()
        );
    }
}
