//! persnamer - Main entry point
//!
//! Resolves one VIAF identifier per invocation and prints a TEI
//! authority-file entry plus the matching annotation tag, ready for
//! copy-paste into edition sources.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use persnamer::services::{resolve_record, ViafClient};
use persnamer::tei;

/// Command-line arguments for persnamer
#[derive(Parser, Debug)]
#[command(name = "persnamer")]
#[command(about = "Resolve a VIAF identifier to a TEI authority entry and annotation tag")]
#[command(version)]
struct Args {
    /// VIAF identifier of the person record to resolve
    viaf_id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "persnamer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Usage errors exit with status 1, not clap's default 2
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    };

    info!("Processing VIAF identifier {}", args.viaf_id);

    let client = ViafClient::new().context("Failed to construct VIAF client")?;
    let raw = client
        .fetch_record(&args.viaf_id)
        .await
        .context("Failed to fetch VIAF record")?;

    let record =
        resolve_record(&raw, &args.viaf_id).context("Failed to resolve VIAF record")?;

    info!("Name found: {}", record.name.as_deref().unwrap_or("(none)"));
    info!(
        "Birth date found: {}",
        record.birth.as_deref().unwrap_or("(none)")
    );
    info!(
        "Death date found: {}",
        record.death.as_deref().unwrap_or("(none)")
    );
    if let Some(warning) = &record.warning {
        warn!("{warning}");
    }

    let entry = tei::person_entry(&args.viaf_id, &record);
    let xml_id = entry.attribute("xml:id").unwrap_or_default().to_string();
    let annotation = tei::annotation_tag(&xml_id, record.name.as_deref());

    println!("\nAuthority file entry:\n{}", entry.to_pretty_xml());
    println!("Annotation tag for the TEI text:\n{}", annotation.to_pretty_xml());

    Ok(())
}
