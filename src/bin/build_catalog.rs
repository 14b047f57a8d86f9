//! Catalog artifact builder for Asana Recommender
//!
//! Reads a JSON array of posture texts, embeds the four text fields with the
//! configured embedding provider and writes the catalog artifact the service
//! loads at startup.
//!
//! Run: cargo run --bin build-catalog -- data/asanas_text.json [output.json]
//! The output defaults to `catalog.path` from the configuration.

use asana_recommender::config::Settings;
use asana_recommender::services::{build_embedder, Catalog};
use asana_recommender::PostureText;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .ok_or("usage: build-catalog <postures.json> [output.json]")?;

    let settings = Settings::load()?;
    let output = args.next().unwrap_or_else(|| settings.catalog.path.clone());

    let texts: Vec<PostureText> = serde_json::from_str(&std::fs::read_to_string(&input)?)?;
    println!("Embedding {} postures from {}...", texts.len(), input);

    let embedder = build_embedder(&settings.embedding)?;
    let catalog = Catalog::embed(texts, embedder.as_ref())?;

    if let Some(parent) = std::path::Path::new(&output).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&output, catalog.to_artifact_json(embedder.name())?)?;

    println!(
        "Wrote {} postures ({} provider, {} dimensions) to {}",
        catalog.len(),
        embedder.name(),
        catalog.dimensions(),
        output
    );

    Ok(())
}
