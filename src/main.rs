use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use gomi_admin::config::Config;
use gomi_admin::domain::{Area, Municipality};
use gomi_admin::error::AdminError;
use gomi_admin::extraction::gemini::GeminiExtractor;
use gomi_admin::extraction::FixedDelay;
use gomi_admin::formats::records::{build_items, build_schedule_areas};
use gomi_admin::formats::{DetectedPayload, JsonPayload, OldFormatPayload, TableKind};
use gomi_admin::logging;
use gomi_admin::store::{AreaParent, DocumentStore, InMemoryStore};
use gomi_admin::{extraction, formats, importer, normalize};

#[derive(Parser)]
#[command(name = "gomi_admin")]
#[command(about = "Municipal waste-collection schedule data administration")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON or CSV/TSV data file into a municipality
    Import {
        /// Path to the input file
        #[arg(long)]
        file: PathBuf,
        /// Prefecture name for the target municipality
        #[arg(long)]
        prefecture: String,
    },
    /// Rewrite legacy date-keyed schedules ("2025-04" → "4") in place
    Normalize {
        /// Path to an exported JSON array of area records
        #[arg(long)]
        file: PathBuf,
        /// Prefecture name for the target municipality
        #[arg(long)]
        prefecture: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Extract schedule/category data from PDF text via the generative API
    Extract {
        /// Path to a text file holding the PDF's extracted text
        #[arg(long)]
        file: PathBuf,
        /// Municipality name passed to the extraction prompt
        #[arg(long)]
        municipality: String,
        /// Write the merged draft JSON to this path for review
        #[arg(long)]
        out: Option<PathBuf>,
        /// Persist the draft into the store after extraction
        #[arg(long)]
        save: bool,
    },
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

async fn seed_municipality(
    store: &dyn DocumentStore,
    prefecture: &str,
) -> Result<uuid::Uuid, Box<dyn std::error::Error>> {
    let mut municipality = Municipality::new(prefecture, None);
    store.create_municipality(&mut municipality).await?;
    Ok(municipality
        .id
        .ok_or("store did not assign a municipality id")?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import { file, prefecture } => {
            println!("🔄 Importing {}...", file.display());

            let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
            let municipality_id = seed_municipality(store.as_ref(), &prefecture).await?;

            let text = std::fs::read_to_string(&file)?;
            let summary = match formats::detect(&text)? {
                DetectedPayload::Json(payload) => {
                    importer::import_payload(store.as_ref(), municipality_id, payload).await?
                }
                DetectedPayload::Table {
                    kind: TableKind::Schedule,
                    table,
                } => {
                    let payload = JsonPayload::Old(OldFormatPayload {
                        areas: build_schedule_areas(&table),
                        garbage_items: Vec::new(),
                    });
                    importer::import_payload(store.as_ref(), municipality_id, payload).await?
                }
                DetectedPayload::Table {
                    kind: TableKind::Item,
                    table,
                } => importer::import_items(store.as_ref(), municipality_id, build_items(&table)).await?,
            };

            println!("\n📊 Import results for {prefecture}:");
            println!("   Cities: {}", summary.cities);
            println!("   Areas: {}", summary.areas);
            println!("   Items: {}", summary.items);
        }
        Commands::Normalize {
            file,
            prefecture,
            yes,
        } => {
            if !yes
                && !confirm(
                    "This rewrites every legacy-keyed schedule in place. Continue?",
                )?
            {
                println!("Aborted.");
                return Ok(());
            }

            let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
            let municipality_id = seed_municipality(store.as_ref(), &prefecture).await?;

            let text = std::fs::read_to_string(&file)?;
            let areas: Vec<Area> = serde_json::from_str(&text).map_err(AdminError::Json)?;
            let parent = AreaParent::Municipality(municipality_id);
            for mut area in areas {
                area.id = None;
                store.create_area(parent, &mut area).await?;
            }

            println!("🔧 Normalizing schedules for {prefecture}...");
            let summary = normalize::normalize_municipality(store.as_ref(), municipality_id).await?;
            println!(
                "✅ Normalization complete: {} normalized, {} skipped",
                summary.normalized, summary.skipped
            );
        }
        Commands::Extract {
            file,
            municipality,
            out,
            save,
        } => {
            let config = Config::load().unwrap_or_else(|e| {
                warn!("config.toml not loaded ({e}); using defaults");
                Config {
                    extraction: Config::default_extraction(),
                }
            });

            let extractor = GeminiExtractor::from_env(&config.extraction)?;
            let pacing = FixedDelay::new(config.extraction.delay_ms);
            let text = std::fs::read_to_string(&file)?;

            println!("🤖 Extracting schedule data for {municipality}...");
            let draft = extraction::extract_from_text(
                &extractor,
                &pacing,
                &text,
                &municipality,
                config.extraction.chunk_size,
            )
            .await;

            println!(
                "\n📊 Extraction draft: {} areas, {} items",
                draft.areas.len(),
                draft.garbage_items.len()
            );

            if let Some(out) = out {
                std::fs::write(&out, serde_json::to_string_pretty(&draft)?)?;
                println!("💾 Draft written to {}", out.display());
            }

            if save {
                let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
                let municipality_id = seed_municipality(store.as_ref(), &municipality).await?;
                let summary =
                    importer::save_extracted(store.as_ref(), municipality_id, &draft).await?;
                println!(
                    "✅ Saved draft: {} areas, {} items",
                    summary.areas, summary.items
                );
            }
        }
    }

    Ok(())
}
