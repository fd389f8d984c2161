use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use design_catalog_sync::app::sync_use_case::{run_timestamp, SyncUseCase};
use design_catalog_sync::config::SyncConfig;
use design_catalog_sync::infra::GithubListing;
use design_catalog_sync::logging;

#[derive(Parser)]
#[command(name = "design-catalog-sync")]
#[command(about = "Add design files from a GitHub repository to a JSON catalog")]
#[command(version)]
struct Cli {
    /// TOML configuration file; compiled-in defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both listings, merge them into the catalog and write the result
    Sync {
        /// Input catalog
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output catalog, must differ from the input
        #[arg(long)]
        output: Option<PathBuf>,
        /// Category that receives the new entries
        #[arg(long)]
        category: Option<String>,
        /// Branch to list
        #[arg(long)]
        branch: Option<String>,
        /// Merge but do not write the output file
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the entries that would be generated, without touching any catalog
    Preview {
        /// Branch to list
        #[arg(long)]
        branch: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut config = SyncConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Sync {
            input,
            output,
            category,
            branch,
            dry_run,
        } => {
            if let Some(input) = input {
                config.input_path = input;
            }
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Some(category) = category {
                config.target_category_id = category;
            }
            if let Some(branch) = branch {
                config.branch = branch;
            }
            run_sync(config, dry_run).await
        }
        Commands::Preview { branch } => {
            if let Some(branch) = branch {
                config.branch = branch;
            }
            run_preview(config).await
        }
    }
}

async fn run_sync(config: SyncConfig, dry_run: bool) -> anyhow::Result<()> {
    let listing = GithubListing::new(&config)?;
    let use_case = SyncUseCase::new(Box::new(listing), config);

    let report = use_case.run(dry_run).await.context("sync failed")?;

    if report.merge.created_category {
        println!("📁 Created category '{}'", report.merge.category_id);
    }
    if report.merge.skipped_existing > 0 {
        println!("↩️  Skipped {} items already in the catalog", report.merge.skipped_existing);
    }
    println!("✅ Done. Added {} items.", report.merge.added);
    if report.written {
        println!("📄 Output: {}", report.output_path.display());
    } else {
        println!("🧪 Dry run, nothing written (would write {})", report.output_path.display());
    }
    Ok(())
}

async fn run_preview(config: SyncConfig) -> anyhow::Result<()> {
    let listing = GithubListing::new(&config)?;
    let use_case = SyncUseCase::new(Box::new(listing), config);

    let fetched = use_case
        .fetch_entries(&run_timestamp())
        .await
        .context("fetching listings")?;
    let placeholder = &use_case.config().placeholder_image_url;

    println!(
        "📥 {} files, {} images listed, {} entries ({} with a preview image)",
        fetched.files_listed,
        fetched.images_listed,
        fetched.entries.len(),
        fetched.images_matched
    );
    for entry in &fetched.entries {
        let image = if &entry.image_url == placeholder { "-" } else { "🖼" };
        println!("   {:<4} {} {:<60} {}", entry.format, image, entry.id, entry.title);
    }
    Ok(())
}
