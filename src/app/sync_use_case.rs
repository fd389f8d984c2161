use chrono::{SecondsFormat, Utc};
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::app::ports::ListingPort;
use crate::common::error::Result;
use crate::config::SyncConfig;
use crate::infra::catalog_file;
use crate::pipeline::catalog::{build_entries, build_image_index, Catalog, CatalogEntry, MergeReport};

/// Result of a complete sync run
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub merge: MergeReport,
    pub files_listed: usize,
    pub images_listed: usize,
    pub output_path: PathBuf,
    /// False for dry runs
    pub written: bool,
}

/// Entries built from the two listings, before merging
#[derive(Debug, Clone)]
pub struct FetchedEntries {
    pub entries: Vec<CatalogEntry>,
    pub files_listed: usize,
    pub images_listed: usize,
    pub images_matched: usize,
}

/// Timestamp shared by every entry created in one run, e.g. `2025-01-01T10:00:00.123456Z`
pub fn run_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Fetches the design and image listings and merges them into the catalog.
pub struct SyncUseCase {
    listing: Box<dyn ListingPort>,
    config: SyncConfig,
}

impl SyncUseCase {
    pub fn new(listing: Box<dyn ListingPort>, config: SyncConfig) -> Self {
        Self { listing, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Fetch the files listing, then the images listing, and build sorted entries.
    pub async fn fetch_entries(&self, created_at: &str) -> Result<FetchedEntries> {
        let files = self.listing.list_directory(&self.config.files_path).await?;
        let images = self.listing.list_directory(&self.config.images_path).await?;

        let image_index = build_image_index(&images, &self.config);
        let entries = build_entries(&files, &image_index, &self.config, created_at);
        let images_matched = entries
            .iter()
            .filter(|e| e.image_url != self.config.placeholder_image_url)
            .count();

        info!(
            files = files.len(),
            images = images.len(),
            entries = entries.len(),
            images_matched,
            "built catalog entries"
        );

        Ok(FetchedEntries {
            entries,
            files_listed: files.len(),
            images_listed: images.len(),
            images_matched,
        })
    }

    /// Merge freshly fetched entries into an already loaded catalog.
    pub async fn merge_into(&self, catalog: &mut Catalog, created_at: &str) -> Result<(FetchedEntries, MergeReport)> {
        catalog.check_shape()?;
        let fetched = self.fetch_entries(created_at).await?;
        let report = catalog.merge_entries(
            &self.config.target_category_id,
            &self.config.new_category_template,
            fetched.entries.clone(),
        )?;
        Ok((fetched, report))
    }

    /// Load the input catalog, merge, and write the output unless `dry_run`.
    /// Nothing is written when any step fails.
    #[instrument(skip(self), fields(target = %self.config.target_category_id))]
    pub async fn run(&self, dry_run: bool) -> Result<SyncReport> {
        self.config.validate()?;

        let mut catalog = catalog_file::load_catalog(&self.config.input_path)?;
        let created_at = run_timestamp();
        let (fetched, merge) = self.merge_into(&mut catalog, &created_at).await?;

        if !dry_run {
            catalog_file::write_catalog(&self.config.output_path, &catalog)?;
        }

        info!(
            category = %merge.category_id,
            created = merge.created_category,
            added = merge.added,
            skipped = merge.skipped_existing,
            dry_run,
            "sync finished"
        );

        Ok(SyncReport {
            merge,
            files_listed: fetched.files_listed,
            images_listed: fetched.images_listed,
            output_path: self.config.output_path.clone(),
            written: !dry_run,
        })
    }
}
