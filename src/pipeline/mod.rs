// Catalog building: filename normalization and merging into the catalog document

pub mod catalog;
pub mod normalize;

// Re-export key types from each stage
pub use catalog::{build_entries, build_image_index, Catalog, CatalogEntry, CategoryTemplate, MergeReport};
