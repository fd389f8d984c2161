pub mod catalog_file;
pub mod github_listing;

pub use github_listing::GithubListing;
