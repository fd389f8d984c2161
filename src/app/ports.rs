use async_trait::async_trait;

use crate::common::error::Result;
use crate::common::types::DirectoryEntry;

/// Lists the entries of one remote directory.
#[async_trait]
pub trait ListingPort: Send + Sync {
    async fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>>;
}
