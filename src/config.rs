use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::constants;
use crate::common::error::{CatalogError, Result};
use crate::pipeline::catalog::CategoryTemplate;

/// Environment variable holding an optional GitHub API token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Everything a sync run needs to know. Every field is optional in the TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub repo_owner: String,
    pub repo_name: String,
    pub branch: String,
    pub files_path: String,
    pub images_path: String,
    pub target_category_id: String,
    pub new_category_template: CategoryTemplate,
    pub supported_file_extensions: Vec<String>,
    pub supported_image_extensions: Vec<String>,
    pub input_path: PathBuf,
    pub output_path: PathBuf,

    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub placeholder_image_url: String,
    pub id_prefix: String,
    pub source_tag: String,
    pub default_description: String,
    pub github_token: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            repo_owner: constants::DEFAULT_REPO_OWNER.to_string(),
            repo_name: constants::DEFAULT_REPO_NAME.to_string(),
            branch: constants::DEFAULT_BRANCH.to_string(),
            files_path: constants::DEFAULT_FILES_PATH.to_string(),
            images_path: constants::DEFAULT_IMAGES_PATH.to_string(),
            target_category_id: constants::DEFAULT_TARGET_CATEGORY_ID.to_string(),
            new_category_template: CategoryTemplate::default(),
            supported_file_extensions: constants::SUPPORTED_FILE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            supported_image_extensions: constants::SUPPORTED_IMAGE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            input_path: PathBuf::from(constants::DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(constants::DEFAULT_OUTPUT_PATH),
            api_base_url: constants::GITHUB_API_BASE.to_string(),
            timeout_seconds: constants::REQUEST_TIMEOUT_SECS,
            placeholder_image_url: constants::PLACEHOLDER_IMAGE_URL.to_string(),
            id_prefix: constants::ID_PREFIX.to_string(),
            source_tag: constants::SOURCE_TAG.to_string(),
            default_description: constants::DEFAULT_DESCRIPTION.to_string(),
            github_token: None,
        }
    }
}

impl SyncConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    CatalogError::Config(format!(
                        "Failed to read config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };

        if let Ok(token) = std::env::var(GITHUB_TOKEN_ENV) {
            if !token.trim().is_empty() {
                config.github_token = Some(token.trim().to_string());
            }
        }

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if resolve_path(&self.input_path) == resolve_path(&self.output_path) {
            return Err(CatalogError::Config(format!(
                "output path '{}' must differ from the input path",
                self.output_path.display()
            )));
        }
        if self.supported_file_extensions.is_empty() {
            return Err(CatalogError::Config(
                "supported_file_extensions must not be empty".to_string(),
            ));
        }
        if self.supported_image_extensions.is_empty() {
            return Err(CatalogError::Config(
                "supported_image_extensions must not be empty".to_string(),
            ));
        }
        if self.id_prefix.is_empty()
            || !self
                .id_prefix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(CatalogError::Config(format!(
                "id_prefix '{}' must be lowercase ascii letters or digits",
                self.id_prefix
            )));
        }
        if self.target_category_id.trim().is_empty() {
            return Err(CatalogError::Config(
                "target_category_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Absolute form of `path` for comparison. The file itself need not exist;
/// its parent directory is resolved instead.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.components().collect(),
    }
}
