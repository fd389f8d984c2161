use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace, warn};

use crate::common::constants;
use crate::common::error::{CatalogError, Result};
use crate::common::types::DirectoryEntry;
use crate::config::SyncConfig;
use crate::pipeline::normalize;

/// One design file as stored in a category's `files` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub format: String,
    pub image_url: String,
    pub download_url: Option<String>,
    pub created_at: String,
    pub downloads_count: u64,
    pub views_count: u64,
    pub rating: f64,
    pub rating_count: u64,
    pub is_featured: bool,
    pub is_editable: bool,
    pub is_ready_to_cut: bool,
    pub usage_type: String,
    pub material_type: String,
    pub product_type: String,
    pub tags: Vec<String>,
}

/// Fields of the category created when the target category is missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTemplate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: String,
    pub order: i64,
    pub description: String,
}

impl Default for CategoryTemplate {
    fn default() -> Self {
        Self {
            id: constants::NEW_CATEGORY_ID.to_string(),
            name: constants::NEW_CATEGORY_NAME.to_string(),
            category_type: constants::NEW_CATEGORY_TYPE.to_string(),
            order: constants::NEW_CATEGORY_ORDER,
            description: constants::NEW_CATEGORY_DESCRIPTION.to_string(),
        }
    }
}

impl CategoryTemplate {
    /// Instantiate the template as a catalog category holding `files`.
    pub fn to_category(&self, files: Vec<Value>) -> Result<Value> {
        let mut category = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut category {
            fields.insert("files".to_string(), Value::Array(files));
        }
        Ok(category)
    }
}

/// Outcome of merging one batch of entries into a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Category that received the entries
    pub category_id: String,
    pub created_category: bool,
    pub generated: usize,
    pub added: usize,
    pub skipped_existing: usize,
}

/// Map image stem to image URL. When several images share a stem the later
/// one in listing order wins.
pub fn build_image_index(images: &[DirectoryEntry], config: &SyncConfig) -> HashMap<String, String> {
    let mut index = HashMap::new();
    for entry in images {
        if !entry.is_file() {
            trace!(name = %entry.name, "skipping non-file image entry");
            continue;
        }
        if normalize::supported_ext(&entry.name, &config.supported_image_extensions).is_none() {
            trace!(name = %entry.name, "skipping unsupported image");
            continue;
        }
        let Some(url) = &entry.content_url else {
            debug!(name = %entry.name, "image has no URL, ignoring");
            continue;
        };
        index.insert(normalize::stem(&entry.name), url.clone());
    }
    index
}

/// Build one entry per supported design file, sorted by title.
///
/// Titles are ordered by Unicode code point, so `"B design"` sorts before
/// `"a design"`. When two files produce the same id only the first one in title
/// order is kept.
pub fn build_entries(
    files: &[DirectoryEntry],
    image_index: &HashMap<String, String>,
    config: &SyncConfig,
    created_at: &str,
) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for entry in files {
        if !entry.is_file() {
            trace!(name = %entry.name, "skipping non-file entry");
            continue;
        }
        let Some(ext) = normalize::supported_ext(&entry.name, &config.supported_file_extensions)
        else {
            trace!(name = %entry.name, "skipping unsupported file");
            continue;
        };

        let id = normalize::slug(&config.id_prefix, &entry.name);
        let image_url = image_index
            .get(&normalize::stem(&entry.name))
            .cloned()
            .unwrap_or_else(|| config.placeholder_image_url.clone());
        let format = ext.to_uppercase();

        entries.push((
            entry.name.clone(),
            CatalogEntry {
                id,
                title: normalize::title(&entry.name),
                description: config.default_description.clone(),
                format: format.clone(),
                image_url,
                download_url: entry.content_url.clone(),
                created_at: created_at.to_string(),
                downloads_count: 0,
                views_count: 0,
                rating: 0.0,
                rating_count: 0,
                is_featured: false,
                is_editable: true,
                is_ready_to_cut: true,
                usage_type: constants::DEFAULT_USAGE_TYPE.to_string(),
                material_type: String::new(),
                product_type: String::new(),
                tags: vec![config.source_tag.clone(), format],
            },
        ));
    }

    entries.sort_by(|(_, a), (_, b)| a.title.cmp(&b.title));

    let mut seen: HashMap<String, String> = HashMap::new();
    let mut unique = Vec::with_capacity(entries.len());
    for (name, entry) in entries {
        if let Some(kept) = seen.get(&entry.id) {
            warn!(
                id = %entry.id,
                kept = %kept,
                dropped = %name,
                "two files map to the same id, dropping the later one"
            );
            continue;
        }
        seen.insert(entry.id.clone(), name);
        unique.push(entry);
    }
    unique
}

/// The catalog document. Only `categories` is interpreted; every other
/// top-level field is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    root: Map<String, Value>,
}

impl Catalog {
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(CatalogError::InputShape(
                "top level must be a JSON object".to_string(),
            ));
        };
        let catalog = Self { root };
        catalog.check_shape()?;
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(content)?)
    }

    /// `categories` may be absent but, when present, must be an array.
    pub fn check_shape(&self) -> Result<()> {
        match self.root.get("categories") {
            None | Some(Value::Array(_)) => Ok(()),
            Some(other) => Err(CatalogError::InputShape(format!(
                "categories must be a list, found {}",
                json_kind(other)
            ))),
        }
    }

    pub fn categories(&self) -> &[Value] {
        match self.root.get("categories") {
            Some(Value::Array(categories)) => categories,
            _ => &[],
        }
    }

    /// First category whose `id` equals `id`. Duplicate ids are not detected.
    pub fn find_category(&self, id: &str) -> Option<&Value> {
        self.categories().iter().find(|c| category_has_id(c, id))
    }

    /// Append `entries` to the category `target_id`, creating it from
    /// `template` when missing. Entries whose id is already present are skipped;
    /// existing entries are never modified or reordered.
    pub fn merge_entries(
        &mut self,
        target_id: &str,
        template: &CategoryTemplate,
        entries: Vec<CatalogEntry>,
    ) -> Result<MergeReport> {
        let generated = entries.len();

        let categories = match self
            .root
            .entry("categories")
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(categories) => categories,
            other => {
                return Err(CatalogError::InputShape(format!(
                    "categories must be a list, found {}",
                    json_kind(other)
                )))
            }
        };

        let position = categories.iter().position(|c| category_has_id(c, target_id));
        let Some(position) = position else {
            let files = entries
                .iter()
                .map(serde_json::to_value)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            categories.push(template.to_category(files)?);
            info!(
                category = %template.id,
                target = %target_id,
                entries = generated,
                "target category not found, created a new one"
            );
            return Ok(MergeReport {
                category_id: template.id.clone(),
                created_category: true,
                generated,
                added: generated,
                skipped_existing: 0,
            });
        };

        let Value::Object(fields) = &mut categories[position] else {
            unreachable!("category_has_id only matches objects");
        };
        match fields.get("files") {
            Some(Value::Array(_)) => {}
            Some(_) => {
                warn!(category = %target_id, "category files is not a list, replacing it");
                fields.insert("files".to_string(), Value::Array(Vec::new()));
            }
            None => {
                fields.insert("files".to_string(), Value::Array(Vec::new()));
            }
        }
        let Some(Value::Array(files)) = fields.get_mut("files") else {
            unreachable!("files was just made a list");
        };

        let mut existing_ids: HashSet<String> = files
            .iter()
            .filter_map(|f| f.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        let mut added = 0;
        for entry in entries {
            if existing_ids.contains(&entry.id) {
                debug!(id = %entry.id, "entry already present, skipping");
                continue;
            }
            existing_ids.insert(entry.id.clone());
            files.push(serde_json::to_value(&entry)?);
            added += 1;
        }

        Ok(MergeReport {
            category_id: target_id.to_string(),
            created_category: false,
            generated,
            added,
            skipped_existing: generated - added,
        })
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

fn category_has_id(category: &Value, id: &str) -> bool {
    category.get("id").and_then(Value::as_str) == Some(id)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
