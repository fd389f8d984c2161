use serde::{Deserialize, Serialize};

/// Kind of a directory listing entry. Anything that is not a plain file is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    #[serde(other)]
    Other,
}

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Raw download URL, or the browsable URL when no download URL exists
    pub content_url: Option<String>,
}

impl DirectoryEntry {
    pub fn file(name: &str, content_url: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: EntryKind::File,
            content_url: Some(content_url.to_string()),
        }
    }

    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: EntryKind::Dir,
            content_url: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}
