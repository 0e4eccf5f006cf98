use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: &str = "1.0";
pub const MANIFEST_FILE_NAME: &str = "dataset.manifest.json";

/// Index of a dataset directory: which file holds which layer, per detail level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetManifest {
    pub version: String,
    pub name: Option<String>,
    pub low: DetailFiles,
    pub high: DetailFiles,
    pub adjacency: FileEntry,
    pub eligible: FileEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiers: Option<FileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailFiles {
    pub countries: FileEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rivers: Option<FileEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lakes: Option<FileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileEntry {
    pub path: String,
    /// Hex blake3 digest of the file bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content_hash: None,
        }
    }

    pub fn with_hash_of(mut self, bytes: &[u8]) -> Self {
        self.content_hash = Some(content_hash(bytes));
        self
    }
}

impl DetailFiles {
    pub fn countries_only(countries: FileEntry) -> Self {
        Self {
            countries,
            rivers: None,
            lakes: None,
        }
    }
}

impl DatasetManifest {
    pub fn new(
        low: DetailFiles,
        high: DetailFiles,
        adjacency: FileEntry,
        eligible: FileEntry,
    ) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            name: None,
            low,
            high,
            adjacency,
            eligible,
            tiers: None,
        }
    }

    /// Every referenced file, in load order.
    pub fn entries(&self) -> Vec<&FileEntry> {
        let mut out = Vec::new();
        for detail in [&self.low, &self.high] {
            out.push(&detail.countries);
            out.extend(detail.rivers.iter());
            out.extend(detail.lakes.iter());
        }
        out.push(&self.adjacency);
        out.push(&self.eligible);
        out.extend(self.tiers.iter());
        out
    }

    pub fn entries_mut(&mut self) -> Vec<&mut FileEntry> {
        let mut out = Vec::new();
        for detail in [&mut self.low, &mut self.high] {
            out.push(&mut detail.countries);
            out.extend(detail.rivers.iter_mut());
            out.extend(detail.lakes.iter_mut());
        }
        out.push(&mut self.adjacency);
        out.push(&mut self.eligible);
        out.extend(self.tiers.iter_mut());
        out
    }
}

pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
