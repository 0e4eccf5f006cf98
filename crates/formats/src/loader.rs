use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::ids::CountryId;
use tracing::{debug, info};

use crate::adjacency::{AdjacencyError, AdjacencyGraph};
use crate::dataset::{Dataset, DatasetError, DetailSet, Difficulty};
use crate::geojson::{FeatureCollection, GeoJsonError};
use crate::manifest::{
    DatasetManifest, DetailFiles, FileEntry, MANIFEST_FILE_NAME, MANIFEST_VERSION, content_hash,
};

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Manifest(serde_json::Error),
    UnsupportedVersion {
        found: String,
    },
    HashMismatch {
        path: String,
        expected: String,
        actual: String,
    },
    GeoJson {
        path: String,
        source: GeoJsonError,
    },
    Adjacency(AdjacencyError),
    IdList {
        path: String,
        source: serde_json::Error,
    },
    Dataset(DatasetError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            LoadError::Manifest(e) => write!(f, "manifest parse error: {e}"),
            LoadError::UnsupportedVersion { found } => {
                write!(f, "unsupported manifest version: {found}")
            }
            LoadError::HashMismatch {
                path,
                expected,
                actual,
            } => write!(f, "content hash mismatch for {path}: expected {expected}, got {actual}"),
            LoadError::GeoJson { path, source } => write!(f, "{path}: {source}"),
            LoadError::Adjacency(e) => write!(f, "{e}"),
            LoadError::IdList { path, source } => write!(f, "{path}: {source}"),
            LoadError::Dataset(e) => write!(f, "invalid dataset: {e}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<DatasetError> for LoadError {
    fn from(e: DatasetError) -> Self {
        LoadError::Dataset(e)
    }
}

/// Reads `dataset.manifest.json` under `root` and every file it names.
pub fn load_manifest(root: &Path) -> Result<DatasetManifest, LoadError> {
    let manifest_path = root.join(MANIFEST_FILE_NAME);
    let payload = fs::read_to_string(&manifest_path).map_err(|source| LoadError::Io {
        path: manifest_path.clone(),
        source,
    })?;
    let manifest: DatasetManifest = serde_json::from_str(&payload).map_err(LoadError::Manifest)?;
    if manifest.version != MANIFEST_VERSION {
        return Err(LoadError::UnsupportedVersion {
            found: manifest.version,
        });
    }
    Ok(manifest)
}

pub fn load_dataset_dir(root: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let root = root.as_ref();
    let manifest = load_manifest(root)?;

    let low = load_detail(root, &manifest.low)?;
    let high = load_detail(root, &manifest.high)?;

    let adjacency = AdjacencyGraph::from_json_str(&read_entry(root, &manifest.adjacency)?)
        .map_err(LoadError::Adjacency)?;

    let eligible: Vec<i64> = parse_entry(root, &manifest.eligible)?;
    let eligible = eligible.into_iter().map(CountryId).collect();

    let tiers = match &manifest.tiers {
        Some(entry) => {
            let raw: BTreeMap<Difficulty, Vec<i64>> = parse_entry(root, entry)?;
            raw.into_iter()
                .map(|(tier, ids)| (tier, ids.into_iter().map(CountryId).collect()))
                .collect()
        }
        None => BTreeMap::new(),
    };

    let dataset = Dataset::new(low, high, adjacency, eligible, tiers)?;
    info!(
        root = %root.display(),
        countries = dataset.detail(crate::dataset::DetailLevel::High).countries.len(),
        eligible = dataset.eligible().len(),
        tiers = dataset.has_tiers(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Rewrites the manifest under `root` with a fresh content hash for every
/// file it names. Returns the updated manifest.
pub fn write_content_hashes(root: impl AsRef<Path>) -> Result<DatasetManifest, LoadError> {
    let root = root.as_ref();
    let mut manifest = load_manifest(root)?;
    for entry in manifest.entries_mut() {
        let path = root.join(&entry.path);
        let bytes = fs::read(&path).map_err(|source| LoadError::Io { path, source })?;
        entry.content_hash = Some(content_hash(&bytes));
    }

    let manifest_path = root.join(MANIFEST_FILE_NAME);
    let payload = serde_json::to_string_pretty(&manifest).map_err(LoadError::Manifest)?;
    fs::write(&manifest_path, payload).map_err(|source| LoadError::Io {
        path: manifest_path,
        source,
    })?;
    info!(root = %root.display(), files = manifest.entries().len(), "manifest hashes written");
    Ok(manifest)
}

fn load_detail(root: &Path, files: &DetailFiles) -> Result<DetailSet, LoadError> {
    let countries = load_collection(root, &files.countries)?;
    let rivers = files
        .rivers
        .as_ref()
        .map(|e| load_collection(root, e))
        .transpose()?;
    let lakes = files
        .lakes
        .as_ref()
        .map(|e| load_collection(root, e))
        .transpose()?;
    Ok(DetailSet::from_collections(
        &countries,
        rivers.as_ref(),
        lakes.as_ref(),
    )?)
}

fn load_collection(root: &Path, entry: &FileEntry) -> Result<FeatureCollection, LoadError> {
    let payload = read_entry(root, entry)?;
    FeatureCollection::from_geojson_str(&payload).map_err(|source| LoadError::GeoJson {
        path: entry.path.clone(),
        source,
    })
}

fn parse_entry<T: serde::de::DeserializeOwned>(
    root: &Path,
    entry: &FileEntry,
) -> Result<T, LoadError> {
    let payload = read_entry(root, entry)?;
    serde_json::from_str(&payload).map_err(|source| LoadError::IdList {
        path: entry.path.clone(),
        source,
    })
}

fn read_entry(root: &Path, entry: &FileEntry) -> Result<String, LoadError> {
    let path = root.join(&entry.path);
    let bytes = fs::read(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;

    if let Some(expected) = &entry.content_hash {
        let actual = content_hash(&bytes);
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(LoadError::HashMismatch {
                path: entry.path.clone(),
                expected: expected.clone(),
                actual,
            });
        }
    }
    debug!(path = %entry.path, bytes = bytes.len(), "read dataset file");

    String::from_utf8(bytes).map_err(|e| LoadError::Io {
        path,
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

#[cfg(test)]
mod tests {
    use super::{LoadError, load_dataset_dir, write_content_hashes};
    use crate::dataset::{DetailLevel, Difficulty};
    use crate::manifest::{DatasetManifest, DetailFiles, FileEntry, MANIFEST_FILE_NAME};
    use foundation::ids::CountryId;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::{Path, PathBuf};

    const COUNTRIES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"NE_ID":1,"NAME":"Westland"},
         "geometry":{"type":"Polygon","coordinates":[[[0,0],[5,0],[5,5],[0,5],[0,0]]]}},
        {"type":"Feature","properties":{"NE_ID":2,"NAME":"Eastland"},
         "geometry":{"type":"Polygon","coordinates":[[[5,0],[10,0],[10,5],[5,5],[5,0]]]}}
    ]}"#;
    const RIVERS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[1,1],[9,4]]}}
    ]}"#;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("geoquiz_loader_{label}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn write(root: &Path, name: &str, body: &str) -> FileEntry {
        fs::write(root.join(name), body).expect("write fixture");
        FileEntry::new(name).with_hash_of(body.as_bytes())
    }

    fn write_fixture(root: &Path) -> DatasetManifest {
        let countries = write(root, "countries.geojson", COUNTRIES);
        let rivers = write(root, "rivers.geojson", RIVERS);
        let adjacency = write(root, "adjacency.json", r#"{"1":[2],"2":[1,null]}"#);
        let eligible = write(root, "eligible.json", "[1, 2]");
        let tiers = write(root, "tiers.json", r#"{"easy":[1],"hard":[2]}"#);

        let mut high = DetailFiles::countries_only(countries.clone());
        high.rivers = Some(rivers);
        let mut manifest = DatasetManifest::new(
            DetailFiles::countries_only(countries),
            high,
            adjacency,
            eligible,
        );
        manifest.tiers = Some(tiers);
        let payload = serde_json::to_string_pretty(&manifest).expect("serialize manifest");
        fs::write(root.join(MANIFEST_FILE_NAME), payload).expect("write manifest");
        manifest
    }

    #[test]
    fn loads_dataset_directory() {
        let root = temp_dir("load");
        write_fixture(&root);

        let ds = load_dataset_dir(&root).expect("load dataset");
        assert_eq!(ds.eligible(), &[CountryId(1), CountryId(2)]);
        assert_eq!(ds.detail(DetailLevel::High).rivers.len(), 1);
        assert!(ds.detail(DetailLevel::Low).rivers.is_empty());
        assert!(ds.adjacency().is_adjacent(CountryId(2), CountryId(1)));
        assert_eq!(ds.pool(Some(Difficulty::Hard)), &[CountryId(2)]);
        assert_eq!(ds.country(CountryId(1)).map(|c| c.name.as_str()), Some("Westland"));
    }

    #[test]
    fn detects_tampered_files() {
        let root = temp_dir("hash");
        write_fixture(&root);
        fs::write(root.join("eligible.json"), "[1]").expect("tamper");

        let err = load_dataset_dir(&root).expect_err("hash mismatch");
        assert!(matches!(err, LoadError::HashMismatch { ref path, .. } if path == "eligible.json"));
    }

    #[test]
    fn rejects_unknown_version() {
        let root = temp_dir("version");
        let mut manifest = write_fixture(&root);
        manifest.version = "2.0".to_string();
        let payload = serde_json::to_string(&manifest).expect("serialize manifest");
        fs::write(root.join(MANIFEST_FILE_NAME), payload).expect("write manifest");

        let err = load_dataset_dir(&root).expect_err("version error");
        assert!(matches!(err, LoadError::UnsupportedVersion { found } if found == "2.0"));
    }

    #[test]
    fn rehashing_accepts_edited_files() {
        let root = temp_dir("rehash");
        write_fixture(&root);
        fs::write(root.join("eligible.json"), "[2, 1]").expect("edit");
        assert!(load_dataset_dir(&root).is_err());

        let manifest = write_content_hashes(&root).expect("rehash");
        assert!(manifest.entries().iter().all(|e| e.content_hash.is_some()));
        let ds = load_dataset_dir(&root).expect("load dataset");
        assert_eq!(ds.eligible(), &[CountryId(2), CountryId(1)]);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let root = temp_dir("missing").join("nope");
        assert!(matches!(load_dataset_dir(&root), Err(LoadError::Io { .. })));
    }
}
