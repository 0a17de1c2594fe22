use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Location, StorageMeta, StorageType, Timestamp};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use super::{block_location, is_valid_location};
use crate::domain::StorageBackendError;
use crate::ports::{AppendResult, ReadResult, StorageBackend, SystemTimeSource, TimeSource};

const MANIFEST_FILE: &str = "locations.log";
const DEFAULT_STORAGE_DIR: &str = "./ledger-data";

/// File storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorageConfig {
    /// Directory holding block files and the manifest.
    pub root_dir: PathBuf,
    /// fsync block files and the manifest after every append.
    pub sync_writes: bool,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            sync_writes: false,
        }
    }
}

impl FileStorageConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// - `IL_STORAGE_DIR`: root directory (default: ./ledger-data)
    /// - `IL_STORAGE_SYNC`: fsync after every append (default: false)
    pub fn from_env() -> Self {
        Self {
            root_dir: env::var("IL_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR)),
            sync_writes: env::var("IL_STORAGE_SYNC")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

#[derive(Default)]
struct Manifest {
    order: Vec<Location>,
    timestamps: HashMap<Location, Timestamp>,
}

impl Manifest {
    fn record(&mut self, location: Location, timestamp: Timestamp) {
        if self.timestamps.insert(location.clone(), timestamp).is_none() {
            self.order.push(location);
        }
    }
}

/// Directory-backed storage.
///
/// One `<location>.json` file per block plus an append-only
/// `locations.log` manifest (`<location> <timestamp>` per line). The
/// manifest fixes append order across restarts; a block file without a
/// manifest line is invisible.
pub struct FileStorage {
    config: FileStorageConfig,
    manifest: RwLock<Manifest>,
    append_lock: tokio::sync::Mutex<()>,
    time: Arc<dyn TimeSource>,
}

impl FileStorage {
    /// Open (creating if needed) the storage directory.
    pub async fn open(config: FileStorageConfig) -> Result<Self, StorageBackendError> {
        Self::open_with_time_source(config, Arc::new(SystemTimeSource)).await
    }

    pub async fn open_with_time_source(
        config: FileStorageConfig,
        time: Arc<dyn TimeSource>,
    ) -> Result<Self, StorageBackendError> {
        tokio::fs::create_dir_all(&config.root_dir).await?;
        let manifest = load_manifest(&config.root_dir.join(MANIFEST_FILE)).await?;

        tracing::info!(
            root_dir = %config.root_dir.display(),
            blocks = manifest.order.len(),
            "File storage opened"
        );

        Ok(Self {
            config,
            manifest: RwLock::new(manifest),
            append_lock: tokio::sync::Mutex::new(()),
            time,
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.config.root_dir
    }

    fn block_path(&self, location: &str) -> PathBuf {
        self.config.root_dir.join(format!("{location}.json"))
    }

    fn known_timestamp(&self, location: &str) -> Option<Timestamp> {
        self.manifest.read().timestamps.get(location).copied()
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    async fn append(&self, content: String) -> Result<AppendResult, StorageBackendError> {
        let _guard = self.append_lock.lock().await;
        let sequence = self.manifest.read().order.len() as u64;
        let location = block_location(sequence, &content);

        // Write to a temp file and rename so a crash never leaves a torn block
        let path = self.block_path(&location);
        let tmp_path = path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(content.as_bytes()).await?;
        if self.config.sync_writes {
            file.sync_all().await?;
        }
        drop(file);
        tokio::fs::rename(&tmp_path, &path).await?;

        let timestamp = self.time.now();
        let mut manifest_file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.config.root_dir.join(MANIFEST_FILE))
            .await?;
        manifest_file
            .write_all(format!("{location} {timestamp}\n").as_bytes())
            .await?;
        if self.config.sync_writes {
            manifest_file.sync_all().await?;
        }

        self.manifest.write().record(location.clone(), timestamp);

        tracing::debug!(location = %location, size = content.len(), "Block file written");

        Ok(AppendResult {
            location,
            meta: StorageMeta {
                storage_type: StorageType::File,
                size: content.len(),
                timestamp,
            },
        })
    }

    async fn read(&self, location: &str) -> Result<ReadResult, StorageBackendError> {
        if !is_valid_location(location) {
            return Err(StorageBackendError::InvalidLocation {
                location: location.to_string(),
            });
        }
        let timestamp =
            self.known_timestamp(location)
                .ok_or_else(|| StorageBackendError::NotFound {
                    location: location.to_string(),
                })?;

        let content = match tokio::fs::read_to_string(self.block_path(location)).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageBackendError::Backend(format!(
                    "manifest lists {location} but its block file is missing"
                )))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(ReadResult {
            meta: StorageMeta {
                storage_type: StorageType::File,
                size: content.len(),
                timestamp,
            },
            content,
        })
    }

    async fn get_all_locations(&self) -> Result<Vec<Location>, StorageBackendError> {
        Ok(self.manifest.read().order.clone())
    }
}

async fn load_manifest(path: &Path) -> Result<Manifest, StorageBackendError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Manifest::default()),
        Err(e) => return Err(e.into()),
    };

    let mut manifest = Manifest::default();
    for (line_no, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed = line
            .split_once(' ')
            .filter(|(location, _)| is_valid_location(location))
            .and_then(|(location, ts)| ts.trim().parse::<Timestamp>().ok().map(|ts| (location, ts)));

        match parsed {
            Some((location, timestamp)) => manifest.record(location.to_string(), timestamp),
            None => {
                return Err(StorageBackendError::Backend(format!(
                    "malformed manifest line {}: {line:?}",
                    line_no + 1
                )))
            }
        }
    }
    Ok(manifest)
}
