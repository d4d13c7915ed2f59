use std::{
    fs,
    future::Future,
    path::PathBuf,
    pin::Pin,
};

use anyhow::{Context, Result};
use pairing_core::RoomsInfo;

use super::RoomsStore;

/// Local-directory implementation of the store contract, one JSON file per
/// key. Useful for offline use and for tooling that inspects a record.
#[derive(Clone)]
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn in_default_dir() -> Self {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("pairing-rooms");
        Self { base_dir }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    fn read_record(&self, key: &str) -> Result<RoomsInfo> {
        let path = self.record_path(key);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        if raw.trim().is_empty() {
            return Ok(RoomsInfo::seed());
        }

        serde_json::from_str(&raw)
            .with_context(|| format!("failed to deserialize rooms snapshot from {}", path.display()))
    }

    fn write_record(&self, key: &str, info: &RoomsInfo) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("failed to create {}", self.base_dir.display()))?;

        let path = self.record_path(key);
        let tmp_path = path.with_extension("tmp");

        let serialized = serde_json::to_string_pretty(info)?;
        fs::write(&tmp_path, serialized)
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path).with_context(|| {
            format!(
                "failed to atomically move {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl RoomsStore for JsonFileStore {
    fn fetch<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RoomsInfo>> + Send + 'a>> {
        Box::pin(async move { self.read_record(key) })
    }

    fn store<'a>(
        &'a self,
        key: &'a str,
        info: &'a RoomsInfo,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move { self.write_record(key, info) })
    }
}
