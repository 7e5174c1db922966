//! Persistence of monthly ex-ante volatility.
//!
//! Volatility is the expensive output of the pipeline, so it can be cached
//! behind a [`VolatilityStore`] and recomputed only on request. Every saved
//! table carries the key it was computed under (estimator settings, input,
//! universe), and a stored table is only reused when the key matches.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{info, warn};
use tsmom_traits::MonthlyPanel;

use crate::{
    Result,
    export::{ExportFormat, read_monthly_panel_path, write_panel_to_path},
};

/// Somewhere a monthly volatility table can be saved and loaded.
pub trait VolatilityStore {
    /// Short description used in logs.
    fn describe(&self) -> String;

    /// The stored table, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<MonthlyPanel>>;

    /// The serialized key the stored table was saved under, if any.
    fn load_key(&self) -> Result<Option<String>>;

    /// Replace the stored table and its key.
    fn save(&mut self, panel: &MonthlyPanel, key: &str) -> Result<()>;
}

/// Wide CSV file at an explicit path, with its key in a `.key.json` file
/// beside it.
#[derive(Debug, Clone)]
pub struct CsvVolatilityStore {
    path: PathBuf,
    key_path: PathBuf,
}

impl CsvVolatilityStore {
    /// Store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut key_path = path.clone().into_os_string();
        key_path.push(".key.json");
        Self {
            path,
            key_path: key_path.into(),
        }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file holding the key of the stored table.
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }
}

impl VolatilityStore for CsvVolatilityStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Option<MonthlyPanel>> {
        if !self.path.exists() {
            return Ok(None);
        }
        read_monthly_panel_path(&self.path).map(Some)
    }

    fn load_key(&self) -> Result<Option<String>> {
        if !self.key_path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.key_path)?))
    }

    fn save(&mut self, panel: &MonthlyPanel, key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        write_panel_to_path(panel, ExportFormat::Csv, &self.path)?;
        fs::write(&self.key_path, key)?;
        Ok(())
    }
}

/// In-process store, mostly for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryVolatilityStore {
    entry: Option<(MonthlyPanel, String)>,
}

impl MemoryVolatilityStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self { entry: None }
    }
}

impl VolatilityStore for MemoryVolatilityStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<Option<MonthlyPanel>> {
        Ok(self.entry.as_ref().map(|(panel, _)| panel.clone()))
    }

    fn load_key(&self) -> Result<Option<String>> {
        Ok(self.entry.as_ref().map(|(_, key)| key.clone()))
    }

    fn save(&mut self, panel: &MonthlyPanel, key: &str) -> Result<()> {
        self.entry = Some((panel.clone(), key.to_string()));
        Ok(())
    }
}

/// Return the stored table if it was saved under `key`, otherwise compute,
/// save and re-read it.
///
/// A table saved under a different key, or without one, is recomputed and
/// overwritten with a warning. With `refresh` set the stored table is ignored
/// and overwritten. The returned table is always the one read back from the
/// store, so a fresh run and a cached run see identical values.
pub fn load_or_compute<S, K, F>(
    store: &mut S,
    refresh: bool,
    key: &K,
    compute: F,
) -> Result<MonthlyPanel>
where
    S: VolatilityStore + ?Sized,
    K: Serialize + ?Sized,
    F: FnOnce() -> tsmom_traits::Result<MonthlyPanel>,
{
    let key = serde_json::to_string(key)?;

    if !refresh {
        if let Some(panel) = store.load()? {
            if store.load_key()?.as_deref() == Some(key.as_str()) {
                info!(store = %store.describe(), months = panel.len(), "loaded ex-ante volatility");
                return Ok(panel);
            }
            warn!(
                store = %store.describe(),
                "stored ex-ante volatility was computed with other settings, recomputing"
            );
        }
    }

    let computed = compute()?;
    store.save(&computed, &key)?;
    info!(store = %store.describe(), months = computed.len(), "saved ex-ante volatility");

    Ok(store.load()?.unwrap_or(computed))
}
