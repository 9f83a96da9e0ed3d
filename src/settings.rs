use anyhow::{ensure, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::Duration,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub scan_interval_ms: u64,
    pub dispatch_interval_ms: u64,
    /// Fraction of a task's total duration left when the near-expiry notice fires.
    pub notify_fraction: f64,
    pub urgent_window_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            scan_interval_ms: 1_000,
            dispatch_interval_ms: 1_000,
            notify_fraction: 0.10,
            urgent_window_secs: 60,
        }
    }
}

impl EngineSettings {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    pub fn dispatch_interval(&self) -> Duration {
        Duration::from_millis(self.dispatch_interval_ms)
    }

    pub fn urgent_window(&self) -> Duration {
        Duration::from_secs(self.urgent_window_secs)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.scan_interval_ms > 0, "scan_interval_ms must be greater than zero");
        ensure!(
            self.dispatch_interval_ms > 0,
            "dispatch_interval_ms must be greater than zero"
        );
        ensure!(
            self.notify_fraction > 0.0 && self.notify_fraction <= 1.0,
            "notify_fraction must be in (0, 1], got {}",
            self.notify_fraction
        );
        Ok(())
    }
}

pub struct SettingsStore {
    path: Option<PathBuf>,
    data: RwLock<EngineSettings>,
}

impl SettingsStore {
    /// Loads settings from `path` when given. A missing file yields defaults,
    /// a malformed one is logged and replaced by defaults.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let data = match path.as_deref() {
            Some(path) if path.exists() => read_settings(path)?,
            _ => EngineSettings::default(),
        };
        data.validate()
            .context("settings file holds invalid engine settings")?;

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn engine(&self) -> EngineSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Applies command-line overrides in memory; the file is left as it is.
    pub fn apply_overrides(
        &self,
        scan_interval_ms: Option<u64>,
        dispatch_interval_ms: Option<u64>,
    ) -> Result<EngineSettings> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = guard.clone();
        if let Some(ms) = scan_interval_ms {
            next.scan_interval_ms = ms;
        }
        if let Some(ms) = dispatch_interval_ms {
            next.dispatch_interval_ms = ms;
        }
        next.validate()?;
        *guard = next.clone();
        Ok(next)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn read_settings(path: &Path) -> Result<EngineSettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    Ok(serde_json::from_str(&contents).unwrap_or_else(|err| {
        warn!(
            "Ignoring malformed settings in {}: {err}; using defaults",
            path.display()
        );
        EngineSettings::default()
    }))
}
