use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stopwatch_core::TICK_MS;

const SETTINGS_FILE: &str = "settings.json";
const SETTINGS_ENV: &str = "STOPWATCH_SETTINGS";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("can't read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("can't parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("tick_ms must be greater than zero")]
    InvalidTick,
    #[error("redraw_ms must be greater than zero")]
    InvalidRedraw,
    #[error("unknown log_level {0:?}")]
    InvalidLogLevel(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    pub enabled: bool,
    pub carrier_country: String,
    pub time_zone: String,
    pub country: String,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            carrier_country: "ir".to_string(),
            time_zone: "Iran Standard Time".to_string(),
            country: "Iran".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tick_ms: u64,
    pub redraw_ms: u64,
    pub log_level: String,
    pub gate: GateSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            redraw_ms: 100,
            log_level: "info".to_string(),
            gate: GateSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_json(path: &Path, data: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(data).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// `Ok(None)` when the file simply isn't there.
    pub fn read(path: &Path) -> Result<Option<Self>, SettingsError> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_json(path, &data).map(Some)
    }

    /// Load from `STOPWATCH_SETTINGS` or `settings.json` beside the executable,
    /// falling back to defaults.
    pub fn load() -> (Self, Option<SettingsError>) {
        let path = settings_path();
        match Self::read(&path) {
            Ok(Some(settings)) => (settings, None),
            Ok(None) => (Self::default(), None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_ms == 0 {
            return Err(SettingsError::InvalidTick);
        }
        if self.redraw_ms == 0 {
            return Err(SettingsError::InvalidRedraw);
        }
        if log::LevelFilter::from_str(&self.log_level).is_err() {
            return Err(SettingsError::InvalidLogLevel(self.log_level.clone()));
        }
        Ok(())
    }
}

fn settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SETTINGS_ENV) {
        return PathBuf::from(path);
    }
    std::env::current_exe()
        .map(|mut p| {
            p.set_file_name(SETTINGS_FILE);
            p
        })
        .unwrap_or_else(|_| SETTINGS_FILE.into())
}
