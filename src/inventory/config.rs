//! Settings file parsing and validation.
//!
//! Values come from an optional TOML file and are then overridden by
//! whatever the command line (or its environment fallbacks) supplies.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::inventory::api::DEFAULT_TIMEOUT;
use crate::inventory::error::{Result, SyncError};
use crate::inventory::io::SheetOptions;
use crate::inventory::mapper::OfferDefaults;
use crate::inventory::model::ReadMode;
use crate::inventory::schedule::DEFAULT_INTERVAL;

const TENANT_PLACEHOLDER: &str = "{tenant}";

/// Raw settings as found in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub api: ApiSettings,
    pub source: SourceSettings,
    pub offer: OfferDefaults,
    pub schedule: ScheduleSettings,
}

#[derive(Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSettings {
    /// Base URL of the API; may contain `{tenant}`.
    pub base_url: Option<String>,
    pub tenant: Option<String>,
    pub credential: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            tenant: None,
            credential: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("tenant", &self.tenant)
            .field("credential", &self.credential.as_ref().map(|_| "****"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSettings {
    pub path: Option<PathBuf>,
    pub sheet_index: usize,
    pub mode: ReadMode,
    pub skip_header: bool,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            path: None,
            sheet_index: 0,
            mode: ReadMode::Batch,
            skip_header: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleSettings {
    pub periodic: bool,
    pub interval_secs: u64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            periodic: false,
            interval_secs: DEFAULT_INTERVAL.as_secs(),
        }
    }
}

/// Values supplied on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub tenant: Option<String>,
    pub credential: Option<String>,
    pub timeout_secs: Option<u64>,
    pub input: Option<PathBuf>,
    pub sheet_index: Option<usize>,
    pub mode: Option<ReadMode>,
    pub no_header: bool,
    pub currency: Option<String>,
    pub supplier_type: Option<String>,
    pub supplier_name: Option<String>,
    pub periodic: bool,
    pub interval_secs: Option<u64>,
}

impl Settings {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads the settings file, or starts from defaults when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(SyncError::Config(format!(
                        "settings file not found: {}",
                        path.display()
                    )));
                }
                debug!(path = %path.display(), "loading settings file");
                Self::from_toml_str(&std::fs::read_to_string(path)?)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        if overrides.base_url.is_some() {
            self.api.base_url = overrides.base_url;
        }
        if overrides.tenant.is_some() {
            self.api.tenant = overrides.tenant;
        }
        if overrides.credential.is_some() {
            self.api.credential = overrides.credential;
        }
        if overrides.input.is_some() {
            self.source.path = overrides.input;
        }
        set(&mut self.api.timeout_secs, overrides.timeout_secs);
        set(&mut self.source.sheet_index, overrides.sheet_index);
        set(&mut self.source.mode, overrides.mode);
        set(&mut self.offer.currency, overrides.currency);
        set(&mut self.offer.supplier_type, overrides.supplier_type);
        set(&mut self.offer.supplier_name, overrides.supplier_name);
        set(&mut self.schedule.interval_secs, overrides.interval_secs);
        if overrides.no_header {
            self.source.skip_header = false;
        }
        if overrides.periodic {
            self.schedule.periodic = true;
        }
        self
    }

    /// Checks the merged settings and resolves them into a [`SyncConfig`].
    pub fn validate(self) -> Result<SyncConfig> {
        let base_url = resolve_base_url(self.api.base_url.as_deref(), self.api.tenant.as_deref())?;

        let credential = self
            .api
            .credential
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| SyncError::Config("API credential is required".into()))?;

        let input = self
            .source
            .path
            .ok_or_else(|| SyncError::Config("input spreadsheet path is required".into()))?;

        if self.api.timeout_secs == 0 {
            return Err(SyncError::Config("timeout_secs must be positive".into()));
        }
        if self.schedule.interval_secs == 0 {
            return Err(SyncError::Config("interval_secs must be positive".into()));
        }

        Ok(SyncConfig {
            base_url,
            credential,
            timeout: Duration::from_secs(self.api.timeout_secs),
            input,
            sheet: SheetOptions {
                sheet_index: self.source.sheet_index,
                skip_header: self.source.skip_header,
            },
            mode: self.source.mode,
            offer: self.offer,
            periodic: self.schedule.periodic,
            interval: Duration::from_secs(self.schedule.interval_secs),
        })
    }
}

fn resolve_base_url(template: Option<&str>, tenant: Option<&str>) -> Result<String> {
    let template = template
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SyncError::Config("API base URL is required".into()))?;

    let resolved = if template.contains(TENANT_PLACEHOLDER) {
        let tenant = tenant
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                SyncError::Config(format!("base URL '{template}' needs a tenant"))
            })?;
        template.replace(TENANT_PLACEHOLDER, tenant)
    } else {
        template.to_string()
    };

    let url = reqwest::Url::parse(&resolved)
        .map_err(|error| SyncError::Config(format!("invalid base URL '{resolved}': {error}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SyncError::Config(format!(
            "base URL '{resolved}' must use http or https"
        )));
    }
    Ok(resolved)
}

/// Validated settings for one process run.
#[derive(Clone)]
pub struct SyncConfig {
    pub base_url: String,
    pub credential: String,
    pub timeout: Duration,
    pub input: PathBuf,
    pub sheet: SheetOptions,
    pub mode: ReadMode,
    pub offer: OfferDefaults,
    pub periodic: bool,
    pub interval: Duration,
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("base_url", &self.base_url)
            .field("credential", &"****")
            .field("timeout", &self.timeout)
            .field("input", &self.input)
            .field("sheet", &self.sheet)
            .field("mode", &self.mode)
            .field("offer", &self.offer)
            .field("periodic", &self.periodic)
            .field("interval", &self.interval)
            .finish()
    }
}
