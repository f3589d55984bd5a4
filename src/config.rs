//! Configuration: TOML file with environment overrides.
//!
//! Resolution order: `$QUAKE_CONFIG_PATH`, then `config/quake.toml`, then
//! built-in defaults (no file is fine). Tunables can be overridden per-field
//! via `QUAKE_*` env vars; sink credentials (`TELEGRAM_TOKEN`, `CHAT_ID`)
//! live in env only and never in the file.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::event::Coordinates;
use crate::relevance::{BoundingBox, RelevancePolicy};

pub const ENV_CONFIG_PATH: &str = "QUAKE_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/quake.toml";

/// Default point of interest: Bangkok.
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 13.7563,
    lon: 100.5018,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Pre-filtered regional GeoJSON feed (seismicportal.eu).
    #[default]
    SeismicPortal,
    /// TMD earthquake-warning HTML bulletin.
    TmdBulletin,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceKind,
    /// Poll cadence in seconds (default 60). Also the retry cadence for a
    /// failed fetch, by construction.
    pub interval_secs: Option<u64>,
    /// Unset means the per-source default: 0.0 for the pre-filtered feed,
    /// 4.0 for the bulletin.
    pub min_magnitude: Option<f64>,
    pub max_distance_km: Option<f64>,
    pub bounding_box: Option<BoundingBox>,
    pub center: Option<Coordinates>,
    pub dedup_ttl_secs: Option<u64>,
    /// Unset means the per-source default: the bulletin carries no
    /// coordinates, so its profile passes geographic checks.
    pub allow_missing_coordinates: Option<bool>,
    /// Endpoint overrides, mainly for staging/testing.
    pub feed_url: Option<String>,
    pub bulletin_url: Option<String>,
    /// When set, Prometheus exposition is served on this address.
    pub metrics_addr: Option<SocketAddr>,
    pub shutdown_grace_secs: Option<u64>,
}

impl AppConfig {
    /// Load using env var + fallbacks; missing file yields defaults.
    pub fn load() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            Self::load_from(&pb)
                .with_context(|| format!("{ENV_CONFIG_PATH} points to {}", pb.display()))?
        } else {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                Self::load_from(default)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing config toml")
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_parse::<u64>("QUAKE_INTERVAL_SECS") {
            self.interval_secs = Some(v);
        }
        if let Some(v) = env_parse::<f64>("QUAKE_MIN_MAGNITUDE") {
            self.min_magnitude = Some(v);
        }
        if let Some(v) = env_parse::<f64>("QUAKE_MAX_DISTANCE_KM") {
            self.max_distance_km = Some(v);
        }
        if let Some(v) = env_parse::<u64>("QUAKE_DEDUP_TTL_SECS") {
            self.dedup_ttl_secs = Some(v);
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs.unwrap_or(60)
    }

    pub fn dedup_ttl_secs(&self) -> u64 {
        self.dedup_ttl_secs.unwrap_or(86_400)
    }

    pub fn shutdown_grace_secs(&self) -> u64 {
        self.shutdown_grace_secs.unwrap_or(30)
    }

    pub fn min_magnitude(&self) -> f64 {
        self.min_magnitude.unwrap_or(match self.source {
            SourceKind::SeismicPortal => 0.0,
            SourceKind::TmdBulletin => 4.0,
        })
    }

    pub fn allow_missing_coordinates(&self) -> bool {
        self.allow_missing_coordinates
            .unwrap_or(matches!(self.source, SourceKind::TmdBulletin))
    }

    pub fn center(&self) -> Coordinates {
        self.center.unwrap_or(DEFAULT_CENTER)
    }

    pub fn policy(&self) -> RelevancePolicy {
        RelevancePolicy {
            min_magnitude: self.min_magnitude(),
            center: self.center(),
            max_distance_km: Some(self.max_distance_km.unwrap_or(2000.0)),
            bounding_box: self.bounding_box,
            allow_missing_coordinates: self.allow_missing_coordinates(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
