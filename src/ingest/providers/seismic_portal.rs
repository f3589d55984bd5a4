//! EMSC seismicportal.eu FDSN event feed (GeoJSON).

use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use metrics::histogram;
use serde::Deserialize;

use crate::error::FetchError;
use crate::ingest::types::{RawRecord, SourceProvider};
use crate::relevance::BoundingBox;

pub const DEFAULT_URL: &str = "https://www.seismicportal.eu/fdsnws/event/1/query";

/// Sliding query window: events from the last 24 h, matching the dedup TTL
/// assumption that no event is re-reported more than a day apart.
const WINDOW_SECS: i64 = 24 * 3600;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    source_id: Option<String>,
    #[serde(default)]
    mag: Option<f64>,
    lat: Option<f64>,
    lon: Option<f64>,
    flynn_region: Option<String>,
    time: Option<String>,
}

pub struct SeismicPortalProvider {
    mode: Mode,
    bbox: Option<BoundingBox>,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl SeismicPortalProvider {
    /// Parse from a captured response body; used by tests.
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
            bbox: None,
        }
    }

    pub fn from_url(url: impl Into<String>, bbox: Option<BoundingBox>) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
            bbox,
        }
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let end = Utc::now();
        let start = end - ChronoDuration::seconds(WINDOW_SECS);
        let mut params = vec![
            ("format", "json".to_string()),
            ("starttime", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("endtime", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];
        if let Some(b) = &self.bbox {
            params.push(("minlat", b.min_lat.to_string()));
            params.push(("maxlat", b.max_lat.to_string()));
            params.push(("minlon", b.min_lon.to_string()));
            params.push(("maxlon", b.max_lon.to_string()));
        }
        params
    }

    pub fn parse_records_from_str(s: &str) -> Result<Vec<RawRecord>, FetchError> {
        let t0 = std::time::Instant::now();
        let fc: FeatureCollection = serde_json::from_str(s)
            .map_err(|e| FetchError::Malformed(format!("geojson: {e}")))?;

        let out = fc
            .features
            .into_iter()
            .map(|f| {
                let p = f.properties;
                RawRecord {
                    source_id: p.source_id,
                    magnitude: p.mag,
                    lat: p.lat,
                    lon: p.lon,
                    region: p.flynn_region,
                    timestamp: p.time,
                    ..RawRecord::default()
                }
            })
            .collect::<Vec<_>>();

        histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }
}

#[async_trait::async_trait]
impl SourceProvider for SeismicPortalProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawRecord>, FetchError> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_records_from_str(s),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .query(&self.query_params())
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                Self::parse_records_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "seismic-portal"
    }
}
