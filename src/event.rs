//! Canonical seismic event model.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// True when lat is within [-90, 90] and lon within [-180, 180].
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Canonical, source-independent seismic event. Constructed fresh each poll
/// cycle by the normalizer; only its `id` outlives the cycle, inside the
/// dedup store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicEvent {
    /// Source-stable identifier. Non-empty; two fetches of the same physical
    /// event yield the same id.
    pub id: String,
    /// `None` when the source record carried no parseable magnitude. Such
    /// events never pass the relevance filter.
    pub magnitude: Option<f64>,
    /// `None` when the source supplied no usable coordinates.
    pub coordinates: Option<Coordinates>,
    /// Human-readable location label, or the sentinel when missing upstream.
    pub region: String,
    /// Instant the event is attributed to, in the reference display offset.
    pub occurred_at: DateTime<FixedOffset>,
}
