// src/ingest/types.rs
use async_trait::async_trait;

use crate::error::FetchError;

/// Raw, weakly-structured record as a source adapter produced it. Every
/// field is optional; the normalizer decides what survives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// Upstream-assigned identifier, when the source has one.
    pub source_id: Option<String>,
    /// Reference link; may embed a fixed-width id/timestamp token.
    pub link: Option<String>,
    /// Magnitude as a direct numeric field.
    pub magnitude: Option<f64>,
    /// Free text (title/description); may carry a magnitude label.
    pub text: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub region: Option<String>,
    /// Timestamp string: RFC 3339 or a 12-digit `DDMMYYYYHHmm` token.
    pub timestamp: Option<String>,
}

#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawRecord>, FetchError>;
    fn name(&self) -> &'static str;
}
