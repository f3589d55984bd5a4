//! Raw record → canonical event normalization.
//!
//! Normalization is total except for identifier extraction: a record with
//! no derivable id fails with [`NormalizeError::MissingIdentifier`] and is
//! dropped. Every other missing or malformed field degrades to `None` or a
//! sentinel so the record still flows downstream.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::error::NormalizeError;
use crate::event::{Coordinates, SeismicEvent};
use crate::ingest::types::RawRecord;

/// Offset used for display and for sources reporting local wall-clock
/// time without an explicit zone (+07:00, Asia/Bangkok).
pub fn reference_offset() -> FixedOffset {
    // 7 * 3600 is always in range for east_opt.
    FixedOffset::east_opt(7 * 3600).unwrap()
}

/// Region label used when upstream omits one ("unspecified").
pub const REGION_UNSPECIFIED: &str = "ไม่ระบุ";

fn link_id_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"/(\d{12})$").unwrap())
}

fn magnitude_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    // Thai magnitude label followed by a decimal number, e.g. "ขนาด 4.5".
    RE.get_or_init(|| Regex::new(r"ขนาด\s*([0-9]+(?:\.[0-9]+)?)").unwrap())
}

/// Build a canonical [`SeismicEvent`] from one raw source record.
///
/// `fetched_at` is the cycle's fetch instant, used as the timestamp
/// fallback when the record carries none (or an unparseable one).
pub fn normalize(
    raw: &RawRecord,
    fetched_at: DateTime<FixedOffset>,
) -> Result<SeismicEvent, NormalizeError> {
    let id = extract_id(raw).ok_or(NormalizeError::MissingIdentifier)?;

    let magnitude = raw
        .magnitude
        .or_else(|| raw.text.as_deref().and_then(extract_magnitude));

    let coordinates = match (raw.lat, raw.lon) {
        (Some(lat), Some(lon)) => {
            let c = Coordinates { lat, lon };
            c.in_range().then_some(c)
        }
        _ => None,
    };

    let region = raw
        .region
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| REGION_UNSPECIFIED.to_string());

    let occurred_at = raw
        .timestamp
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(fetched_at)
        .with_timezone(&reference_offset());

    Ok(SeismicEvent {
        id,
        magnitude,
        coordinates,
        region,
        occurred_at,
    })
}

/// Source-provided id wins; otherwise the trailing 12-digit token of the
/// reference link (the bulletin source encodes `DDMMYYYYHHmm` there).
fn extract_id(raw: &RawRecord) -> Option<String> {
    if let Some(id) = raw.source_id.as_deref() {
        let id = id.trim();
        if !id.is_empty() {
            return Some(id.to_string());
        }
    }
    raw.link
        .as_deref()
        .and_then(|link| link_id_re().captures(link.trim_end()))
        .map(|caps| caps[1].to_string())
}

/// Pull a magnitude out of free text via the locale-specific label.
pub fn extract_magnitude(text: &str) -> Option<f64> {
    magnitude_re()
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Accepts RFC 3339 / ISO-8601, or the bulletin's fixed-width
/// `DDMMYYYYHHmm` token interpreted at the reference offset.
fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    parse_compact_token(s)
}

fn parse_compact_token(s: &str) -> Option<DateTime<FixedOffset>> {
    if s.len() != 12 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day: u32 = s[0..2].parse().ok()?;
    let month: u32 = s[2..4].parse().ok()?;
    let year: i32 = s[4..8].parse().ok()?;
    let hour: u32 = s[8..10].parse().ok()?;
    let minute: u32 = s[10..12].parse().ok()?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
    reference_offset().from_local_datetime(&naive).single()
}
