//! Rendering of the fixed user-facing alert template.

use crate::event::{Coordinates, SeismicEvent};
use crate::geo;

/// Render the alert message for one event. Pure; absent optional fields
/// fall back to sentinels (no distance line without coordinates, `-` for a
/// missing magnitude).
pub fn render_alert(event: &SeismicEvent, center: Coordinates) -> String {
    let magnitude = event
        .magnitude
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut msg = format!(
        "⚠️ แผ่นดินไหวแจ้งเตือน ⚠️\n\nสถานที่: {}\nขนาด: M{}",
        event.region, magnitude
    );

    if let Some(c) = event.coordinates {
        let km = format_distance_km(geo::distance_km(c, center));
        msg.push_str(&format!("\nห่างจากกรุงเทพ: {km} กม."));
    }

    msg.push_str(&format!(
        "\nเวลา: {}",
        event.occurred_at.format("%d/%m/%Y %H:%M:%S")
    ));

    msg
}

/// One decimal place, thousands grouped with commas: 1234.56 → "1,234.6".
fn format_distance_km(km: f64) -> String {
    let fixed = format!("{km:.1}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*b as char);
    }
    format!("{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn bangkok() -> Coordinates {
        Coordinates {
            lat: 13.7563,
            lon: 100.5018,
        }
    }

    fn sample_event() -> SeismicEvent {
        SeismicEvent {
            id: "1785674".into(),
            magnitude: Some(5.2),
            coordinates: Some(Coordinates {
                lat: 21.99,
                lon: 96.07,
            }),
            region: "MYANMAR".into(),
            occurred_at: FixedOffset::east_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(2025, 3, 28, 13, 20, 52)
                .unwrap(),
        }
    }

    #[test]
    fn renders_full_template() {
        let msg = render_alert(&sample_event(), bangkok());
        assert!(msg.starts_with("⚠️ แผ่นดินไหวแจ้งเตือน ⚠️\n\n"));
        assert!(msg.contains("สถานที่: MYANMAR"));
        assert!(msg.contains("ขนาด: M5.2"));
        assert!(msg.contains("กม."));
        assert!(msg.contains("เวลา: 28/03/2025 13:20:52"));
    }

    #[test]
    fn omits_distance_without_coordinates() {
        let mut ev = sample_event();
        ev.coordinates = None;
        let msg = render_alert(&ev, bangkok());
        assert!(!msg.contains("ห่างจากกรุงเทพ"));
    }

    #[test]
    fn missing_magnitude_renders_sentinel() {
        let mut ev = sample_event();
        ev.magnitude = None;
        let msg = render_alert(&ev, bangkok());
        assert!(msg.contains("ขนาด: M-"));
    }

    #[test]
    fn distance_grouping() {
        assert_eq!(format_distance_km(0.0), "0.0");
        assert_eq!(format_distance_km(150.04), "150.0");
        assert_eq!(format_distance_km(1234.56), "1,234.6");
        assert_eq!(format_distance_km(1_234_567.89), "1,234,567.9");
    }
}
