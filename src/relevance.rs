//! Relevance gate: magnitude threshold plus optional geographic checks.

use serde::Deserialize;

use crate::event::{Coordinates, SeismicEvent};
use crate::geo;

/// Coarse rectangular prefilter in degrees.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, c: Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&c.lat)
            && (self.min_lon..=self.max_lon).contains(&c.lon)
    }
}

/// Thresholds deciding which events warrant a notification. Built from
/// config at startup, read-only afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct RelevancePolicy {
    pub min_magnitude: f64,
    pub center: Coordinates,
    /// Radius cutoff from `center`; `None` disables the check.
    pub max_distance_km: Option<f64>,
    /// Coarse regional prefilter; `None` disables the check. When both this
    /// and the radius are set, a relevant event must satisfy both.
    pub bounding_box: Option<BoundingBox>,
    /// Policy for records without usable coordinates: when false (default),
    /// any configured geographic check fails them; when true, geographic
    /// checks pass and only the magnitude threshold applies. The bulletin
    /// source carries no coordinates, so its profile enables this.
    #[serde(default)]
    pub allow_missing_coordinates: bool,
}

/// Pure, total relevance check.
pub fn is_relevant(event: &SeismicEvent, policy: &RelevancePolicy) -> bool {
    let Some(magnitude) = event.magnitude else {
        return false;
    };
    if magnitude < policy.min_magnitude {
        return false;
    }

    match event.coordinates {
        Some(c) => {
            if let Some(bbox) = &policy.bounding_box {
                if !bbox.contains(c) {
                    return false;
                }
            }
            if let Some(max_km) = policy.max_distance_km {
                if geo::distance_km(c, policy.center) > max_km {
                    return false;
                }
            }
            true
        }
        None => {
            let geo_constrained =
                policy.bounding_box.is_some() || policy.max_distance_km.is_some();
            !geo_constrained || policy.allow_missing_coordinates
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn event(magnitude: Option<f64>, coordinates: Option<Coordinates>) -> SeismicEvent {
        SeismicEvent {
            id: "t1".into(),
            magnitude,
            coordinates,
            region: "TEST".into(),
            occurred_at: FixedOffset::east_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(2025, 3, 28, 13, 20, 0)
                .unwrap(),
        }
    }

    fn policy() -> RelevancePolicy {
        RelevancePolicy {
            min_magnitude: 4.0,
            center: Coordinates {
                lat: 13.7563,
                lon: 100.5018,
            },
            max_distance_km: Some(2000.0),
            bounding_box: None,
            allow_missing_coordinates: false,
        }
    }

    const NEARBY: Coordinates = Coordinates {
        lat: 21.99,
        lon: 96.07,
    };

    #[test]
    fn absent_magnitude_never_relevant() {
        assert!(!is_relevant(&event(None, Some(NEARBY)), &policy()));
    }

    #[test]
    fn below_threshold_rejected() {
        assert!(!is_relevant(&event(Some(3.9), Some(NEARBY)), &policy()));
    }

    #[test]
    fn magnitude_monotonicity() {
        let p = policy();
        assert!(is_relevant(&event(Some(4.0), Some(NEARBY)), &p));
        assert!(is_relevant(&event(Some(5.5), Some(NEARBY)), &p));
        assert!(is_relevant(&event(Some(9.0), Some(NEARBY)), &p));
    }

    #[test]
    fn distance_cutoff_rejects_far_events() {
        // Tokyo is ~4600 km from Bangkok.
        let tokyo = Coordinates {
            lat: 35.6762,
            lon: 139.6503,
        };
        assert!(!is_relevant(&event(Some(7.0), Some(tokyo)), &policy()));
    }

    #[test]
    fn closer_is_never_worse() {
        let p = policy();
        let near = Coordinates {
            lat: 14.0,
            lon: 100.5,
        };
        assert!(is_relevant(&event(Some(4.5), Some(NEARBY)), &p));
        assert!(is_relevant(&event(Some(4.5), Some(near)), &p));
    }

    #[test]
    fn bbox_and_radius_are_conjunctive() {
        let mut p = policy();
        p.bounding_box = Some(BoundingBox {
            min_lat: 5.0,
            max_lat: 30.0,
            min_lon: 85.0,
            max_lon: 110.0,
        });
        // Inside box and inside radius.
        assert!(is_relevant(&event(Some(5.0), Some(NEARBY)), &p));
        // Inside radius but outside box.
        let south = Coordinates { lat: 2.0, lon: 100.0 };
        assert!(!is_relevant(&event(Some(5.0), Some(south)), &p));
    }

    #[test]
    fn missing_coordinates_follow_policy_flag() {
        let mut p = policy();
        assert!(!is_relevant(&event(Some(5.0), None), &p));
        p.allow_missing_coordinates = true;
        assert!(is_relevant(&event(Some(5.0), None), &p));
    }

    #[test]
    fn missing_coordinates_pass_when_unconstrained() {
        let mut p = policy();
        p.max_distance_km = None;
        p.bounding_box = None;
        assert!(is_relevant(&event(Some(5.0), None), &p));
    }
}
