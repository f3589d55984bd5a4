// tests/providers_seismic_portal.rs
use quake_sentinel::ingest::providers::seismic_portal::SeismicPortalProvider;
use quake_sentinel::ingest::types::SourceProvider;

#[tokio::test]
async fn fixture_parses_all_features() {
    let json = include_str!("fixtures/seismic_portal.json");
    let provider = SeismicPortalProvider::from_fixture_str(json);
    let records = provider.fetch_latest().await.unwrap();
    assert_eq!(records.len(), 3);

    let first = &records[0];
    assert_eq!(first.source_id.as_deref(), Some("1785674"));
    assert_eq!(first.magnitude, Some(7.7));
    assert_eq!(first.lat, Some(21.99));
    assert_eq!(first.lon, Some(96.07));
    assert_eq!(first.region.as_deref(), Some("MYANMAR"));
    assert_eq!(first.timestamp.as_deref(), Some("2025-03-28T06:20:52.0Z"));
}

#[tokio::test]
async fn null_magnitude_survives_as_absent() {
    let json = include_str!("fixtures/seismic_portal.json");
    let records = SeismicPortalProvider::parse_records_from_str(json).unwrap();
    assert_eq!(records[2].magnitude, None);
    assert_eq!(records[2].source_id.as_deref(), Some("1785730"));
}

#[test]
fn malformed_body_is_a_fetch_error() {
    let err = SeismicPortalProvider::parse_records_from_str("<html>maintenance</html>");
    assert!(err.is_err());
}

#[test]
fn empty_collection_is_fine() {
    let records =
        SeismicPortalProvider::parse_records_from_str(r#"{"type":"FeatureCollection"}"#).unwrap();
    assert!(records.is_empty());
}
