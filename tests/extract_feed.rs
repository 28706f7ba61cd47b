// tests/extract_feed.rs
use wxwatch::feed::extract;

const FEED: &str = include_str!("fixtures/warning_feed.xml");
const CANCELLATION: &str = include_str!("fixtures/warning_cancellation.xml");

#[test]
fn full_product_document_extracts_for_a_listed_town() {
    let occ = extract(FEED.as_bytes(), "Ipswich").unwrap().unwrap();
    assert_eq!(occ.identity, "IDQ210372025-11-03T04:30:00Z");
    assert_eq!(occ.title, "Severe Thunderstorm Warning");
    assert_eq!(
        occ.message,
        "For DAMAGING WINDS and LARGE HAILSTONES.\n\nA surface trough over the southeast interior is triggering severe thunderstorms ahead of a cold front."
    );
}

#[test]
fn identity_is_identifier_then_issue_time_concatenated() {
    let occ = extract(CANCELLATION.as_bytes(), "Logan").unwrap().unwrap();
    assert_eq!(occ.identity, "IDQ210372025-11-03T06:10:00Z");
}

#[test]
fn unlisted_town_yields_none_even_with_an_active_warning() {
    // A warning is active for the region but the configured town is not in
    // the area summary: quiet, not an error.
    assert!(extract(FEED.as_bytes(), "Toowoomba").unwrap().is_none());
}

#[test]
fn extra_sections_and_metadata_are_ignored() {
    // warning_advice, forecast-district, local issue times: not addressed,
    // must not disturb extraction.
    let occ = extract(FEED.as_bytes(), "redland").unwrap().unwrap();
    assert!(!occ.message.contains("Move your car"));
}

#[test]
fn non_xml_garbage_is_rejected() {
    assert!(extract(b"<product><amoc><iden", "Ipswich").is_err());
}
