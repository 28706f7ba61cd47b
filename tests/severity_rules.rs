// tests/severity_rules.rs
use wxwatch::{classify, SeverityTier};

#[test]
fn real_bulletin_titles_classify_as_expected() {
    let cases = [
        ("Severe Thunderstorm Warning", SeverityTier::Major),
        ("Severe Weather Warning for damaging winds", SeverityTier::Major),
        ("Fire Weather Warning", SeverityTier::Major),
        ("Tornado Warning", SeverityTier::Deadly),
        (
            "Severe Thunderstorm Warning for destructive winds",
            SeverityTier::Deadly,
        ),
        ("Strong Wind Warning for coastal waters", SeverityTier::Minor),
        ("Hazardous Surf Warning", SeverityTier::Minor),
        ("Flood Watch for the Western Rivers", SeverityTier::Default),
        (
            "Cancellation of Severe Weather Warning",
            SeverityTier::AllClear,
        ),
    ];
    for (title, want) in cases {
        assert_eq!(classify(title), want, "title: {title}");
    }
}

#[test]
fn cancellation_takes_priority_regardless_of_other_keywords() {
    // Rule order is a hard requirement: the cancellation rule is evaluated
    // first, so any other matched keyword in the title is irrelevant.
    for title in [
        "Cancellation of Tornado Warning",
        "CANCELLATION of Severe Thunderstorm Warning",
        "Cancellation of Fire Weather Warning and Strong Wind Warning",
    ] {
        assert_eq!(classify(title), SeverityTier::AllClear, "title: {title}");
    }
}
