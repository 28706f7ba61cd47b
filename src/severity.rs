//! severity.rs — keyword classification of warning titles.
//!
//! Best-effort heuristic against natural-language bulletin titles. The rule
//! list is ordered and order is behaviour: "Cancellation of Severe
//! Thunderstorm Warning" must classify as AllClear, not Major. Changing the
//! order or the terms is a semantic change, not a refactor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity tier of a warning bulletin, derived from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityTier {
    #[serde(rename = "All Clear")]
    AllClear,
    Deadly,
    Major,
    Minor,
    Default,
}

/// Ordered rule list; first matching rule wins.
const RULES: &[(&[&str], SeverityTier)] = &[
    (&["cancellation"], SeverityTier::AllClear),
    (&["tornado", "destructive"], SeverityTier::Deadly),
    (&["severe", "fire"], SeverityTier::Major),
    (&["strong wind", "hazardous surf"], SeverityTier::Minor),
];

/// Classify a warning title. Pure and total: unmatched titles fall through
/// to `Default`.
pub fn classify(title: &str) -> SeverityTier {
    let title_lower = title.to_lowercase();
    for (needles, tier) in RULES {
        if needles.iter().any(|n| title_lower.contains(n)) {
            return *tier;
        }
    }
    SeverityTier::Default
}

impl SeverityTier {
    /// Icon glyph shown by presentation boundaries.
    pub fn icon(&self) -> &'static str {
        match self {
            SeverityTier::AllClear => "\u{2705}",
            SeverityTier::Deadly => "\u{2620}\u{FE0F}",
            SeverityTier::Major => "\u{2757}",
            SeverityTier::Minor => "\u{26A0}\u{FE0F}",
            SeverityTier::Default => "\u{1F4E2}",
        }
    }

    /// Embed/banner colour as 0xRRGGBB.
    pub fn color(&self) -> u32 {
        match self {
            SeverityTier::AllClear => 0x00_80_00,  // green
            SeverityTier::Deadly => 0x00_00_00,    // black
            SeverityTier::Major => 0xFF_00_00,     // red
            SeverityTier::Minor => 0xFF_D7_00,     // gold
            SeverityTier::Default => 0xFF_8C_00,   // dark orange
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeverityTier::AllClear => "All Clear",
            SeverityTier::Deadly => "Deadly",
            SeverityTier::Major => "Major",
            SeverityTier::Minor => "Minor",
            SeverityTier::Default => "Default",
        };
        f.write_str(name)
    }
}
