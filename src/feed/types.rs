// src/feed/types.rs
use serde::{Deserialize, Serialize};

/// One concrete warning bulletin instance extracted from a feed document.
///
/// `identity` is the concatenation of the feed-issued identifier and the
/// issue timestamp. It is unique per real-world bulletin and is compared
/// only for equality, never parsed as a date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarningOccurrence {
    pub identity: String,
    pub title: String,
    pub message: String,
}
