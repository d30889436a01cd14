//! Tier display names and tier ordering.

use std::cmp::Ordering;

/// Internal tier codes that are renamed before they reach a client.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("Currrent_King", "current_king"),
    ("Zate_Keeper", "gatekeeper"),
];

/// Map a stored tier code to its public-facing name.
///
/// Codes without an entry in the lookup table pass through unchanged, so
/// the mapping is total and applying it twice is the same as applying it once.
pub fn display_tier(raw: &str) -> &str {
    DISPLAY_NAMES
        .iter()
        .find(|(code, _)| *code == raw)
        .map(|(_, display)| *display)
        .unwrap_or(raw)
}

/// How tiers are ordered when rankings are rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TierOrder {
    /// Byte order of the raw tier string. Matches the historical `ORDER BY tier`.
    #[default]
    Lexical,

    /// Explicit rank list, highest tier first. Unlisted tiers sort after every
    /// listed tier, lexically among themselves.
    Ranked(Vec<String>),
}

impl TierOrder {
    /// Build an order from a configured tier list. An empty list means lexical.
    pub fn from_list(tiers: &[String]) -> Self {
        if tiers.is_empty() {
            TierOrder::Lexical
        } else {
            TierOrder::Ranked(tiers.to_vec())
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, TierOrder::Lexical)
    }

    /// Compare two raw tier codes.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            TierOrder::Lexical => a.cmp(b),
            TierOrder::Ranked(ranks) => {
                let pos = |t: &str| ranks.iter().position(|r| r == t).unwrap_or(usize::MAX);
                pos(a).cmp(&pos(b)).then_with(|| a.cmp(b))
            }
        }
    }
}
