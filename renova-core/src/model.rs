//! Domain data structures for fractions, waste categories, and capabilities.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Numeric identifier of a municipality-defined waste stream.
pub struct FractionId(pub i64);

impl fmt::Display for FractionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A waste stream as announced by the municipality.
///
/// The full set is replaced wholesale on every refresh; there are no
/// incremental fraction updates.
pub struct FractionDefinition {
    /// Identifier used as the join key into the calendar feed.
    pub id: FractionId,
    /// Free-text name, e.g. "Restavfall". Classification keys off this.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Raw calendar record for one fraction: all announced pickup dates.
pub struct CalendarEntry {
    /// Fraction the dates belong to.
    pub fraction_id: FractionId,
    /// ISO-like date strings, in no guaranteed order and possibly duplicated.
    pub pickup_dates: Vec<String>,
}

/// Earliest pickup date per fraction, rebuilt in full on every refresh.
///
/// A fraction absent from the feed (or whose dates were all discarded by the
/// reduction policy) is absent here, never nulled.
pub type ReducedCalendar = BTreeMap<FractionId, NaiveDate>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Canonical waste buckets a fraction can classify into.
///
/// Declaration order is significant: it is the tie-break order used when
/// several categories share the earliest pickup date.
pub enum WasteCategory {
    /// Residual waste.
    General,
    /// Paper and cardboard.
    Paper,
    /// Glass, often combined with metal packaging.
    Glass,
    /// Plastic packaging.
    Plastic,
    /// Food and other organic waste.
    Bio,
    /// Garden waste.
    Garden,
    /// Textiles.
    Clothes,
    /// Electrical appliances and hazardous waste.
    Electrical,
    /// Special waste.
    Special,
}

impl WasteCategory {
    /// All categories, in tie-break order.
    pub const ALL: [WasteCategory; 9] = [
        WasteCategory::General,
        WasteCategory::Paper,
        WasteCategory::Glass,
        WasteCategory::Plastic,
        WasteCategory::Bio,
        WasteCategory::Garden,
        WasteCategory::Clothes,
        WasteCategory::Electrical,
        WasteCategory::Special,
    ];

    /// Stable key used in settings and capability identifiers.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            WasteCategory::General => "general",
            WasteCategory::Paper => "paper",
            WasteCategory::Glass => "glass",
            WasteCategory::Plastic => "plastic",
            WasteCategory::Bio => "bio",
            WasteCategory::Garden => "garden",
            WasteCategory::Clothes => "clothes",
            WasteCategory::Electrical => "electrical",
            WasteCategory::Special => "special",
        }
    }
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Per-category enabled/disabled switches.
///
/// A category with no explicit entry is enabled.
pub struct CategorySettings(BTreeMap<WasteCategory, bool>);

impl CategorySettings {
    /// Settings with every category enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit switch for a category.
    pub fn set(&mut self, category: WasteCategory, enabled: bool) {
        self.0.insert(category, enabled);
    }

    /// Whether a category should surface in aggregate output.
    #[must_use]
    pub fn is_enabled(&self, category: WasteCategory) -> bool {
        self.0.get(&category).copied().unwrap_or(true)
    }
}

impl FromIterator<(WasteCategory, bool)> for CategorySettings {
    fn from_iter<I: IntoIterator<Item = (WasteCategory, bool)>>(entries: I) -> Self {
        Self(entries.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// An exposed, user-facing data slot.
///
/// `Waste` variants sort before the summary, so an ordered walk over a set
/// of capabilities always visits the summary last.
pub enum Capability {
    /// Next-pickup slot for one waste category.
    Waste(WasteCategory),
    /// Aggregate countdown to the next pickup of any enabled category.
    NextPickupSummary,
}

impl fmt::Display for Capability {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Waste(category) => write!(formatter, "waste_{category}"),
            Capability::NextPickupSummary => write!(formatter, "next_pickup_days"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// The set of capabilities currently exposed to the host.
///
/// This is the only state that spans refresh cycles. It is owned by the host
/// and passed into reconciliation by reference; the engine never mutates it
/// in place.
pub struct ExposedCapabilitySet(BTreeSet<Capability>);

impl ExposedCapabilitySet {
    /// The empty set every tracked address starts with.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the capability is currently exposed.
    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Expose a capability.
    pub fn insert(&mut self, capability: Capability) {
        self.0.insert(capability);
    }

    /// Withdraw a capability.
    pub fn remove(&mut self, capability: Capability) {
        self.0.remove(&capability);
    }

    /// Exposed capabilities in order, summary last.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// Number of exposed capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is exposed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for ExposedCapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(capabilities: I) -> Self {
        Self(capabilities.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_enabled() {
        let mut settings = CategorySettings::new();
        assert!(settings.is_enabled(WasteCategory::Garden), "absent entry must mean enabled");

        settings.set(WasteCategory::Garden, false);
        assert!(!settings.is_enabled(WasteCategory::Garden), "explicit false must disable");
    }

    #[test]
    fn capability_ordering_puts_summary_last() {
        let set: ExposedCapabilitySet = [
            Capability::NextPickupSummary,
            Capability::Waste(WasteCategory::Special),
            Capability::Waste(WasteCategory::General),
        ]
        .into_iter()
        .collect();

        let last = set.iter().last();
        assert_eq!(last, Some(Capability::NextPickupSummary), "summary must sort last");
    }

    #[test]
    fn capability_ids_match_settings_keys() {
        assert_eq!(Capability::Waste(WasteCategory::General).to_string(), "waste_general");
        assert_eq!(Capability::NextPickupSummary.to_string(), "next_pickup_days");
    }
}
