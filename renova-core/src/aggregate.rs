//! Joins between the reduced calendar, fraction metadata, and user settings.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::NaiveDate;

use crate::classify::classify;
use crate::model::{
    CategorySettings, FractionDefinition, FractionId, ReducedCalendar, WasteCategory,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of the earliest-overall query.
pub struct NextPickup {
    /// Day of the pickup.
    pub date: NaiveDate,
    /// Representative category; when several categories tie on the date this
    /// is the one declared first in [`WasteCategory::ALL`].
    pub category: WasteCategory,
    /// Name of the fraction carrying the category's earliest date.
    pub fraction_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One enabled category picked up on a queried day.
pub struct PickupMatch {
    /// The category.
    pub category: WasteCategory,
    /// Name of the fraction carrying the date.
    pub fraction_name: String,
}

#[derive(Debug, Clone)]
struct CategoryPickup {
    date: NaiveDate,
    fraction_id: FractionId,
    fraction_name: String,
}

#[derive(Debug)]
/// Pure view over one refresh worth of data.
///
/// Fractions are classified once at construction and merged per category
/// (earliest date wins); every query below is a lookup. Disabled categories
/// stay resolvable through [`PickupAggregator::next_date_for`] so they can be
/// inspected without mutating any exposed state, but they are excluded from
/// the aggregate queries.
pub struct PickupAggregator<'settings> {
    settings: &'settings CategorySettings,
    by_category: BTreeMap<WasteCategory, CategoryPickup>,
}

impl<'settings> PickupAggregator<'settings> {
    /// Build the category view for one reduced calendar.
    ///
    /// Fractions that classify to no category are skipped, as are fractions
    /// without a date in `reduced`. When several fractions share a category,
    /// the one with the earliest date wins; equal dates fall back to the
    /// lower fraction id so the result does not depend on input order.
    #[must_use]
    pub fn new(
        reduced: &ReducedCalendar,
        fractions: &[FractionDefinition],
        settings: &'settings CategorySettings,
    ) -> Self {
        let mut by_category = BTreeMap::new();

        for fraction in fractions {
            let Some(category) = classify(&fraction.name) else {
                continue;
            };
            let Some(&date) = reduced.get(&fraction.id) else {
                continue;
            };

            let candidate = CategoryPickup {
                date,
                fraction_id: fraction.id,
                fraction_name: fraction.name.clone(),
            };

            match by_category.entry(category) {
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
                Entry::Occupied(mut slot) => {
                    let current = slot.get();
                    if (candidate.date, candidate.fraction_id)
                        < (current.date, current.fraction_id)
                    {
                        slot.insert(candidate);
                    }
                }
            }
        }

        Self {
            settings,
            by_category,
        }
    }

    /// Next pickup date for a category, or `None` when it has no data.
    ///
    /// Answers for disabled categories too; disabling only hides a category
    /// from the aggregate queries.
    #[must_use]
    pub fn next_date_for(&self, category: WasteCategory) -> Option<NaiveDate> {
        self.by_category.get(&category).map(|pickup| pickup.date)
    }

    /// Earliest pickup across all enabled categories with data.
    ///
    /// Ties on the date resolve to the category declared first in
    /// [`WasteCategory::ALL`]; the full tied set remains visible through
    /// [`PickupAggregator::categories_on`] at that date.
    #[must_use]
    pub fn earliest_overall(&self) -> Option<NextPickup> {
        let mut best: Option<(WasteCategory, &CategoryPickup)> = None;

        for category in WasteCategory::ALL {
            if !self.settings.is_enabled(category) {
                continue;
            }
            let Some(pickup) = self.by_category.get(&category) else {
                continue;
            };
            let earlier = match &best {
                None => true,
                Some((_, current)) => pickup.date < current.date,
            };
            if earlier {
                best = Some((category, pickup));
            }
        }

        best.map(|(category, pickup)| NextPickup {
            date: pickup.date,
            category,
            fraction_name: pickup.fraction_name.clone(),
        })
    }

    /// All enabled categories whose next pickup falls on `target_day`.
    #[must_use]
    pub fn categories_on(&self, target_day: NaiveDate) -> Vec<PickupMatch> {
        WasteCategory::ALL
            .into_iter()
            .filter(|&category| self.settings.is_enabled(category))
            .filter_map(|category| {
                self.by_category
                    .get(&category)
                    .filter(|pickup| pickup.date == target_day)
                    .map(|pickup| PickupMatch {
                        category,
                        fraction_name: pickup.fraction_name.clone(),
                    })
            })
            .collect()
    }
}

/// Whole days from `reference_day` to `date`.
///
/// Zero means the pickup is on the reference day itself; a negative count
/// means the date already passed, which callers must surface as "overdue"
/// (only reachable under [`crate::ReducePolicy::IncludePast`]).
#[must_use]
pub fn days_until(date: NaiveDate, reference_day: NaiveDate) -> i64 {
    (date - reference_day).num_days()
}
