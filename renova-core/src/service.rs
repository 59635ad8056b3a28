//! Refresh-cycle orchestration: fetch, reduce, aggregate, format, reconcile.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::aggregate::{PickupAggregator, PickupMatch, days_until};
use crate::capability::{CapabilityDiff, reconcile};
use crate::model::{
    CalendarEntry, CategorySettings, ExposedCapabilitySet, FractionDefinition, ReducedCalendar,
    WasteCategory,
};
use crate::ports::{CalendarPort, FractionPort, PortError};
use crate::reduce::{MalformedDateError, ReducePolicy, reduce};
use crate::text::{Locale, format_countdown, format_pickup_date, join_category_names};

#[derive(Debug, Clone, Copy)]
/// Host-supplied inputs for one refresh cycle that do not come from the feed.
///
/// The engine never reads a wall clock; "today" and "tomorrow" are whatever
/// the host injects here.
pub struct RefreshContext {
    /// The injected "today"; all relative math keys off this day.
    pub reference_day: NaiveDate,
    /// The day probed for the "picked up tomorrow" facts.
    pub target_day: NaiveDate,
    /// Output language.
    pub locale: Locale,
    /// Past-date policy for the reducer.
    pub policy: ReducePolicy,
}

impl RefreshContext {
    /// Context for `reference_day` with the target set to the following day.
    #[must_use]
    pub fn for_day(reference_day: NaiveDate, locale: Locale) -> Self {
        Self {
            reference_day,
            // NaiveDate::MAX has no successor; fall back to the day itself.
            target_day: reference_day.succ_opt().unwrap_or(reference_day),
            locale,
            policy: ReducePolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
/// Outcome of one refresh cycle.
pub struct RefreshReport {
    /// Earliest date per fraction, as reduced from the feed.
    pub reduced: ReducedCalendar,
    /// Display line per enabled category with data, e.g. `"man. 28. jul."`.
    pub category_displays: BTreeMap<WasteCategory, String>,
    /// Aggregate countdown, `None` when no enabled category has data.
    pub countdown: Option<String>,
    /// Enabled categories picked up on the target day.
    pub target_day_pickups: Vec<PickupMatch>,
    /// Target-day flag per category; every category has an entry.
    pub target_day_flags: BTreeMap<WasteCategory, bool>,
    /// Joined fraction names for the target day, empty when none.
    pub target_day_summary: String,
    /// The new exposed set to carry into the next cycle.
    pub exposed: ExposedCapabilitySet,
    /// Membership changes against the previous exposed set.
    pub diff: CapabilityDiff,
}

/// Run the pure calendar-to-capability pipeline for one refresh.
///
/// Either a complete report is produced or an error is returned and the
/// caller keeps its previous state; there is no partial outcome. Re-running
/// with the same inputs (for instance after only a settings change, against
/// a cached feed) yields the same report.
///
/// # Errors
///
/// Returns [`MalformedDateError`] when the feed contains an unparsable date.
pub fn run_refresh(
    feed: &[CalendarEntry],
    fractions: &[FractionDefinition],
    settings: &CategorySettings,
    previous: &ExposedCapabilitySet,
    context: RefreshContext,
) -> Result<RefreshReport, MalformedDateError> {
    let reduced = reduce(feed, context.reference_day, context.policy)?;
    let aggregator = PickupAggregator::new(&reduced, fractions, settings);

    let mut category_displays = BTreeMap::new();
    for category in WasteCategory::ALL {
        if !settings.is_enabled(category) {
            continue;
        }
        if let Some(date) = aggregator.next_date_for(category) {
            category_displays.insert(category, format_pickup_date(date, context.locale));
        }
    }

    let countdown = aggregator.earliest_overall().map(|pickup| {
        format_countdown(
            days_until(pickup.date, context.reference_day),
            &pickup.fraction_name,
            context.locale,
        )
    });

    let target_day_pickups = aggregator.categories_on(context.target_day);
    let target_day_flags: BTreeMap<WasteCategory, bool> = WasteCategory::ALL
        .into_iter()
        .map(|category| {
            let picked_up = target_day_pickups
                .iter()
                .any(|pickup| pickup.category == category);
            (category, picked_up)
        })
        .collect();
    let target_day_names: Vec<String> = target_day_pickups
        .iter()
        .map(|pickup| pickup.fraction_name.clone())
        .collect();
    let target_day_summary = join_category_names(&target_day_names, context.locale);

    let (exposed, diff) = reconcile(previous, &reduced, fractions, settings);

    tracing::debug!(
        fractions = reduced.len(),
        exposed = exposed.len(),
        added = diff.to_add.len(),
        removed = diff.to_remove.len(),
        "refresh pipeline complete"
    );

    Ok(RefreshReport {
        reduced,
        category_displays,
        countdown,
        target_day_pickups,
        target_day_flags,
        target_day_summary,
        exposed,
        diff,
    })
}

#[derive(thiserror::Error, Debug)]
/// Why a refresh cycle produced no report.
pub enum RefreshError {
    /// A feed port failed.
    #[error(transparent)]
    Port(#[from] PortError),
    /// The feed contained an unparsable date.
    #[error(transparent)]
    MalformedDate(#[from] MalformedDateError),
}

/// Public entry point combining the feed ports with the pure pipeline.
pub struct RenovaService {
    fraction_port: Arc<dyn FractionPort>,
    calendar_port: Arc<dyn CalendarPort>,
}

impl RenovaService {
    /// Create a new service bound to the provided feed ports.
    #[must_use]
    pub fn new(fraction_port: Arc<dyn FractionPort>, calendar_port: Arc<dyn CalendarPort>) -> Self {
        Self {
            fraction_port,
            calendar_port,
        }
    }

    /// Fetch both feeds and run one full refresh cycle.
    ///
    /// A failed fetch or a malformed feed returns an error without touching
    /// `previous`; cancellation mid-fetch has the same effect since nothing
    /// is applied until the report exists.
    ///
    /// # Errors
    ///
    /// Returns a [`RefreshError`] when a port call fails or the feed
    /// contains an unparsable date.
    pub async fn refresh(
        &self,
        settings: &CategorySettings,
        previous: &ExposedCapabilitySet,
        context: RefreshContext,
    ) -> Result<RefreshReport, RefreshError> {
        let fractions = self.fraction_port.fractions().await?;
        let feed = self.calendar_port.calendar().await?;
        tracing::debug!(
            fractions = fractions.len(),
            entries = feed.len(),
            "feed fetched"
        );

        let report = run_refresh(&feed, &fractions, settings, previous, context)?;
        tracing::info!(
            exposed = report.exposed.len(),
            countdown = report.countdown.as_deref().unwrap_or("-"),
            "refresh cycle complete"
        );
        Ok(report)
    }
}
