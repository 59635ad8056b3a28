//! Reconciliation of the exposed capability set after a refresh.

use crate::aggregate::PickupAggregator;
use crate::model::{
    Capability, CategorySettings, ExposedCapabilitySet, FractionDefinition, ReducedCalendar,
    WasteCategory,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Membership changes between the previous and the freshly derived set.
///
/// `to_update` lists retained capabilities; their displayed values may have
/// changed even though membership did not, so consumers always recompute
/// them.
pub struct CapabilityDiff {
    /// Capabilities newly exposed this refresh.
    pub to_add: Vec<Capability>,
    /// Capabilities whose data disappeared or whose category was disabled.
    pub to_remove: Vec<Capability>,
    /// Capabilities retained from the previous set.
    pub to_update: Vec<Capability>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A single step when applying a [`CapabilityDiff`] in order.
pub enum CapabilityOp {
    /// Expose the capability.
    Add(Capability),
    /// Withdraw the capability.
    Remove(Capability),
    /// Recompute the exposed value in place.
    Update(Capability),
}

impl CapabilityDiff {
    /// Lower the diff to an ordered instruction stream.
    ///
    /// Removals come first. The summary capability is never updated in
    /// place: when retained it is withdrawn and re-added as the final two
    /// steps, so ordering-sensitive consumers always see it last. This is a
    /// deliberate ordering contract, not an optimization.
    #[must_use]
    pub fn into_ops(self) -> Vec<CapabilityOp> {
        let mut ops = Vec::new();
        let mut cycle_summary = false;
        let mut add_summary = false;

        for capability in self.to_remove {
            ops.push(CapabilityOp::Remove(capability));
        }
        for capability in self.to_update {
            if capability == Capability::NextPickupSummary {
                cycle_summary = true;
            } else {
                ops.push(CapabilityOp::Update(capability));
            }
        }
        for capability in self.to_add {
            if capability == Capability::NextPickupSummary {
                add_summary = true;
            } else {
                ops.push(CapabilityOp::Add(capability));
            }
        }

        if cycle_summary {
            ops.push(CapabilityOp::Remove(Capability::NextPickupSummary));
        }
        if cycle_summary || add_summary {
            ops.push(CapabilityOp::Add(Capability::NextPickupSummary));
        }

        ops
    }
}

/// Derive the new exposed set and the membership diff against `previous`.
///
/// A category belongs in the new set iff the reduced calendar resolves a
/// date for it and its setting is not `false`; the summary belongs iff any
/// enabled category has data. Applying the returned set as the next
/// `previous` makes the operation converge: a second call with identical
/// inputs yields empty `to_add` and `to_remove`.
#[must_use]
pub fn reconcile(
    previous: &ExposedCapabilitySet,
    reduced: &ReducedCalendar,
    fractions: &[FractionDefinition],
    settings: &CategorySettings,
) -> (ExposedCapabilitySet, CapabilityDiff) {
    let aggregator = PickupAggregator::new(reduced, fractions, settings);

    let mut next = ExposedCapabilitySet::new();
    for category in WasteCategory::ALL {
        if settings.is_enabled(category) && aggregator.next_date_for(category).is_some() {
            next.insert(Capability::Waste(category));
        }
    }
    if aggregator.earliest_overall().is_some() {
        next.insert(Capability::NextPickupSummary);
    }

    let mut diff = CapabilityDiff::default();
    for capability in previous.iter() {
        if !next.contains(capability) {
            diff.to_remove.push(capability);
        }
    }
    for capability in next.iter() {
        if previous.contains(capability) {
            diff.to_update.push(capability);
        } else {
            diff.to_add.push(capability);
        }
    }

    (next, diff)
}
