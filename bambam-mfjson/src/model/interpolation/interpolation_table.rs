use std::collections::{BTreeMap, HashMap};

use super::Interpolation;
use crate::model::sample::property_names as names;

/// maps measure names to an interpolation mode. continuous physical
/// measures are linear; identifiers, categorical states and counters that
/// change in jumps are discrete.
#[derive(Clone, Debug)]
pub struct InterpolationTable {
    modes: HashMap<String, Interpolation>,
    fallback: Interpolation,
}

impl Default for InterpolationTable {
    fn default() -> Self {
        let linear = [names::BEARING, names::SPEED]
            .into_iter()
            .map(|n| (n.to_string(), Interpolation::Linear));
        let discrete = [
            names::CURRENT_STATUS,
            names::STOP_ID,
            names::CURRENT_STOP_SEQUENCE,
            names::OCCUPANCY_STATUS,
            names::OCCUPANCY_PERCENTAGE,
            names::CONGESTION_LEVEL,
            names::ODOMETER,
        ]
        .into_iter()
        .map(|n| (n.to_string(), Interpolation::Discrete));
        Self {
            modes: linear.chain(discrete).collect(),
            fallback: Interpolation::Discrete,
        }
    }
}

impl InterpolationTable {
    /// the default table with entries added or replaced by `overrides`
    pub fn with_overrides(overrides: &BTreeMap<String, Interpolation>) -> InterpolationTable {
        let mut table = InterpolationTable::default();
        for (name, mode) in overrides.iter() {
            table.modes.insert(name.clone(), *mode);
        }
        table
    }

    /// position is always interpolated linearly
    pub fn geometry(&self) -> Interpolation {
        Interpolation::Linear
    }

    /// the mode of a measure. names without an entry, such as carriage
    /// occupancy measures, fall back to discrete.
    pub fn classify(&self, measure: &str) -> Interpolation {
        self.modes.get(measure).copied().unwrap_or(self.fallback)
    }
}
