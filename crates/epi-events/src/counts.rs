//! Per-Tick Counts
//!
//! Population tallies recorded after every committed tick.

use serde::{Deserialize, Serialize};

/// Population counts for one tick.
///
/// The epidemic fields partition the population, as do the opinion fields.
/// `neutral` stays zero under the two-state opinion model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickCounts {
    pub tick: u64,
    pub susceptible: usize,
    pub infectious: usize,
    pub recovered: usize,
    pub vaccinated: usize,
    pub pro_vax: usize,
    pub no_vax: usize,
    #[serde(default)]
    pub neutral: usize,
    /// Edge count of the information network after the tick
    pub information_edges: usize,
}

impl TickCounts {
    /// Creates an empty tally for the given tick.
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    /// Sum over the epidemic compartments.
    pub fn epidemic_total(&self) -> usize {
        self.susceptible + self.infectious + self.recovered + self.vaccinated
    }

    /// Sum over the opinion classes.
    pub fn opinion_total(&self) -> usize {
        self.pro_vax + self.no_vax + self.neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let counts = TickCounts {
            tick: 3,
            susceptible: 5,
            infectious: 2,
            recovered: 1,
            vaccinated: 2,
            pro_vax: 6,
            no_vax: 3,
            neutral: 1,
            information_edges: 12,
        };

        assert_eq!(counts.epidemic_total(), 10);
        assert_eq!(counts.opinion_total(), 10);
    }

    #[test]
    fn test_missing_neutral_defaults_to_zero() {
        let json = r#"{"tick":1,"susceptible":4,"infectious":1,"recovered":0,"vaccinated":0,"pro_vax":3,"no_vax":2,"information_edges":5}"#;
        let counts: TickCounts = serde_json::from_str(json).unwrap();

        assert_eq!(counts.neutral, 0);
        assert_eq!(counts.opinion_total(), 5);
    }
}
