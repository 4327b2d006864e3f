//! Aggregation System
//!
//! Population tallies after each commit, and the final attack rate.

use bevy_ecs::prelude::*;
use epi_events::TickCounts;
use tracing::trace;

use super::SimClock;
use crate::components::{EpidemicState, NetworkStore, OpinionState};

/// Resource: per-tick counts, tick 0 first
#[derive(Resource, Debug, Default)]
pub struct History {
    records: Vec<TickCounts>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, counts: TickCounts) {
        self.records.push(counts);
    }

    pub fn last(&self) -> Option<&TickCounts> {
        self.records.last()
    }

    pub fn records(&self) -> &[TickCounts] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Counts every compartment and opinion class in the committed snapshot.
pub fn count_population(store: &NetworkStore, tick: u64) -> TickCounts {
    let current = store.current();
    let mut counts = TickCounts::new(tick);
    for &state in current.epidemic_states() {
        match state {
            EpidemicState::Susceptible => counts.susceptible += 1,
            EpidemicState::Infectious => counts.infectious += 1,
            EpidemicState::Recovered => counts.recovered += 1,
            EpidemicState::Vaccinated => counts.vaccinated += 1,
        }
    }
    for &opinion in current.opinions() {
        match opinion {
            OpinionState::ProVax => counts.pro_vax += 1,
            OpinionState::NoVax => counts.no_vax += 1,
            OpinionState::Neutral => counts.neutral += 1,
        }
    }
    counts.information_edges = store.information().edge_count();
    counts
}

/// Fraction of the population infected at least once.
pub fn attack_rate(store: &NetworkStore) -> f64 {
    let population = store.population();
    if population == 0 {
        return 0.0;
    }
    store.current().total_infected() as f64 / population as f64
}

/// System: record the counts of the tick just committed
pub fn tally_counts(clock: Res<SimClock>, store: Res<NetworkStore>, mut history: ResMut<History>) {
    let counts = count_population(&store, clock.tick);
    trace!(
        tick = counts.tick,
        s = counts.susceptible,
        i = counts.infectious,
        r = counts.recovered,
        v = counts.vaccinated,
        pro_vax = counts.pro_vax,
        no_vax = counts.no_vax,
        "tick committed"
    );
    history.push(counts);
}
