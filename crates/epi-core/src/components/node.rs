//! Node Components
//!
//! Per-node epidemic and opinion state, held as parallel arrays indexed by node id.

use serde::{Deserialize, Serialize};

/// Disease compartment of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EpidemicState {
    #[default]
    Susceptible,
    Infectious,
    Recovered,
    Vaccinated,
}

/// Vaccination opinion of a node
///
/// `Neutral` only occurs under the three-state opinion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OpinionState {
    Neutral,
    #[default]
    ProVax,
    NoVax,
}

impl OpinionState {
    /// True for a pro-vax / no-vax pair, in either order.
    pub fn disagrees_with(self, other: OpinionState) -> bool {
        matches!(
            (self, other),
            (OpinionState::ProVax, OpinionState::NoVax) | (OpinionState::NoVax, OpinionState::ProVax)
        )
    }
}

/// State of every node at one point in time
///
/// `ever_infected` can only be raised: `set_epidemic` flips it on the first
/// transition into `Infectious` and nothing clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeStates {
    epidemic: Vec<EpidemicState>,
    opinion: Vec<OpinionState>,
    ever_infected: Vec<bool>,
}

impl NodeStates {
    /// All nodes susceptible, holding `opinion`.
    pub fn new(nodes: usize, opinion: OpinionState) -> Self {
        Self {
            epidemic: vec![EpidemicState::Susceptible; nodes],
            opinion: vec![opinion; nodes],
            ever_infected: vec![false; nodes],
        }
    }

    pub fn len(&self) -> usize {
        self.epidemic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epidemic.is_empty()
    }

    pub fn epidemic(&self, node: usize) -> EpidemicState {
        self.epidemic[node]
    }

    pub fn opinion(&self, node: usize) -> OpinionState {
        self.opinion[node]
    }

    pub fn ever_infected(&self, node: usize) -> bool {
        self.ever_infected[node]
    }

    pub fn epidemic_states(&self) -> &[EpidemicState] {
        &self.epidemic
    }

    pub fn opinions(&self) -> &[OpinionState] {
        &self.opinion
    }

    pub fn ever_infected_flags(&self) -> &[bool] {
        &self.ever_infected
    }

    pub fn set_epidemic(&mut self, node: usize, state: EpidemicState) {
        self.epidemic[node] = state;
        if state == EpidemicState::Infectious {
            self.ever_infected[node] = true;
        }
    }

    pub fn set_opinion(&mut self, node: usize, opinion: OpinionState) {
        self.opinion[node] = opinion;
    }

    /// Number of nodes infected at least once.
    pub fn total_infected(&self) -> usize {
        self.ever_infected.iter().filter(|&&flag| flag).count()
    }
}
