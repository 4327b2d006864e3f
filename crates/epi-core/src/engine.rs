//! Step Coordinator
//!
//! Owns one run: a bevy `World` holding the store, settings, RNG and
//! history, and a chained `Schedule` that executes one synchronous tick.
//!
//! ```text
//! Running ──step──▶ Running ──step──▶ … ──(no infectious)──▶ Terminated
//! ```

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use epi_events::{Edge, RunRecord, RunSummary, TickCounts};
use thiserror::Error;
use tracing::{debug, warn};

use crate::components::{ContactNetwork, EpidemicState, Graph, NetworkStore, NodeStates, OpinionState};
use crate::config::{ConfigError, ModelOptions, ModelParams, OpinionModel, RunOptions};
use crate::setup::SetupError;
use crate::systems::{
    attack_rate, commit_node_states, compute_epidemic_transitions, compute_opinion_transitions,
    count_population, rewire_information_network, tally_counts, History, RewireCount,
    RunSettings, SimClock,
};
use crate::SimRng;

/// Errors that can occur while building or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("setup error: {0}")]
    Setup(#[from] SetupError),
    #[error("did not converge within {max_ticks} ticks ({infectious} still infectious)")]
    DidNotConverge { max_ticks: u64, infectious: usize },
}

/// Graphs and seed sets a run starts from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    pub population: usize,
    pub physical_edges: Vec<Edge>,
    pub information_edges: Vec<Edge>,
    pub initial_infecteds: Vec<usize>,
    pub initial_no_vax: Vec<usize>,
    /// Only read under the three-state model; everyone else starts neutral there
    pub initial_pro_vax: Vec<usize>,
}

impl Scenario {
    /// Both networks share the same edge list.
    pub fn mirrored(population: usize, edges: Vec<Edge>) -> Self {
        Self {
            population,
            information_edges: edges.clone(),
            physical_edges: edges,
            ..Self::default()
        }
    }

    pub fn with_infecteds(mut self, nodes: impl IntoIterator<Item = usize>) -> Self {
        self.initial_infecteds = nodes.into_iter().collect();
        self
    }

    pub fn with_no_vax(mut self, nodes: impl IntoIterator<Item = usize>) -> Self {
        self.initial_no_vax = nodes.into_iter().collect();
        self
    }

    pub fn with_pro_vax(mut self, nodes: impl IntoIterator<Item = usize>) -> Self {
        self.initial_pro_vax = nodes.into_iter().collect();
        self
    }

    fn check_seeds(&self, set: &'static str, nodes: &[usize]) -> Result<(), ConfigError> {
        match nodes.iter().find(|&&node| node >= self.population) {
            Some(&node) => Err(ConfigError::SeedOutOfRange {
                set,
                node,
                population: self.population,
            }),
            None => Ok(()),
        }
    }

    /// Initial node states; validates every seed id.
    fn initial_states(&self, model: OpinionModel) -> Result<NodeStates, ConfigError> {
        self.check_seeds("initial_infecteds", &self.initial_infecteds)?;
        self.check_seeds("initial_no_vax", &self.initial_no_vax)?;
        self.check_seeds("initial_pro_vax", &self.initial_pro_vax)?;

        let baseline = match model {
            OpinionModel::TwoState => OpinionState::ProVax,
            OpinionModel::ThreeState => OpinionState::Neutral,
        };
        let mut states = NodeStates::new(self.population, baseline);
        if model == OpinionModel::ThreeState {
            for &node in &self.initial_pro_vax {
                states.set_opinion(node, OpinionState::ProVax);
            }
        }
        for &node in &self.initial_no_vax {
            if model == OpinionModel::ThreeState && states.opinion(node) == OpinionState::ProVax {
                return Err(ConfigError::OverlappingSeeds { node });
            }
            states.set_opinion(node, OpinionState::NoVax);
        }
        for &node in &self.initial_infecteds {
            states.set_epidemic(node, EpidemicState::Infectious);
        }
        Ok(states)
    }
}

/// Result of a single `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Terminated,
}

/// One simulation run
pub struct Simulation {
    world: World,
    schedule: Schedule,
    seed: u64,
    max_ticks: u64,
    terminated: bool,
}

impl Simulation {
    /// Validates inputs and builds the run. Tick 0 is recorded immediately.
    pub fn new(
        scenario: &Scenario,
        params: ModelParams,
        model: ModelOptions,
        run: RunOptions,
    ) -> Result<Self, SimError> {
        params.validate()?;
        run.validate()?;
        if scenario.population == 0 {
            return Err(ConfigError::EmptyPopulation.into());
        }

        let physical = Graph::from_edges(scenario.population, &scenario.physical_edges).map_err(
            |source| ConfigError::Graph {
                network: "physical",
                source,
            },
        )?;
        let information = Graph::from_edges(scenario.population, &scenario.information_edges)
            .map_err(|source| ConfigError::Graph {
                network: "information",
                source,
            })?;
        let initial = scenario.initial_states(model.opinion_model)?;
        let store = NetworkStore::new(ContactNetwork::new(physical), information, initial);

        let mut history = History::new();
        history.push(count_population(&store, 0));

        let mut world = World::new();
        world.insert_resource(store);
        world.insert_resource(history);
        world.insert_resource(RunSettings { params, model });
        world.insert_resource(SimClock::default());
        world.insert_resource(RewireCount::default());
        world.insert_resource(SimRng::seeded(run.seed));

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                rewire_information_network,
                compute_epidemic_transitions,
                compute_opinion_transitions,
                commit_node_states,
                tally_counts,
            )
                .chain(),
        );

        debug!(
            population = scenario.population,
            physical_edges = scenario.physical_edges.len(),
            infecteds = scenario.initial_infecteds.len(),
            no_vax = scenario.initial_no_vax.len(),
            rewiring = model.rewiring,
            seed = run.seed,
            "simulation initialized"
        );

        Ok(Self {
            world,
            schedule,
            seed: run.seed,
            max_ticks: run.max_ticks,
            terminated: false,
        })
    }

    /// Advances one tick. A terminated run stays frozen.
    pub fn step(&mut self) -> Result<StepOutcome, SimError> {
        if self.terminated {
            return Ok(StepOutcome::Terminated);
        }
        let tick = self.tick() + 1;
        if tick > self.max_ticks {
            let infectious = self.history().last().map_or(0, |c| c.infectious);
            warn!(max_ticks = self.max_ticks, infectious, "tick cap reached");
            return Err(SimError::DidNotConverge {
                max_ticks: self.max_ticks,
                infectious,
            });
        }

        self.world.resource_mut::<SimClock>().tick = tick;
        self.schedule.run(&mut self.world);

        let infectious = self.history().last().map_or(0, |c| c.infectious);
        if infectious == 0 {
            self.terminated = true;
            debug!(
                ticks = tick,
                attack_rate = attack_rate(self.store()),
                "epidemic over"
            );
            return Ok(StepOutcome::Terminated);
        }
        Ok(StepOutcome::Continue)
    }

    /// Steps until no infectious nodes remain.
    pub fn run(&mut self) -> Result<RunRecord, SimError> {
        while self.step()? == StepOutcome::Continue {}
        Ok(self.record())
    }

    /// Index of the last committed tick.
    pub fn tick(&self) -> u64 {
        self.world.resource::<SimClock>().tick
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn store(&self) -> &NetworkStore {
        self.world.resource::<NetworkStore>()
    }

    pub fn history(&self) -> &[TickCounts] {
        self.world.resource::<History>().records()
    }

    pub fn attack_rate(&self) -> f64 {
        attack_rate(self.store())
    }

    /// Snapshot of the run so far as a serializable record.
    pub fn record(&self) -> RunRecord {
        let store = self.store();
        RunRecord {
            summary: RunSummary {
                seed: self.seed,
                population: store.population(),
                ticks: self.tick(),
                total_infected: store.current().total_infected(),
                attack_rate: attack_rate(store),
                rewiring: self.world.resource::<RunSettings>().model.rewiring,
                rewired_edges: self.world.resource::<RewireCount>().0,
            },
            history: self.history().to_vec(),
            final_information_edges: store.information().edges(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn quiet_params() -> ModelParams {
        ModelParams {
            beta: 0.0,
            mu: 1.0,
            r: 0.0,
            pro: 0.0,
            pol: 0.0,
            p_sym: 0.0,
            gamma: 0.0,
        }
    }

    #[test]
    fn test_seed_out_of_range() {
        let scenario = Scenario::mirrored(3, vec![(0, 1)]).with_infecteds([3]);
        let err = Simulation::new(&scenario, quiet_params(), ModelOptions::default(), RunOptions::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SimError::Config(ConfigError::SeedOutOfRange { set: "initial_infecteds", node: 3, .. })
        ));
    }

    #[test]
    fn test_empty_population_rejected() {
        let scenario = Scenario::mirrored(0, Vec::new());
        let result = Simulation::new(&scenario, quiet_params(), ModelOptions::default(), RunOptions::default());
        assert!(matches!(result, Err(SimError::Config(ConfigError::EmptyPopulation))));
    }

    #[test]
    fn test_bad_information_edge_rejected() {
        let mut scenario = Scenario::mirrored(3, vec![(0, 1)]);
        scenario.information_edges.push((2, 7));
        let result = Simulation::new(&scenario, quiet_params(), ModelOptions::default(), RunOptions::default());
        assert!(matches!(
            result,
            Err(SimError::Config(ConfigError::Graph { network: "information", .. }))
        ));
    }

    #[test]
    fn test_overlapping_three_state_seeds() {
        let scenario = Scenario::mirrored(3, vec![(0, 1)])
            .with_no_vax([1])
            .with_pro_vax([1, 2]);
        let model = ModelOptions {
            opinion_model: OpinionModel::ThreeState,
            ..ModelOptions::default()
        };
        let result = Simulation::new(&scenario, quiet_params(), model, RunOptions::default());
        assert!(matches!(
            result,
            Err(SimError::Config(ConfigError::OverlappingSeeds { node: 1 }))
        ));
    }

    #[test]
    fn test_initial_tick_recorded() {
        let scenario = Scenario::mirrored(4, vec![(0, 1), (1, 2)])
            .with_infecteds([0, 0])
            .with_no_vax([3]);
        let sim = Simulation::new(&scenario, quiet_params(), ModelOptions::default(), RunOptions::default())
            .unwrap();

        let history = sim.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].tick, 0);
        assert_eq!(history[0].infectious, 1);
        assert_eq!((history[0].pro_vax, history[0].no_vax), (3, 1));
        assert!(sim.store().current().ever_infected(0));
    }

    #[test]
    fn test_terminated_run_is_frozen() {
        let scenario = Scenario::mirrored(2, vec![(0, 1)]).with_infecteds([0]);
        let mut sim = Simulation::new(&scenario, quiet_params(), ModelOptions::default(), RunOptions::default())
            .unwrap();

        assert_eq!(sim.step().unwrap(), StepOutcome::Terminated);
        assert_eq!(sim.step().unwrap(), StepOutcome::Terminated);
        assert_eq!(sim.tick(), 1);
        assert_eq!(sim.history().len(), 2);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn log_run(level: tracing::Level) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let scenario = Scenario::mirrored(2, vec![(0, 1)]).with_infecteds([0]);
            Simulation::new(&scenario, quiet_params(), ModelOptions::default(), RunOptions::default())
                .unwrap()
                .run()
                .unwrap();
        });
        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_run_lifecycle_logged_at_debug() {
        assert!(log_run(tracing::Level::INFO).is_empty());

        let debug = log_run(tracing::Level::DEBUG);
        assert!(debug.contains("simulation initialized"));
        assert!(debug.contains("epidemic over"));
    }
}
