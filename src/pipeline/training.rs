//! Training loop coupling the simulation to both agents

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pong::{
        ArenaConfig, Ball, RewardSchedule, Rewards, SimulationState, apply_action, discretize,
        step,
    },
    ports::TrainingObserver,
    q_learning::{Agent, ExplorationSchedule, LearningParams},
    types::{Action, DiscreteState, PaddleId},
};

/// Training configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub arena: ArenaConfig,
    pub rewards: RewardSchedule,
    pub learning: LearningParams,
    pub exploration: ExplorationSchedule,
    /// Seed for the session RNG; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Stop after this many ticks; `None` runs until stopped externally
    pub max_ticks: Option<u64>,
}

impl TrainingConfig {
    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Limit the run to `ticks` ticks.
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    pub fn with_learning(mut self, learning: LearningParams) -> Self {
        self.learning = learning;
        self
    }

    pub fn with_exploration(mut self, exploration: ExplorationSchedule) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.arena.validate()?;
        self.rewards.validate()?;
        self.learning.validate()?;
        self.exploration.validate()
    }

    /// Load configuration from a JSON file; absent fields take defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("open config {}", path.as_ref().display()),
            source,
        })?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }
}

/// A (state, action) decision awaiting its reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub state: DiscreteState,
    pub action: Action,
}

impl Default for Transition {
    /// Both agents start as if they had chosen `Stay` in state 0.
    fn default() -> Self {
        Self {
            state: DiscreteState::default(),
            action: Action::Stay,
        }
    }
}

/// Everything that happened in one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// 1-based index of this tick within the session
    pub tick: u64,
    /// Discrete state observed by each agent at the start of the tick
    pub states: [DiscreteState; 2],
    pub actions: [Action; 2],
    pub rewards: Rewards,
    pub contacts: Vec<PaddleId>,
    pub scorer: Option<PaddleId>,
    /// Whether this tick decremented both exploration rates
    pub exploration_decayed: bool,
}

/// Read-only snapshot handed to renderers once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub tick: u64,
    pub ball: Ball,
    pub paddle_y: [f64; 2],
    pub scores: [u32; 2],
    pub episode: u64,
    pub epsilons: [f64; 2],
}

/// A finished point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEvent {
    pub tick: u64,
    /// Episode counter after the point
    pub episode: u64,
    pub scorer: PaddleId,
    pub scores: [u32; 2],
    pub epsilons: [f64; 2],
}

/// Shared flag an event layer uses to end a run
///
/// The pipeline checks it between ticks, so a tick in progress always
/// completes.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Simulation plus both learners, advanced one tick at a time
///
/// Every tick performs, in order: discretize for both agents, select both
/// actions, move both paddles, step the physics, apply one Q-update per
/// agent for the *previous* tick's decision, and store this tick's decision
/// as the new previous one.
pub struct TrainingSession {
    arena: ArenaConfig,
    rewards: RewardSchedule,
    exploration: ExplorationSchedule,
    state: SimulationState,
    agents: [Agent; 2],
    previous: [Transition; 2],
    rng: StdRng,
    tick: u64,
}

impl TrainingSession {
    /// Create a session with empty tables
    pub fn new(config: &TrainingConfig) -> Result<Self> {
        config.validate()?;
        let epsilon = config.exploration.initial_epsilon;
        Ok(Self {
            arena: config.arena.clone(),
            rewards: config.rewards.clone(),
            exploration: config.exploration,
            state: SimulationState::new(&config.arena),
            agents: PaddleId::BOTH.map(|paddle| Agent::new(paddle, config.learning, epsilon)),
            previous: [Transition::default(); 2],
            rng: build_rng(config.seed),
            tick: 0,
        })
    }

    pub fn arena(&self) -> &ArenaConfig {
        &self.arena
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable access to the simulation, for placing the ball in scenarios
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn agent(&self, paddle: PaddleId) -> &Agent {
        &self.agents[paddle.slot()]
    }

    pub fn agent_mut(&mut self, paddle: PaddleId) -> &mut Agent {
        &mut self.agents[paddle.slot()]
    }

    /// Decision awaiting credit for `paddle`
    pub fn previous(&self, paddle: PaddleId) -> Transition {
        self.previous[paddle.slot()]
    }

    /// Ticks completed so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn frame(&self) -> FrameView {
        FrameView {
            tick: self.tick,
            ball: self.state.ball,
            paddle_y: self.state.paddle_y,
            scores: self.state.scores,
            episode: self.state.episode,
            epsilons: self.agents.each_ref().map(Agent::epsilon),
        }
    }

    /// Advance the session by one tick
    pub fn tick(&mut self) -> TickReport {
        let states = PaddleId::BOTH.map(|paddle| discretize(&self.state, &self.arena, paddle));
        let actions = PaddleId::BOTH.map(|paddle| {
            self.agents[paddle.slot()].select_action(states[paddle.slot()], &mut self.rng)
        });

        for paddle in PaddleId::BOTH {
            apply_action(&mut self.state, &self.arena, paddle, actions[paddle.slot()]);
        }

        let outcome = step(&mut self.state, &self.arena, &self.rewards, &mut self.rng);

        for paddle in PaddleId::BOTH {
            let slot = paddle.slot();
            let previous = self.previous[slot];
            self.agents[slot].update_q_value(
                previous.state,
                previous.action,
                outcome.rewards[paddle],
                states[slot],
            );
            self.previous[slot] = Transition {
                state: states[slot],
                action: actions[slot],
            };
        }

        let mut exploration_decayed = false;
        if outcome.scorer.is_some() && self.exploration.should_decay(self.state.episode) {
            let [first, second] = &mut self.agents;
            exploration_decayed = self.exploration.decay_coupled(first, second);
        }

        self.tick += 1;

        TickReport {
            tick: self.tick,
            states,
            actions,
            rewards: outcome.rewards,
            contacts: outcome.contacts,
            scorer: outcome.scorer,
            exploration_decayed,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Ticks run by this call
    pub ticks: u64,
    /// Points finished during this run
    pub points: u64,
    /// Paddle contacts during this run, per paddle
    pub contacts: [u64; 2],
    /// Session totals at the end of the run
    pub scores: [u32; 2],
    pub episodes: u64,
    pub epsilons: [f64; 2],
    pub table_entries: [usize; 2],
    /// Whether the stop handle ended the run before the tick budget
    pub stopped: bool,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Drives a [`TrainingSession`] until its tick budget runs out or a stop is requested
pub struct TrainingPipeline {
    max_ticks: Option<u64>,
    observers: Vec<Box<dyn TrainingObserver>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(max_ticks: Option<u64>) -> Self {
        Self {
            max_ticks,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn TrainingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run ticks until the budget is spent or `stop` is triggered
    ///
    /// Without a budget the run only ends through `stop`.
    pub fn run(
        &mut self,
        session: &mut TrainingSession,
        stop: &StopHandle,
    ) -> Result<TrainingResult> {
        for observer in &mut self.observers {
            observer.on_training_start(self.max_ticks)?;
        }

        let mut ticks = 0;
        let mut points = 0;
        let mut contacts = [0u64; 2];
        let mut stopped = false;

        loop {
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            if stop.is_stop_requested() {
                stopped = true;
                break;
            }

            let report = session.tick();
            ticks += 1;
            for paddle in &report.contacts {
                contacts[paddle.slot()] += 1;
            }

            let frame = session.frame();
            for observer in &mut self.observers {
                observer.on_tick(&report, &frame)?;
            }

            if let Some(scorer) = report.scorer {
                points += 1;
                let event = PointEvent {
                    tick: report.tick,
                    episode: frame.episode,
                    scorer,
                    scores: frame.scores,
                    epsilons: frame.epsilons,
                };
                log::debug!(
                    "point {} to {}: score {}-{}",
                    event.episode,
                    scorer,
                    event.scores[0],
                    event.scores[1]
                );
                for observer in &mut self.observers {
                    observer.on_point(&event)?;
                }
            }

            if report.exploration_decayed {
                log::info!(
                    "episode {}: exploration decayed to {:.3} / {:.3}",
                    frame.episode,
                    frame.epsilons[0],
                    frame.epsilons[1]
                );
                for observer in &mut self.observers {
                    observer.on_exploration_decay(frame.episode, frame.epsilons)?;
                }
            }
        }

        let frame = session.frame();
        let result = TrainingResult {
            ticks,
            points,
            contacts,
            scores: frame.scores,
            episodes: frame.episode,
            epsilons: frame.epsilons,
            table_entries: PaddleId::BOTH.map(|paddle| session.agent(paddle).q_table().len()),
            stopped,
        };

        for observer in &mut self.observers {
            observer.on_training_end(&result)?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_pipeline() {
        let config = TrainingConfig::default().with_seed(42).with_max_ticks(500);
        let mut session = TrainingSession::new(&config).unwrap();
        let mut pipeline = TrainingPipeline::new(config.max_ticks);

        let result = pipeline.run(&mut session, &StopHandle::new()).unwrap();

        assert_eq!(result.ticks, 500);
        assert_eq!(session.tick_count(), 500);
        assert_eq!(
            result.scores[0] as u64 + result.scores[1] as u64,
            result.episodes
        );
        assert!(!result.stopped);
    }

    #[test]
    fn test_stop_before_first_tick() {
        let config = TrainingConfig::default().with_seed(1);
        let mut session = TrainingSession::new(&config).unwrap();
        let stop = StopHandle::new();
        stop.request_stop();

        let result = TrainingPipeline::new(None).run(&mut session, &stop).unwrap();

        assert_eq!(result.ticks, 0);
        assert!(result.stopped);
        assert_eq!(result.table_entries, [0, 0]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrainingConfig::default().with_learning(LearningParams {
            learning_rate: 2.0,
            discount_factor: 0.9,
        });
        assert!(matches!(
            TrainingSession::new(&config),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_oversized_reward_rejected() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{"rewards": {"point_won": 1e308}}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(TrainingSession::new(&config).is_err());
    }

    #[test]
    fn test_config_json_defaults() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{"seed": 9, "learning": {"learning_rate": 0.2}}"#).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.learning.learning_rate, 0.2);
        assert_eq!(config.learning.discount_factor, 0.9);
        assert_eq!(config.arena, ArenaConfig::default());
        assert_eq!(config.max_ticks, None);
    }
}
