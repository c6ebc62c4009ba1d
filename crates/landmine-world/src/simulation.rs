//! Simulation engine: owns the world and advances it tick by tick.

use crate::agent::{Action, Behavior, Destroyer, Finder, Scout, StepContext};
use crate::grid::Grid;
use crate::metrics::{AgentMetrics, Tally};
use crate::registry::DetectionRegistry;
use crate::schedule::{AgentActions, Roster, SequentialActivation};
use crate::view::{Details, WorldSnapshot};
use landmine_core::{EntityId, EntityKind, Error, Position, Result, SimConfig, WorldConfig};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Where everything starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub landmines: Vec<Position>,
    pub finder: Position,
    pub destroyer: Position,
    pub scout: Position,
}

impl Layout {
    /// Landmines scattered uniformly (several may share a cell), agents at
    /// their fixed starting cells.
    pub fn random(config: &WorldConfig, rng: &mut ChaCha8Rng) -> Self {
        let landmines = (0..config.landmine_count)
            .map(|_| {
                let x = rng.gen_range(0..config.grid_size);
                let y = rng.gen_range(0..config.grid_size);
                Position::new(x, y)
            })
            .collect();

        Self {
            landmines,
            finder: config.finder_start(),
            destroyer: config.destroyer_start(),
            scout: config.scout_start(),
        }
    }
}

/// Everything that happened during one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub agents: Vec<AgentActions>,
}

impl TickReport {
    pub fn actions_of(&self, kind: EntityKind) -> &[Action] {
        self.agents
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.actions.as_slice())
            .unwrap_or(&[])
    }

    pub fn detections(&self) -> usize {
        self.count(|action| matches!(action, Action::Detected { .. }))
    }

    pub fn destructions(&self) -> usize {
        self.count(|action| matches!(action, Action::Destroyed { .. }))
    }

    fn count(&self, predicate: impl Fn(&Action) -> bool) -> usize {
        self.agents
            .iter()
            .flat_map(|entry| entry.actions.iter())
            .filter(|action| predicate(action))
            .count()
    }
}

/// Final state of one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    pub metrics: AgentMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub total_ticks: u64,
    pub landmines_placed: usize,
    pub landmines_detected: u64,
    pub landmines_destroyed: u64,
    pub landmines_remaining: usize,
    pub first_detection_tick: Option<u64>,
    pub cleared_at_tick: Option<u64>,
    pub agents: Vec<AgentSummary>,
    pub details: Details,
}

pub struct Simulation {
    grid: Grid,
    registry: DetectionRegistry,
    schedule: SequentialActivation,
    config: SimConfig,
    rng: ChaCha8Rng,
    tick: u64,
    landmines_placed: usize,
    tally: Tally,
    first_detection_tick: Option<u64>,
    cleared_at_tick: Option<u64>,
}

impl Simulation {
    /// Build a world with randomly placed landmines
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let layout = Layout::random(&config.world, &mut rng);
        Self::build(config, layout, rng)
    }

    /// Build a world from an explicit layout; the generator is still seeded
    /// from the config for agent movement.
    pub fn with_layout(config: SimConfig, layout: Layout) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::build(config, layout, rng)
    }

    fn build(config: SimConfig, layout: Layout, rng: ChaCha8Rng) -> Result<Self> {
        let mut grid = Grid::new(config.world.grid_size);

        let mut next_id = 0u32;
        let mut allocate = || {
            let id = EntityId(next_id);
            next_id += 1;
            id
        };

        for pos in &layout.landmines {
            grid.place(allocate(), EntityKind::Landmine, *pos)?;
        }

        let finder = Finder::new(allocate(), layout.finder);
        let destroyer = Destroyer::new(allocate(), layout.destroyer);
        let scout = Scout::new(allocate(), layout.scout);
        grid.place(finder.id(), EntityKind::Finder, layout.finder)?;
        grid.place(destroyer.id(), EntityKind::Destroyer, layout.destroyer)?;
        grid.place(scout.id(), EntityKind::Scout, layout.scout)?;

        debug!(
            grid_size = grid.size,
            landmines = layout.landmines.len(),
            seed = config.seed,
            "World initialized"
        );

        Ok(Self {
            grid,
            registry: DetectionRegistry::new(),
            schedule: SequentialActivation::new(Roster {
                finder,
                destroyer,
                scout,
            }),
            config,
            rng,
            tick: 0,
            landmines_placed: layout.landmines.len(),
            tally: Tally::default(),
            first_detection_tick: None,
            cleared_at_tick: None,
        })
    }

    /// Advance the world by one tick.
    ///
    /// An error aborts the tick: agents already stepped keep their effects
    /// (counters included), the tick counter is not advanced.
    pub fn step(&mut self) -> Result<TickReport> {
        let tick = self.tick + 1;
        let detected_before = self.tally.detected;
        let mut ctx = StepContext {
            grid: &mut self.grid,
            registry: &mut self.registry,
            rng: &mut self.rng,
            tally: &mut self.tally,
            tick,
        };
        let agents = self.schedule.step(&mut ctx)?;
        let report = TickReport { tick, agents };

        self.tick = tick;
        if self.tally.detected > detected_before && self.first_detection_tick.is_none() {
            self.first_detection_tick = Some(tick);
        }
        if self.cleared_at_tick.is_none() && self.landmines_placed > 0 && self.is_cleared() {
            self.cleared_at_tick = Some(tick);
            info!(event = "field_cleared", tick, "All landmines destroyed");
        }

        Ok(report)
    }

    /// Run up to `num_ticks` ticks
    pub fn run(&mut self, num_ticks: u64) -> Result<SimulationResult> {
        self.run_with(num_ticks, |_, _| {})
    }

    /// Run up to `num_ticks` ticks, handing every completed tick to `on_tick`
    #[instrument(skip(self, on_tick), fields(seed = self.config.seed))]
    pub fn run_with<F>(&mut self, num_ticks: u64, mut on_tick: F) -> Result<SimulationResult>
    where
        F: FnMut(&Simulation, &TickReport),
    {
        info!("Starting simulation for {} ticks", num_ticks);

        for _ in 0..num_ticks {
            let report = self.step()?;
            on_tick(self, &report);

            let every = self.config.progress_every;
            if every > 0 && self.tick % every == 0 {
                info!(
                    event = "progress",
                    tick = self.tick,
                    found = self.registry.len(),
                    destroyed = self.tally.destroyed,
                    remaining = self.remaining_landmines(),
                    destroyer_state = %self.destroyer().state(),
                    "Tick {}/{}",
                    self.tick,
                    num_ticks
                );
            }

            if self.config.stop_when_cleared && self.cleared_at_tick.is_some() {
                break;
            }
        }

        self.emit_summary();
        Ok(self.collect_results())
    }

    fn emit_summary(&self) {
        info!(
            event = "run_summary",
            total_ticks = self.tick,
            landmines_placed = self.landmines_placed,
            landmines_detected = self.tally.detected,
            landmines_destroyed = self.tally.destroyed,
            landmines_remaining = self.remaining_landmines(),
            first_detection_tick = ?self.first_detection_tick,
            cleared_at_tick = ?self.cleared_at_tick,
            "Simulation complete"
        );

        for agent in self.schedule.roster().iter() {
            let metrics = agent.metrics();
            debug!(
                event = "agent_summary",
                agent = %agent.id(),
                kind = %agent.kind(),
                position = %agent.position(),
                moves = metrics.moves,
                cells_visited = metrics.cells_visited,
                coverage_ratio = metrics.coverage_ratio(),
                detections = metrics.detections,
                destroyed = metrics.destroyed,
                "Agent summary"
            );
        }
    }

    fn collect_results(&self) -> SimulationResult {
        let agents = self
            .schedule
            .roster()
            .iter()
            .map(|agent| AgentSummary {
                id: agent.id(),
                kind: agent.kind(),
                position: agent.position(),
                metrics: agent.metrics().clone(),
            })
            .collect();

        SimulationResult {
            seed: self.config.seed,
            total_ticks: self.tick,
            landmines_placed: self.landmines_placed,
            landmines_detected: self.tally.detected,
            landmines_destroyed: self.tally.destroyed,
            landmines_remaining: self.remaining_landmines(),
            first_detection_tick: self.first_detection_tick,
            cleared_at_tick: self.cleared_at_tick,
            agents,
            details: self.details(),
        }
    }

    /// Mark a landmine as detected without a detector finding it.
    /// Returns false if it was already registered.
    pub fn register_detection(&mut self, id: EntityId) -> Result<bool> {
        match self.grid.kind_of(id) {
            Some(EntityKind::Landmine) => Ok(self.registry.register(id)),
            _ => Err(Error::LookupFailure(id)),
        }
    }

    /// Ids of the landmines still on the grid
    pub fn landmine_ids(&self) -> Vec<EntityId> {
        self.grid
            .iter_cells()
            .flat_map(|(_, cell)| cell.iter())
            .filter(|occupant| occupant.kind == EntityKind::Landmine)
            .map(|occupant| occupant.id)
            .collect()
    }

    pub fn details(&self) -> Details {
        let roster = self.schedule.roster();
        Details {
            finder_position: roster.finder.position(),
            scout_position: roster.scout.position(),
            destroyer_position: roster.destroyer.position(),
            destroyer_state: roster.destroyer.state(),
            landmines_found: self.registry.len(),
            landmines_destroyed: self.tally.destroyed,
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self.tick, &self.grid, self.details())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &DetectionRegistry {
        &self.registry
    }

    pub fn roster(&self) -> &Roster {
        self.schedule.roster()
    }

    pub fn finder(&self) -> &Finder {
        &self.schedule.roster().finder
    }

    pub fn scout(&self) -> &Scout {
        &self.schedule.roster().scout
    }

    pub fn destroyer(&self) -> &Destroyer {
        &self.schedule.roster().destroyer
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of completed ticks
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn destroyed_count(&self) -> u64 {
        self.tally.destroyed
    }

    pub fn landmines_placed(&self) -> usize {
        self.landmines_placed
    }

    pub fn remaining_landmines(&self) -> usize {
        self.landmines_placed - self.tally.destroyed as usize
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining_landmines() == 0
    }
}
