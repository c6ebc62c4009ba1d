//! Agents and their per-tick behaviors.

use crate::grid::Grid;
use crate::metrics::{AgentMetrics, Tally};
use crate::registry::DetectionRegistry;
use landmine_core::{DestroyerState, EntityId, EntityKind, Error, Position, Result};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, trace, warn};

/// Move-then-scan passes the scout makes each tick
pub const SCOUT_SWEEPS_PER_TICK: usize = 2;

/// Shared world state lent to an agent for the duration of its step
pub struct StepContext<'a> {
    pub grid: &'a mut Grid,
    pub registry: &'a mut DetectionRegistry,
    pub rng: &'a mut ChaCha8Rng,
    pub tally: &'a mut Tally,
    pub tick: u64,
}

/// Something an agent did during its step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Moved {
        from: Position,
        to: Position,
    },
    Pursued {
        landmine: EntityId,
        target: Position,
        from: Position,
        to: Position,
    },
    Detected {
        landmine: EntityId,
        at: Position,
    },
    Destroyed {
        landmine: EntityId,
        at: Position,
    },
    DroppedStale {
        landmine: EntityId,
    },
    Idle,
}

impl Action {
    /// Start and end cell of a movement action
    pub fn movement(&self) -> Option<(Position, Position)> {
        match self {
            Action::Moved { from, to } | Action::Pursued { from, to, .. } => Some((*from, *to)),
            _ => None,
        }
    }
}

/// Capability interface shared by every active agent
pub trait Behavior {
    fn kind(&self) -> EntityKind;

    fn body(&self) -> &Body;

    /// Compute and apply this agent's action for one tick
    fn on_step(&mut self, ctx: &mut StepContext<'_>) -> Result<Vec<Action>>;

    fn id(&self) -> EntityId {
        self.body().id
    }

    fn position(&self) -> Position {
        self.body().position
    }

    fn metrics(&self) -> &AgentMetrics {
        &self.body().metrics
    }
}

/// Identity, location and bookkeeping common to all agents
#[derive(Debug, Clone)]
pub struct Body {
    pub id: EntityId,
    pub position: Position,
    pub visited: HashSet<Position>,
    pub metrics: AgentMetrics,
}

impl Body {
    pub fn new(id: EntityId, position: Position) -> Self {
        let mut visited = HashSet::new();
        visited.insert(position);

        let metrics = AgentMetrics {
            cells_visited: 1,
            ..AgentMetrics::default()
        };

        Self {
            id,
            position,
            visited,
            metrics,
        }
    }

    pub fn move_to(&mut self, new_position: Position) {
        self.position = new_position;
        self.visited.insert(new_position);
        self.metrics.moves += 1;
        self.metrics.cells_visited = self.visited.len() as u32;
    }

    /// Step to a uniformly chosen orthogonal neighbor
    fn random_move(&mut self, ctx: &mut StepContext<'_>) -> Result<Action> {
        let candidates = ctx.grid.neighborhood(self.position, false);
        let to = *candidates.choose(&mut *ctx.rng).ok_or_else(|| {
            Error::InvalidState(format!("no moves available from {}", self.position))
        })?;

        let from = ctx.grid.move_entity(self.id, to)?;
        self.move_to(to);
        trace!(
            agent = %self.id,
            %from,
            %to,
            choices = candidates.len(),
            "Random move"
        );

        Ok(Action::Moved { from, to })
    }

    /// Register every landmine in the current cell that nobody reported yet
    fn scan(&mut self, ctx: &mut StepContext<'_>) -> Vec<Action> {
        let mut actions = Vec::new();

        for landmine in ctx.grid.landmines_at(self.position) {
            if ctx.registry.register(landmine) {
                ctx.tally.detected += 1;
                self.metrics.detections += 1;
                debug!(
                    event = "landmine_detected",
                    agent = %self.id,
                    landmine = %landmine,
                    at = %self.position,
                    tick = ctx.tick,
                    "Landmine detected"
                );
                actions.push(Action::Detected {
                    landmine,
                    at: self.position,
                });
            }
        }

        actions
    }

    fn sweep(&mut self, ctx: &mut StepContext<'_>, actions: &mut Vec<Action>) -> Result<()> {
        actions.push(self.random_move(ctx)?);
        actions.extend(self.scan(ctx));
        Ok(())
    }
}

/// Detector that makes one random move per tick
#[derive(Debug, Clone)]
pub struct Finder {
    body: Body,
}

impl Finder {
    pub fn new(id: EntityId, position: Position) -> Self {
        Self {
            body: Body::new(id, position),
        }
    }
}

impl Behavior for Finder {
    fn kind(&self) -> EntityKind {
        EntityKind::Finder
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn on_step(&mut self, ctx: &mut StepContext<'_>) -> Result<Vec<Action>> {
        let mut actions = Vec::new();
        self.body.sweep(ctx, &mut actions)?;
        Ok(actions)
    }
}

/// Detector that sweeps twice per tick
#[derive(Debug, Clone)]
pub struct Scout {
    body: Body,
}

impl Scout {
    pub fn new(id: EntityId, position: Position) -> Self {
        Self {
            body: Body::new(id, position),
        }
    }
}

impl Behavior for Scout {
    fn kind(&self) -> EntityKind {
        EntityKind::Scout
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn on_step(&mut self, ctx: &mut StepContext<'_>) -> Result<Vec<Action>> {
        let mut actions = Vec::new();
        for _ in 0..SCOUT_SWEEPS_PER_TICK {
            self.body.sweep(ctx, &mut actions)?;
        }
        Ok(actions)
    }
}

/// Chases the oldest registered landmine and destroys it on arrival
#[derive(Debug, Clone)]
pub struct Destroyer {
    body: Body,
    state: DestroyerState,
    target: Option<EntityId>,
}

impl Destroyer {
    pub fn new(id: EntityId, position: Position) -> Self {
        Self {
            body: Body::new(id, position),
            state: DestroyerState::Idle,
            target: None,
        }
    }

    pub fn state(&self) -> DestroyerState {
        self.state
    }

    /// Landmine currently being pursued
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Oldest registry entry still on the grid. Entries whose landmine is
    /// gone are dropped until a live one is found.
    fn select_target(
        &mut self,
        ctx: &mut StepContext<'_>,
        actions: &mut Vec<Action>,
    ) -> Option<(EntityId, Position)> {
        while let Some(candidate) = ctx.registry.first() {
            if let Some(position) = ctx.grid.position_of(candidate) {
                return Some((candidate, position));
            }

            warn!(
                event = "stale_target",
                agent = %self.body.id,
                tick = ctx.tick,
                "{}, selecting next",
                Error::StaleTarget(candidate)
            );
            ctx.registry.remove(candidate);
            self.body.metrics.stale_targets += 1;
            actions.push(Action::DroppedStale {
                landmine: candidate,
            });
        }
        None
    }
}

impl Behavior for Destroyer {
    fn kind(&self) -> EntityKind {
        EntityKind::Destroyer
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn on_step(&mut self, ctx: &mut StepContext<'_>) -> Result<Vec<Action>> {
        let mut actions = Vec::new();

        let Some((landmine, target)) = self.select_target(ctx, &mut actions) else {
            self.state = DestroyerState::Idle;
            self.target = None;
            self.body.metrics.idle_ticks += 1;
            actions.push(Action::Idle);
            return Ok(actions);
        };
        self.target = Some(landmine);

        if self.body.position == target {
            self.state = DestroyerState::Destroying;
            ctx.grid.remove(landmine)?;
            ctx.registry.remove(landmine);
            ctx.tally.destroyed += 1;
            self.body.metrics.destroyed += 1;
            self.target = None;

            info!(
                event = "landmine_destroyed",
                agent = %self.body.id,
                landmine = %landmine,
                at = %target,
                tick = ctx.tick,
                "Destroyer at {} destroyed a landmine",
                target
            );
            actions.push(Action::Destroyed {
                landmine,
                at: target,
            });
        } else {
            self.state = DestroyerState::Moving;
            let next = self.body.position.step_toward(&target);
            let from = ctx.grid.move_entity(self.body.id, next)?;
            self.body.move_to(next);

            debug!(
                event = "destroyer_moving",
                agent = %self.body.id,
                landmine = %landmine,
                tick = ctx.tick,
                "Destroyer moving towards {} from {}",
                target,
                from
            );
            actions.push(Action::Pursued {
                landmine,
                target,
                from,
                to: next,
            });
        }

        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    struct Fixture {
        grid: Grid,
        registry: DetectionRegistry,
        rng: ChaCha8Rng,
        tally: Tally,
    }

    impl Fixture {
        fn new(size: i32) -> Self {
            Self {
                grid: Grid::new(size),
                registry: DetectionRegistry::new(),
                rng: ChaCha8Rng::seed_from_u64(7),
                tally: Tally::default(),
            }
        }

        fn mine(&mut self, id: u32, pos: Position) -> EntityId {
            let id = EntityId(id);
            self.grid.place(id, EntityKind::Landmine, pos).unwrap();
            id
        }

        fn step(&mut self, agent: &mut dyn Behavior) -> Vec<Action> {
            let mut ctx = StepContext {
                grid: &mut self.grid,
                registry: &mut self.registry,
                rng: &mut self.rng,
                tally: &mut self.tally,
                tick: 1,
            };
            agent.on_step(&mut ctx).unwrap()
        }
    }

    fn finder_at(fixture: &mut Fixture, pos: Position) -> Finder {
        fixture.grid.place(EntityId(100), EntityKind::Finder, pos).unwrap();
        Finder::new(EntityId(100), pos)
    }

    fn scout_at(fixture: &mut Fixture, pos: Position) -> Scout {
        fixture.grid.place(EntityId(101), EntityKind::Scout, pos).unwrap();
        Scout::new(EntityId(101), pos)
    }

    fn destroyer_at(fixture: &mut Fixture, pos: Position) -> Destroyer {
        fixture
            .grid
            .place(EntityId(102), EntityKind::Destroyer, pos)
            .unwrap();
        Destroyer::new(EntityId(102), pos)
    }

    #[test]
    fn test_finder_detects_landmine() {
        let mut fixture = Fixture::new(2);
        fixture.mine(0, Position::new(1, 0));
        fixture.mine(1, Position::new(0, 1));
        let mut finder = finder_at(&mut fixture, Position::new(0, 0));

        let actions = fixture.step(&mut finder);

        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::Moved { .. }));
        assert!(matches!(actions[1], Action::Detected { .. }));
        assert_eq!(fixture.registry.len(), 1);
        assert_eq!(fixture.tally.detected, 1);
        assert_eq!(finder.metrics().detections, 1);
        assert_eq!(finder.metrics().moves, 1);
        assert_eq!(fixture.grid.position_of(finder.id()), Some(finder.position()));
    }

    #[test]
    fn test_finder_skips_registered_landmines() {
        let mut fixture = Fixture::new(2);
        let a = fixture.mine(0, Position::new(1, 0));
        let b = fixture.mine(1, Position::new(0, 1));
        fixture.registry.register(a);
        fixture.registry.register(b);
        let mut finder = finder_at(&mut fixture, Position::new(0, 0));

        let actions = fixture.step(&mut finder);

        assert_eq!(actions.len(), 1);
        assert_eq!(fixture.registry.len(), 2);
        assert_eq!(finder.metrics().detections, 0);
    }

    #[test]
    fn test_scout_moves_twice_orthogonally() {
        let mut fixture = Fixture::new(5);
        let start = Position::new(2, 2);
        let mut scout = scout_at(&mut fixture, start);

        let actions = fixture.step(&mut scout);
        let moves: Vec<_> = actions.iter().filter_map(Action::movement).collect();

        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].0, start);
        assert_eq!(moves[0].1, moves[1].0);
        for (from, to) in &moves {
            assert!(from.is_orthogonal_step(to));
        }
        assert_eq!(scout.position(), moves[1].1);
        assert_eq!(scout.metrics().moves, 2);
    }

    #[test]
    fn test_scout_scans_after_each_move() {
        let mut fixture = Fixture::new(2);
        fixture.mine(0, Position::new(0, 0));
        fixture.mine(1, Position::new(1, 0));
        fixture.mine(2, Position::new(0, 1));
        fixture.mine(3, Position::new(1, 1));
        let mut scout = scout_at(&mut fixture, Position::new(0, 0));

        let actions = fixture.step(&mut scout);

        assert_eq!(actions.len(), 4);
        assert!(matches!(actions[0], Action::Moved { .. }));
        assert!(matches!(actions[1], Action::Detected { .. }));
        assert!(matches!(actions[2], Action::Moved { .. }));
        assert!(matches!(actions[3], Action::Detected { .. }));
        assert_eq!(fixture.registry.len(), 2);
    }

    #[test]
    fn test_destroyer_idle_without_detections() {
        let mut fixture = Fixture::new(5);
        let mut destroyer = destroyer_at(&mut fixture, Position::new(4, 4));

        let actions = fixture.step(&mut destroyer);

        assert_eq!(actions, vec![Action::Idle]);
        assert_eq!(destroyer.state(), DestroyerState::Idle);
        assert_eq!(destroyer.position(), Position::new(4, 4));
        assert_eq!(destroyer.metrics().idle_ticks, 1);
    }

    #[test]
    fn test_destroyer_pursues_diagonally() {
        let mut fixture = Fixture::new(10);
        let mine = fixture.mine(0, Position::new(2, 3));
        fixture.registry.register(mine);
        let mut destroyer = destroyer_at(&mut fixture, Position::new(9, 9));

        let actions = fixture.step(&mut destroyer);

        assert_eq!(
            actions,
            vec![Action::Pursued {
                landmine: mine,
                target: Position::new(2, 3),
                from: Position::new(9, 9),
                to: Position::new(8, 8),
            }]
        );
        assert_eq!(destroyer.state(), DestroyerState::Moving);
        assert_eq!(destroyer.target(), Some(mine));
        assert_eq!(fixture.grid.position_of(destroyer.id()), Some(Position::new(8, 8)));
    }

    #[test]
    fn test_destroyer_targets_oldest_not_nearest() {
        let mut fixture = Fixture::new(10);
        let far = fixture.mine(0, Position::new(0, 0));
        let near = fixture.mine(1, Position::new(8, 9));
        fixture.registry.register(far);
        fixture.registry.register(near);
        let mut destroyer = destroyer_at(&mut fixture, Position::new(9, 9));

        fixture.step(&mut destroyer);

        assert_eq!(destroyer.target(), Some(far));
        assert_eq!(destroyer.position(), Position::new(8, 8));
    }

    #[test]
    fn test_destroyer_destroys_on_arrival() {
        let mut fixture = Fixture::new(5);
        let mine = fixture.mine(0, Position::new(4, 4));
        fixture.registry.register(mine);
        let mut destroyer = destroyer_at(&mut fixture, Position::new(4, 4));

        let actions = fixture.step(&mut destroyer);

        assert_eq!(
            actions,
            vec![Action::Destroyed {
                landmine: mine,
                at: Position::new(4, 4),
            }]
        );
        assert_eq!(destroyer.state(), DestroyerState::Destroying);
        assert_eq!(destroyer.position(), Position::new(4, 4));
        assert!(!fixture.grid.contains(mine));
        assert!(fixture.registry.is_empty());
        assert_eq!(fixture.tally.destroyed, 1);
        assert_eq!(destroyer.metrics().destroyed, 1);

        // Nothing left to do on the following tick
        fixture.step(&mut destroyer);
        assert_eq!(destroyer.state(), DestroyerState::Idle);
    }

    #[test]
    fn test_destroyer_drops_stale_target() {
        let mut fixture = Fixture::new(10);
        let live = fixture.mine(0, Position::new(5, 5));
        fixture.registry.register(EntityId(50));
        fixture.registry.register(live);
        let mut destroyer = destroyer_at(&mut fixture, Position::new(9, 9));

        let actions = fixture.step(&mut destroyer);

        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0],
            Action::DroppedStale {
                landmine: EntityId(50)
            }
        );
        assert!(matches!(actions[1], Action::Pursued { landmine, .. } if landmine == live));
        assert!(!fixture.registry.contains(EntityId(50)));
        assert_eq!(destroyer.metrics().stale_targets, 1);
        assert_eq!(destroyer.state(), DestroyerState::Moving);
    }

    #[test]
    fn test_destroyer_idles_when_only_stale_entries_remain() {
        let mut fixture = Fixture::new(10);
        fixture.registry.register(EntityId(50));
        let mut destroyer = destroyer_at(&mut fixture, Position::new(9, 9));

        let actions = fixture.step(&mut destroyer);

        assert_eq!(actions.last(), Some(&Action::Idle));
        assert!(fixture.registry.is_empty());
        assert_eq!(destroyer.state(), DestroyerState::Idle);
    }
}
