//! Fixed-order activation of the agent roster.

use crate::agent::{Action, Behavior, Destroyer, Finder, Scout, StepContext};
use landmine_core::{EntityId, EntityKind, Result};
use serde::{Deserialize, Serialize};

/// The three active agents of a world
#[derive(Debug, Clone)]
pub struct Roster {
    pub finder: Finder,
    pub destroyer: Destroyer,
    pub scout: Scout,
}

impl Roster {
    /// Agents in activation order: finder, destroyer, scout
    pub fn iter(&self) -> impl Iterator<Item = &dyn Behavior> + '_ {
        [
            &self.finder as &dyn Behavior,
            &self.destroyer as &dyn Behavior,
            &self.scout as &dyn Behavior,
        ]
        .into_iter()
    }

    fn activation_order(&mut self) -> [&mut dyn Behavior; 3] {
        [
            &mut self.finder as &mut dyn Behavior,
            &mut self.destroyer as &mut dyn Behavior,
            &mut self.scout as &mut dyn Behavior,
        ]
    }
}

/// One agent's contribution to a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentActions {
    pub agent: EntityId,
    pub kind: EntityKind,
    pub actions: Vec<Action>,
}

/// Steps every agent once per tick, one after another.
///
/// Agents act on the live grid and registry, so an agent later in the order
/// sees what earlier agents did during the same tick (a detection by the
/// finder can be acted on by the destroyer right away).
#[derive(Debug, Clone)]
pub struct SequentialActivation {
    roster: Roster,
}

impl SequentialActivation {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<Vec<AgentActions>> {
        let mut report = Vec::with_capacity(3);
        for agent in self.roster.activation_order() {
            let actions = agent.on_step(ctx)?;
            report.push(AgentActions {
                agent: agent.id(),
                kind: agent.kind(),
                actions,
            });
        }
        Ok(report)
    }
}
