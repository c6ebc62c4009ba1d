//! Landmine sweep simulation engine.
//!
//! A square grid holds landmines and three agents. The finder and scout wander
//! at random and report the landmines they step on; the destroyer walks to the
//! oldest report and removes the landmine.

pub mod agent;
pub mod grid;
pub mod metrics;
pub mod registry;
pub mod schedule;
pub mod simulation;
pub mod view;

pub use agent::{Action, Behavior, Destroyer, Finder, Scout};
pub use grid::{Grid, Occupant};
pub use metrics::{AgentMetrics, Tally};
pub use registry::DetectionRegistry;
pub use schedule::{Roster, SequentialActivation};
pub use simulation::{Layout, Simulation, SimulationResult, TickReport};
pub use view::{render_ascii, Details, WorldSnapshot};
