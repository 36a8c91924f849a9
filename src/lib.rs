//! Force-directed relationship network: graph derivation from entities,
//! category-clustered seeding, a continuous force simulation, viewport
//! interaction and a backend-agnostic draw-command renderer.

pub mod entity;
pub mod layout;
pub mod network;
pub mod physics;
pub mod render;
pub mod session;
pub mod source;
mod util;
pub mod viewport;

pub use entity::{Category, Entity, EntityError};
pub use network::{Graph, Link, LinkKind, Node, build_graph};
pub use physics::{ForceParams, SimulationState, TickReport, tick};
pub use render::{DrawCommand, GraphPalette, Scene, TextMeasure, render};
pub use session::GraphSession;
pub use viewport::{InteractionState, Viewport, ViewportController, WheelDirection};
