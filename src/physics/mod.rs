//! Discrete-time force integrator over one graph snapshot.
//!
//! The simulation never reaches a terminal state. Each [`SimulationState::step`]
//! accumulates centering, pairwise repulsion and link springs into velocity,
//! damps, integrates, and keeps every node inside the canvas.

mod forces;

use eframe::egui::Vec2;

use crate::layout::apply_initial_layout;
use crate::network::{Graph, Link, Node};

use forces::{accumulate_centering, accumulate_repulsion, accumulate_springs};

/// Frame length the force constants are tuned for.
pub const FRAME_DT: f32 = 1.0 / 60.0;

const SETTLE_SPEED: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
    pub centering: f32,
    pub repulsion: f32,
    pub collision_padding: f32,
    pub spring: f32,
    pub spring_length: f32,
    pub spring_slack: f32,
    pub damping: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            centering: 0.001,
            repulsion: 0.5,
            collision_padding: 20.0,
            spring: 0.01,
            spring_length: 100.0,
            spring_slack: 50.0,
            damping: 0.9,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub generation: u64,
    pub max_speed: f32,
    /// False once every node moves slower than the settle threshold.
    pub moving: bool,
}

#[derive(Clone, Debug, Default)]
struct PhysicsScratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
    radii: Vec<f32>,
}

#[derive(Clone, Debug)]
pub struct SimulationState {
    generation: u64,
    size: Vec2,
    graph: Graph,
    scratch: PhysicsScratch,
}

impl SimulationState {
    /// Takes ownership of a freshly built graph and seeds its layout.
    pub fn new(mut graph: Graph, size: Vec2, seed: u64, generation: u64) -> Self {
        apply_initial_layout(&mut graph.nodes, size, seed);
        Self {
            generation,
            size,
            graph,
            scratch: PhysicsScratch::default(),
        }
    }

    pub fn empty(size: Vec2) -> Self {
        Self::new(Graph::default(), size, 0, 0)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn nodes(&self) -> &[Node] {
        &self.graph.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.graph.links
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.graph.node(id)
    }

    /// New canvas bounds; nodes are pulled inside on the next step.
    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn step(&mut self, params: &ForceParams, dt: f32) -> TickReport {
        let node_count = self.graph.nodes.len();
        if node_count == 0 {
            return TickReport {
                generation: self.generation,
                max_speed: 0.0,
                moving: false,
            };
        }

        let scratch = &mut self.scratch;
        scratch.forces.clear();
        scratch.forces.resize(node_count, Vec2::ZERO);
        scratch.positions.clear();
        scratch.radii.clear();
        for node in &self.graph.nodes {
            scratch.positions.push(node.position);
            scratch.radii.push(node.radius);
        }

        let center = self.size * 0.5;
        accumulate_centering(&scratch.positions, center, params.centering, &mut scratch.forces);
        accumulate_repulsion(&scratch.positions, &scratch.radii, params, &mut scratch.forces);
        accumulate_springs(
            &scratch.positions,
            &self.graph.links,
            params,
            &mut scratch.forces,
        );

        let time_step_scale = if dt.is_finite() {
            (dt / FRAME_DT).clamp(0.25, 3.0)
        } else {
            1.0
        };
        let damping_factor = params.damping.clamp(0.0, 1.0).powf(time_step_scale);

        let mut max_speed = 0.0_f32;
        for (node, force) in self.graph.nodes.iter_mut().zip(&scratch.forces) {
            node.velocity = (node.velocity + *force * time_step_scale) * damping_factor;
            node.position += node.velocity * time_step_scale;
            node.position.x = clamp_axis(node.position.x, node.radius, self.size.x);
            node.position.y = clamp_axis(node.position.y, node.radius, self.size.y);
            max_speed = max_speed.max(node.velocity.length());
        }

        TickReport {
            generation: self.generation,
            max_speed,
            moving: max_speed > SETTLE_SPEED,
        }
    }
}

/// Keeps a coordinate within `[radius, extent - radius]`, centering when the
/// extent is narrower than the node.
fn clamp_axis(value: f32, radius: f32, extent: f32) -> f32 {
    if extent < radius * 2.0 {
        return extent * 0.5;
    }
    if !value.is_finite() {
        return extent * 0.5;
    }
    value.clamp(radius, extent - radius)
}

/// Advances `state` by one tick.
pub fn tick(mut state: SimulationState, params: &ForceParams, dt: f32) -> SimulationState {
    state.step(params, dt);
    state
}
