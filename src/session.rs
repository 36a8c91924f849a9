//! One interactive graph view: the simulated snapshot plus viewport and
//! interaction state.
//!
//! A new entity list replaces the snapshot wholesale and bumps the
//! generation; viewport, category filter and selection carry over.

use std::sync::Arc;

use eframe::egui::{Pos2, Vec2};

use crate::entity::{Category, Entity};
use crate::network::build_graph;
use crate::physics::{ForceParams, SimulationState, TickReport};
use crate::render::{DrawCommand, GraphPalette, Scene, TextMeasure, render};
use crate::viewport::{InteractionState, Viewport, ViewportController, WheelDirection};

pub struct GraphSession {
    simulation: SimulationState,
    controller: ViewportController,
    params: ForceParams,
    palette: GraphPalette,
}

impl GraphSession {
    pub fn new(entities: &[Entity], size: Vec2, seed: u64) -> Self {
        let mut session = Self {
            simulation: SimulationState::empty(size),
            controller: ViewportController::default(),
            params: ForceParams::default(),
            palette: GraphPalette::default(),
        };
        session.replace_entities(entities, seed);
        session
    }

    /// Discards the current nodes and links and restarts layout and
    /// simulation from `entities`.
    pub fn replace_entities(&mut self, entities: &[Entity], seed: u64) {
        let generation = self.simulation.generation().wrapping_add(1);
        let size = self.simulation.size();
        let graph = build_graph(entities);

        tracing::info!(
            generation,
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            seed,
            "rebuilt relationship graph"
        );

        self.simulation = SimulationState::new(graph, size, seed, generation);

        let interaction = &mut self.controller.interaction;
        interaction.hovered = None;
        let known = |id: &String| self.simulation.node(id).is_some();
        if interaction.selected.as_ref().is_some_and(|id| !known(id)) {
            interaction.selected = None;
        }
        interaction.highlight_path.retain(|id| known(id));
    }

    pub fn generation(&self) -> u64 {
        self.simulation.generation()
    }

    pub fn simulation(&self) -> &SimulationState {
        &self.simulation
    }

    pub fn viewport(&self) -> &Viewport {
        &self.controller.viewport
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.controller.interaction
    }

    pub fn params(&self) -> &ForceParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ForceParams {
        &mut self.params
    }

    pub fn palette(&self) -> &GraphPalette {
        &self.palette
    }

    pub fn resize(&mut self, size: Vec2) {
        if size != self.simulation.size() {
            self.simulation.resize(size);
        }
    }

    pub fn tick(&mut self, dt: f32) -> TickReport {
        self.simulation.step(&self.params, dt)
    }

    pub fn pointer_move(&mut self, screen: Pos2) {
        self.controller.pointer_move(self.simulation.nodes(), screen);
    }

    /// Returns the entity under the pointer, if any. Selection itself is left
    /// to the caller through [`GraphSession::set_selected`].
    pub fn pointer_down(&mut self, screen: Pos2) -> Option<Arc<Entity>> {
        self.controller.pointer_down(self.simulation.nodes(), screen)
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.controller.pointer_leave();
    }

    pub fn wheel(&mut self, direction: WheelDirection) {
        self.controller.wheel(direction);
    }

    pub fn reset_view(&mut self) {
        self.controller.reset_view();
    }

    pub fn set_selected(&mut self, id: Option<String>) {
        self.controller.interaction.selected = id;
    }

    pub fn set_highlight_path<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.controller.interaction.highlight_path = ids.into_iter().collect();
    }

    pub fn set_category_filter(&mut self, filter: Option<Category>) {
        self.controller
            .set_category_filter(self.simulation.nodes(), filter);
    }

    pub fn hovered_entity(&self) -> Option<Arc<Entity>> {
        self.controller
            .hovered_index(self.simulation.nodes())
            .map(|index| Arc::clone(&self.simulation.nodes()[index].entity))
    }

    pub fn render(&self, measure: &dyn TextMeasure) -> Vec<DrawCommand> {
        let scene = Scene {
            nodes: self.simulation.nodes(),
            links: self.simulation.links(),
            viewport: &self.controller.viewport,
            interaction: &self.controller.interaction,
            canvas: self.simulation.size(),
        };
        render(&scene, &self.palette, measure)
    }
}
