//! Zoom/pan transform, pointer handling and hit-testing.
//!
//! Screen coordinates are relative to the canvas origin. A graph point `g`
//! lands on screen at `g * zoom + pan`.

use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{Pos2, Vec2};

use crate::entity::{Category, Entity};
use crate::network::Node;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;
const ZOOM_IN_FACTOR: f32 = 1.1;
const ZOOM_OUT_FACTOR: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelDirection {
    /// Scrolling up zooms in.
    Up,
    Down,
}

impl WheelDirection {
    /// Interprets a vertical scroll delta where positive means "up".
    pub fn from_delta(delta_y: f32) -> Option<Self> {
        if delta_y > f32::EPSILON {
            Some(Self::Up)
        } else if delta_y < -f32::EPSILON {
            Some(Self::Down)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: Vec2,
    /// Pointer offset from `pan` recorded when a drag began.
    drag_anchor: Option<Vec2>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            drag_anchor: None,
        }
    }
}

impl Viewport {
    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn screen_to_graph(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.pan) / self.zoom
    }

    pub fn graph_to_screen(&self, graph: Vec2) -> Pos2 {
        (graph * self.zoom + self.pan).to_pos2()
    }

    pub fn begin_drag(&mut self, screen: Pos2) {
        self.drag_anchor = Some(screen.to_vec2() - self.pan);
    }

    /// Moves `pan` so the drag anchor stays under `screen`.
    pub fn drag_to(&mut self, screen: Pos2) {
        if let Some(anchor) = self.drag_anchor {
            self.pan = screen.to_vec2() - anchor;
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn zoom_by(&mut self, direction: WheelDirection) {
        let factor = match direction {
            WheelDirection::Up => ZOOM_IN_FACTOR,
            WheelDirection::Down => ZOOM_OUT_FACTOR,
        };
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub hovered: Option<String>,
    pub selected: Option<String>,
    pub highlight_path: HashSet<String>,
    pub category_filter: Option<Category>,
}

impl InteractionState {
    /// Whether the node passes the category filter.
    pub fn is_visible(&self, node: &Node) -> bool {
        self.category_filter
            .is_none_or(|category| node.category() == category)
    }

    pub fn in_path(&self, id: &str) -> bool {
        self.highlight_path.contains(id)
    }

    pub fn is_emphasized(&self, id: &str) -> bool {
        self.hovered.as_deref() == Some(id)
            || self.selected.as_deref() == Some(id)
            || self.in_path(id)
    }
}

/// Nearest visible node whose disc contains `point` (graph space).
pub fn hit_test(nodes: &[Node], interaction: &InteractionState, point: Vec2) -> Option<usize> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| interaction.is_visible(node))
        .filter_map(|(index, node)| {
            let distance = (node.position - point).length();
            if distance <= node.radius {
                Some((index, distance))
            } else {
                None
            }
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

/// Owns the viewport and interaction state and turns raw pointer input into
/// state changes.
#[derive(Clone, Debug, Default)]
pub struct ViewportController {
    pub viewport: Viewport,
    pub interaction: InteractionState,
}

impl ViewportController {
    pub fn pointer_move(&mut self, nodes: &[Node], screen: Pos2) {
        if self.viewport.is_dragging() {
            self.viewport.drag_to(screen);
            return;
        }

        let point = self.viewport.screen_to_graph(screen);
        self.interaction.hovered =
            hit_test(nodes, &self.interaction, point).map(|index| nodes[index].id.clone());
    }

    /// Returns the entity under the pointer, or starts a pan drag.
    pub fn pointer_down(&mut self, nodes: &[Node], screen: Pos2) -> Option<Arc<Entity>> {
        self.pointer_move(nodes, screen);

        let hovered = self
            .interaction
            .hovered
            .as_deref()
            .and_then(|id| nodes.iter().find(|node| node.id == id));

        match hovered {
            Some(node) => {
                tracing::debug!(entity = %node.id, "entity selected");
                Some(Arc::clone(&node.entity))
            }
            None => {
                self.viewport.begin_drag(screen);
                None
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.viewport.end_drag();
    }

    /// Pointer left the canvas; an active drag keeps going.
    pub fn pointer_leave(&mut self) {
        self.interaction.hovered = None;
    }

    pub fn wheel(&mut self, direction: WheelDirection) {
        self.viewport.zoom_by(direction);
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    /// Changes the visible subset; a hover on a node that is now hidden is
    /// dropped.
    pub fn set_category_filter(&mut self, nodes: &[Node], filter: Option<Category>) {
        self.interaction.category_filter = filter;

        let hidden = self
            .interaction
            .hovered
            .as_deref()
            .and_then(|id| nodes.iter().find(|node| node.id == id))
            .is_none_or(|node| !self.interaction.is_visible(node));
        if hidden {
            self.interaction.hovered = None;
        }
    }

    pub fn hovered_index(&self, nodes: &[Node]) -> Option<usize> {
        let id = self.interaction.hovered.as_deref()?;
        nodes.iter().position(|node| node.id == id)
    }
}
