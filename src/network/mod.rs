//! Graph derived from an entity list: one node per entity, links inferred
//! from shared employers, shared transactions and mutual affinity.

mod build;

use std::collections::HashMap;
use std::sync::Arc;

use eframe::egui::Vec2;

use crate::entity::{Category, Entity};

pub use build::build_graph;

pub const MIN_NODE_RADIUS: f32 = 15.0;
pub const MAX_NODE_RADIUS: f32 = 30.0;

/// Radius grows linearly with the affinity score.
pub fn node_radius(affinity_score: f32) -> f32 {
    let score = if affinity_score.is_finite() {
        affinity_score.clamp(0.0, 100.0)
    } else {
        0.0
    };
    MIN_NODE_RADIUS + (score / 100.0) * (MAX_NODE_RADIUS - MIN_NODE_RADIUS)
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub entity: Arc<Entity>,
}

impl Node {
    pub fn new(entity: Arc<Entity>) -> Self {
        Self {
            id: entity.id.clone(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            radius: node_radius(entity.affinity_score),
            entity,
        }
    }

    pub fn category(&self) -> Category {
        self.entity.category
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    SameEmployer,
    SharedTransaction,
    HighAffinityPair,
}

impl LinkKind {
    pub fn strength(self) -> f32 {
        match self {
            Self::SameEmployer => 0.8,
            Self::SharedTransaction => 0.9,
            Self::HighAffinityPair => 0.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SameEmployer => "same employer",
            Self::SharedTransaction => "shared transaction",
            Self::HighAffinityPair => "high affinity",
        }
    }
}

/// Unordered relation between two nodes, stored as indices into the node set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub strength: f32,
    pub kind: LinkKind,
}

impl Link {
    /// Order-independent identity of the pair.
    pub fn key(&self) -> (usize, usize) {
        pair_key(self.source, self.target)
    }

    pub fn touches(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }
}

pub(crate) fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub index_by_id: HashMap<String, usize>,
}

impl Graph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    /// Ids of the nodes directly linked to `id`, in link order.
    pub fn neighbor_ids(&self, id: &str) -> Vec<&str> {
        let Some(&index) = self.index_by_id.get(id) else {
            return Vec::new();
        };

        self.links
            .iter()
            .filter(|link| link.touches(index))
            .map(|link| {
                let other = if link.source == index {
                    link.target
                } else {
                    link.source
                };
                self.nodes[other].id.as_str()
            })
            .collect()
    }
}
