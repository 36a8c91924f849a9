use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::entity::Entity;

use super::{Graph, Link, LinkKind, Node, pair_key};

const AFFINITY_SOURCE_MIN: f32 = 80.0;
const AFFINITY_CANDIDATE_MIN: f32 = 75.0;
const AFFINITY_LINKS_PER_SOURCE: usize = 2;

/// Accumulates links, refusing self pairs and pairs already present.
struct LinkSet {
    links: Vec<Link>,
    seen: HashSet<(usize, usize)>,
}

impl LinkSet {
    fn new() -> Self {
        Self {
            links: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn contains(&self, a: usize, b: usize) -> bool {
        self.seen.contains(&pair_key(a, b))
    }

    fn insert(&mut self, source: usize, target: usize, kind: LinkKind) -> bool {
        if source == target || !self.seen.insert(pair_key(source, target)) {
            return false;
        }

        self.links.push(Link {
            source,
            target,
            strength: kind.strength(),
            kind,
        });
        true
    }

    fn link_all_pairs(&mut self, members: &[usize], kind: LinkKind) {
        for (offset, &source) in members.iter().enumerate() {
            for &target in &members[offset + 1..] {
                self.insert(source, target, kind);
            }
        }
    }
}

/// Groups entity indices by key, keeping groups in first-seen order.
fn group_by<'a>(
    entities: &'a [Entity],
    keys: impl Fn(&'a Entity) -> Vec<&'a str>,
) -> Vec<Vec<usize>> {
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (index, entity) in entities.iter().enumerate() {
        let mut entity_keys = keys(entity);
        entity_keys.sort_unstable();
        entity_keys.dedup();

        for key in entity_keys {
            let slot = *group_index.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(index);
        }
    }

    groups
}

fn link_same_employer(entities: &[Entity], links: &mut LinkSet) {
    let groups = group_by(entities, |entity| entity.employer().into_iter().collect());
    for members in groups {
        links.link_all_pairs(&members, LinkKind::SameEmployer);
    }
}

fn link_shared_transactions(entities: &[Entity], links: &mut LinkSet) {
    let groups = group_by(entities, |entity| {
        entity
            .transaction_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect()
    });
    for members in groups {
        links.link_all_pairs(&members, LinkKind::SharedTransaction);
    }
}

fn link_high_affinity(entities: &[Entity], links: &mut LinkSet) {
    for (source, entity) in entities.iter().enumerate() {
        if entity.affinity_score < AFFINITY_SOURCE_MIN {
            continue;
        }

        let mut linked = 0usize;
        for (target, candidate) in entities.iter().enumerate() {
            if linked >= AFFINITY_LINKS_PER_SOURCE {
                break;
            }
            if target == source
                || candidate.affinity_score < AFFINITY_CANDIDATE_MIN
                || links.contains(source, target)
            {
                continue;
            }
            if links.insert(source, target, LinkKind::HighAffinityPair) {
                linked += 1;
            }
        }
    }
}

/// Builds the node set (input order) and the deduplicated link set.
///
/// Rules run in a fixed order and the first rule to relate a pair decides its
/// kind and strength. Entity ids are expected to be unique.
pub fn build_graph(entities: &[Entity]) -> Graph {
    let nodes = entities
        .iter()
        .map(|entity| Node::new(Arc::new(entity.clone())))
        .collect::<Vec<_>>();

    let mut index_by_id = HashMap::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        index_by_id.entry(node.id.clone()).or_insert(index);
    }

    let mut links = LinkSet::new();
    link_same_employer(entities, &mut links);
    link_shared_transactions(entities, &mut links);
    link_high_affinity(entities, &mut links);

    tracing::debug!(
        nodes = nodes.len(),
        links = links.links.len(),
        "built relationship graph"
    );

    Graph {
        nodes,
        links: links.links,
        index_by_id,
    }
}
