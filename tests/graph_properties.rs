use std::collections::{HashMap, HashSet};

use eframe::egui::{pos2, vec2};
use proptest::prelude::*;
use relnet::viewport::{MAX_ZOOM, MIN_ZOOM};
use relnet::{
    Category, Entity, ForceParams, GraphSession, LinkKind, WheelDirection, build_graph,
};

fn entity_strategy(index: usize) -> impl Strategy<Value = Entity> {
    (
        0usize..Category::ALL.len(),
        0.0f32..=100.0,
        proptest::option::of(prop::sample::select(vec!["acme", "globex", "initech"])),
        prop::collection::vec(prop::sample::select(vec!["d1", "d2", "d3", "d4"]), 0..3),
    )
        .prop_map(move |(category, score, employer, transactions)| Entity {
            id: format!("e{index}"),
            first_name: format!("First{index}"),
            last_name: "Last".to_owned(),
            title: None,
            company: None,
            category: Category::ALL[category],
            affinity_score: score,
            employer_id: employer.map(str::to_owned),
            transaction_ids: transactions.into_iter().map(str::to_owned).collect(),
        })
}

fn entities_strategy() -> impl Strategy<Value = Vec<Entity>> {
    (0usize..24).prop_flat_map(|count| {
        (0..count)
            .map(entity_strategy)
            .collect::<Vec<_>>()
    })
}

proptest! {
    #[test]
    fn links_are_unique_and_never_self(entities in entities_strategy()) {
        let graph = build_graph(&entities);
        let mut seen = HashSet::new();
        for link in &graph.links {
            prop_assert_ne!(link.source, link.target);
            prop_assert!(seen.insert(link.key()));
        }
    }

    #[test]
    fn shared_employers_are_fully_linked(entities in entities_strategy()) {
        let graph = build_graph(&entities);
        let pairs = graph
            .links
            .iter()
            .map(|link| (link.key(), link))
            .collect::<HashMap<_, _>>();
        for (i, a) in entities.iter().enumerate() {
            for (j, b) in entities.iter().enumerate().skip(i + 1) {
                if a.employer().is_some() && a.employer() == b.employer() {
                    let link = pairs.get(&(i, j));
                    prop_assert!(link.is_some());
                    if let Some(link) = link {
                        prop_assert_eq!(link.kind, LinkKind::SameEmployer);
                        prop_assert!((link.strength - 0.8).abs() < 1e-6);
                    }
                }
            }
        }
    }

    #[test]
    fn derivation_is_deterministic(entities in entities_strategy()) {
        let first = build_graph(&entities);
        let second = build_graph(&entities);
        let keys = |graph: &relnet::Graph| {
            graph
                .links
                .iter()
                .map(|link| (link.key(), link.kind))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(keys(&first), keys(&second));
    }

    #[test]
    fn nodes_stay_inside_the_canvas(
        entities in entities_strategy(),
        width in 80.0f32..1600.0,
        height in 80.0f32..1200.0,
        seed in any::<u64>(),
        ticks in 1usize..60,
    ) {
        let mut session = GraphSession::new(&entities, vec2(width, height), seed);
        for _ in 0..ticks {
            session.tick(1.0 / 60.0);
        }
        for node in session.simulation().nodes() {
            prop_assert!(node.position.x.is_finite() && node.position.y.is_finite());
            prop_assert!(node.position.x >= node.radius - 1e-3);
            prop_assert!(node.position.x <= width - node.radius + 1e-3);
            prop_assert!(node.position.y >= node.radius - 1e-3);
            prop_assert!(node.position.y <= height - node.radius + 1e-3);
        }
        prop_assert_eq!(*session.params(), ForceParams::default());
    }

    #[test]
    fn zoom_stays_clamped(wheel in prop::collection::vec(any::<bool>(), 0..80)) {
        let mut session = GraphSession::new(&[], vec2(400.0, 300.0), 0);
        for up in wheel {
            session.wheel(if up { WheelDirection::Up } else { WheelDirection::Down });
            let zoom = session.viewport().zoom;
            prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom));
        }
    }

    #[test]
    fn filtered_out_nodes_are_never_hovered(
        entities in entities_strategy(),
        filter in 0usize..Category::ALL.len(),
        seed in any::<u64>(),
    ) {
        let filter = Category::ALL[filter];
        let mut session = GraphSession::new(&entities, vec2(900.0, 700.0), seed);
        session.set_category_filter(Some(filter));

        let positions = session
            .simulation()
            .nodes()
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();
        for position in positions {
            session.pointer_move(pos2(position.x, position.y));
            if let Some(hovered) = session.hovered_entity() {
                prop_assert_eq!(hovered.category, filter);
            }
        }
    }
}
