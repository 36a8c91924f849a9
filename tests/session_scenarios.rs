use std::path::Path;

use eframe::egui::{pos2, vec2};
use relnet::source::load_entities;
use relnet::{
    Category, DrawCommand, Entity, GraphSession, LinkKind, WheelDirection, build_graph,
    render::ApproxTextMeasure,
};

fn entity(id: &str, category: Category, score: f32) -> Entity {
    Entity {
        id: id.to_owned(),
        first_name: id.to_owned(),
        last_name: String::new(),
        title: None,
        company: None,
        category,
        affinity_score: score,
        employer_id: None,
        transaction_ids: Vec::new(),
    }
}

fn employed(id: &str, employer: &str) -> Entity {
    Entity {
        employer_id: Some(employer.to_owned()),
        ..entity(id, Category::Executive, 10.0)
    }
}

#[test]
fn shared_employer_forms_a_complete_triangle() {
    let graph = build_graph(&[
        employed("a", "acme"),
        employed("b", "acme"),
        employed("c", "acme"),
    ]);

    assert_eq!(graph.links.len(), 3);
    for link in &graph.links {
        assert_eq!(link.kind, LinkKind::SameEmployer);
        assert!((link.strength - 0.8).abs() < 1e-6);
    }
}

#[test]
fn first_rule_wins_for_duplicate_pairs() {
    let mut a = employed("a", "acme");
    let mut b = employed("b", "acme");
    a.transaction_ids = vec!["deal-1".to_owned()];
    b.transaction_ids = vec!["deal-1".to_owned()];

    let graph = build_graph(&[a, b]);

    assert_eq!(graph.links.len(), 1);
    assert_eq!(graph.links[0].kind, LinkKind::SameEmployer);
}

#[test]
fn high_affinity_links_skip_low_scores() {
    let graph = build_graph(&[
        entity("top", Category::Founder, 95.0),
        entity("ninety", Category::Investor, 90.0),
        entity("seventy-six", Category::Banker, 76.0),
        entity("fifty", Category::Advisor, 50.0),
    ]);

    let mut neighbors = graph.neighbor_ids("top");
    neighbors.sort_unstable();
    assert_eq!(neighbors, vec!["ninety", "seventy-six"]);
    assert!(graph.neighbor_ids("fifty").is_empty());
}

#[test]
fn dragging_empty_space_pans_by_pointer_delta() {
    let entities = [entity("solo", Category::Founder, 40.0)];
    let mut session = GraphSession::new(&entities, vec2(800.0, 600.0), 3);

    // Outside the canvas bounds, so no node can be under it.
    let start = pos2(-400.0, -400.0);
    assert!(session.pointer_down(start).is_none());
    session.pointer_move(start + vec2(50.0, 30.0));
    session.pointer_up();

    assert_eq!(session.viewport().zoom, 1.0);
    assert_eq!(session.viewport().pan, vec2(50.0, 30.0));
    assert!(!session.viewport().is_dragging());
}

#[test]
fn zooming_out_stops_at_half_scale() {
    let mut session = GraphSession::new(&[], vec2(800.0, 600.0), 0);
    for _ in 0..50 {
        session.wheel(WheelDirection::Down);
    }
    assert_eq!(session.viewport().zoom, 0.5);
}

#[test]
fn clicking_a_node_reports_its_entity_and_shows_tooltip() {
    let entities = [entity("only", Category::Organization, 100.0)];
    let mut session = GraphSession::new(&entities, vec2(640.0, 480.0), 9);

    let node_position = session.simulation().nodes()[0].position;
    let screen = session.viewport().graph_to_screen(node_position);

    let picked = session.pointer_down(screen).map(|entity| entity.id.clone());
    session.pointer_up();
    assert_eq!(picked.as_deref(), Some("only"));

    session.set_selected(picked);
    let commands = session.render(&ApproxTextMeasure);
    assert!(commands.iter().any(|command| command.is_text("Affinity score: 100")));
    assert!(
        commands
            .iter()
            .any(|command| matches!(command, DrawCommand::RoundedRect { .. }))
    );
}

#[test]
fn bundled_sample_data_loads_and_links() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/entities.json");
    let entities = load_entities(&path).expect("sample entities load");
    assert_eq!(entities.len(), 12);
    assert!(
        entities
            .iter()
            .any(|entity| entity.category == Category::Uncategorized)
    );

    let mut session = GraphSession::new(&entities, vec2(1200.0, 800.0), 42);
    assert!(!session.simulation().links().is_empty());
    for _ in 0..120 {
        session.tick(1.0 / 60.0);
    }
    for node in session.simulation().nodes() {
        assert!(node.position.x >= node.radius - 1e-3);
        assert!(node.position.x <= 1200.0 - node.radius + 1e-3);
        assert!(node.position.y >= node.radius - 1e-3);
        assert!(node.position.y <= 800.0 - node.radius + 1e-3);
    }
}
