//! Turns the current graph, viewport and interaction state into an ordered
//! list of [`DrawCommand`]s. Pure: no state is read or written besides the
//! arguments.

mod command;
mod palette;

use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Align2, Pos2, Rect, Stroke, Vec2, pos2, vec2};

use crate::network::{Link, Node};
use crate::util::format_score;
use crate::viewport::{InteractionState, Viewport};

pub use command::DrawCommand;
pub use palette::{GraphPalette, link_width};

const EMPHASIS_LINK_WIDTH: f32 = 3.0;
const NODE_BORDER_WIDTH: f32 = 2.0;
const EMPHASIS_BORDER_WIDTH: f32 = 3.0;
const RING_GAP: f32 = 4.0;
const RING_WIDTH: f32 = 3.0;
const TOOLTIP_PADDING: f32 = 8.0;
const TOOLTIP_OFFSET: f32 = 12.0;
const TOOLTIP_MARGIN: f32 = 4.0;
const TOOLTIP_TITLE_SIZE: f32 = 13.0;
const TOOLTIP_TEXT_SIZE: f32 = 12.0;
const TOOLTIP_LINE_GAP: f32 = 4.0;

/// Measures rendered text so boxes can be sized to fit.
pub trait TextMeasure {
    fn width(&self, text: &str, size: f32) -> f32;
}

/// Average-glyph estimate for contexts without a font backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxTextMeasure;

impl TextMeasure for ApproxTextMeasure {
    fn width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.56
    }
}

/// Everything a render pass reads.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub nodes: &'a [Node],
    pub links: &'a [Link],
    pub viewport: &'a Viewport,
    pub interaction: &'a InteractionState,
    pub canvas: Vec2,
}

pub fn render(
    scene: &Scene<'_>,
    palette: &GraphPalette,
    measure: &dyn TextMeasure,
) -> Vec<DrawCommand> {
    let visible = scene
        .nodes
        .iter()
        .map(|node| scene.interaction.is_visible(node))
        .collect::<Vec<_>>();
    if !visible.iter().any(|shown| *shown) {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(scene.links.len() + scene.nodes.len() * 3 + 8);
    commands.push(DrawCommand::SetTransform {
        zoom: scene.viewport.zoom,
        pan: scene.viewport.pan,
    });

    draw_links(scene, &visible, palette, &mut commands);

    // Emphasized nodes go last so they sit on top.
    let (plain, emphasized): (Vec<usize>, Vec<usize>) = (0..scene.nodes.len())
        .filter(|&index| visible[index])
        .partition(|&index| !scene.interaction.is_emphasized(&scene.nodes[index].id));
    for index in plain.into_iter().chain(emphasized) {
        draw_node(&scene.nodes[index], scene.interaction, palette, &mut commands);
    }

    commands.push(DrawCommand::ResetTransform);

    if let Some(node) = scene
        .interaction
        .hovered
        .as_deref()
        .and_then(|id| scene.nodes.iter().find(|node| node.id == id))
        .filter(|node| scene.interaction.is_visible(node))
    {
        draw_tooltip(node, scene, palette, measure, &mut commands);
    }

    commands
}

fn draw_links(
    scene: &Scene<'_>,
    visible: &[bool],
    palette: &GraphPalette,
    commands: &mut Vec<DrawCommand>,
) {
    for link in scene.links {
        let (Some(&source_visible), Some(&target_visible)) =
            (visible.get(link.source), visible.get(link.target))
        else {
            continue;
        };
        if !source_visible || !target_visible {
            continue;
        }

        let source = &scene.nodes[link.source];
        let target = &scene.nodes[link.target];
        let on_path = scene.interaction.in_path(&source.id) && scene.interaction.in_path(&target.id);
        let stroke = if on_path {
            Stroke::new(EMPHASIS_LINK_WIDTH, palette.emphasis)
        } else {
            Stroke::new(link_width(link.kind), palette.link(link.kind))
        };

        commands.push(DrawCommand::Line {
            from: source.position.to_pos2(),
            to: target.position.to_pos2(),
            stroke,
        });
    }
}

fn draw_node(
    node: &Node,
    interaction: &InteractionState,
    palette: &GraphPalette,
    commands: &mut Vec<DrawCommand>,
) {
    let center = node.position.to_pos2();
    let base = palette.category(node.category());
    let stroke = if interaction.is_emphasized(&node.id) {
        Stroke::new(EMPHASIS_BORDER_WIDTH, palette.emphasis)
    } else {
        Stroke::new(NODE_BORDER_WIDTH, base)
    };

    commands.push(DrawCommand::Circle {
        center,
        radius: node.radius,
        fill: base,
        stroke,
    });

    let sweep = affinity_sweep(node.entity.affinity_score);
    if sweep > 0.0 {
        commands.push(DrawCommand::Arc {
            center,
            radius: node.radius + RING_GAP,
            start_angle: -FRAC_PI_2,
            sweep,
            stroke: Stroke::new(RING_WIDTH, palette.score_ring),
        });
    }

    commands.push(DrawCommand::Text {
        position: center,
        anchor: Align2::CENTER_CENTER,
        text: node.entity.initials(),
        size: (node.radius * 0.7).round(),
        color: palette.initials,
    });
}

/// Score 0..=100 mapped onto a full turn starting at twelve o'clock.
pub fn affinity_sweep(score: f32) -> f32 {
    if !score.is_finite() {
        return 0.0;
    }
    (score.clamp(0.0, 100.0) / 100.0) * TAU
}

fn tooltip_lines(node: &Node) -> Vec<(String, f32)> {
    let entity = &node.entity;
    let mut lines = vec![(entity.display_name(), TOOLTIP_TITLE_SIZE)];
    for extra in [&entity.title, &entity.company].into_iter().flatten() {
        if !extra.trim().is_empty() {
            lines.push((extra.trim().to_owned(), TOOLTIP_TEXT_SIZE));
        }
    }
    lines.push((
        format!("Affinity score: {}", format_score(entity.affinity_score)),
        TOOLTIP_TEXT_SIZE,
    ));
    lines
}

fn draw_tooltip(
    node: &Node,
    scene: &Scene<'_>,
    palette: &GraphPalette,
    measure: &dyn TextMeasure,
    commands: &mut Vec<DrawCommand>,
) {
    let lines = tooltip_lines(node);
    let text_width = lines
        .iter()
        .map(|(text, size)| measure.width(text, *size))
        .fold(0.0_f32, f32::max);
    let text_height = lines
        .iter()
        .map(|(_, size)| size + TOOLTIP_LINE_GAP)
        .sum::<f32>()
        - TOOLTIP_LINE_GAP;
    let size = vec2(
        text_width + TOOLTIP_PADDING * 2.0,
        text_height + TOOLTIP_PADDING * 2.0,
    );

    let anchor = scene.viewport.graph_to_screen(node.position);
    let reach = node.radius * scene.viewport.zoom + TOOLTIP_OFFSET;
    let mut left = anchor.x + reach;
    if left + size.x > scene.canvas.x {
        left = anchor.x - reach - size.x;
    }
    let top = (anchor.y - size.y * 0.5)
        .min(scene.canvas.y - size.y - TOOLTIP_MARGIN)
        .max(TOOLTIP_MARGIN);

    let rect = Rect::from_min_size(pos2(left, top), size);
    commands.push(DrawCommand::RoundedRect {
        rect,
        corner_radius: 6.0,
        fill: palette.tooltip_fill,
        stroke: Stroke::new(1.0, palette.tooltip_border),
    });

    let mut cursor = Pos2::new(rect.left() + TOOLTIP_PADDING, rect.top() + TOOLTIP_PADDING);
    for (index, (text, text_size)) in lines.into_iter().enumerate() {
        commands.push(DrawCommand::Text {
            position: cursor,
            anchor: Align2::LEFT_TOP,
            text,
            size: text_size,
            color: if index == 0 {
                palette.tooltip_title
            } else {
                palette.tooltip_text
            },
        });
        cursor.y += text_size + TOOLTIP_LINE_GAP;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::entity::{Category, test_entity};
    use crate::network::LinkKind;

    fn node(id: &str, category: Category, score: f32, position: Vec2) -> Node {
        let mut node = Node::new(Arc::new(test_entity(id, category, score)));
        node.position = position;
        node
    }

    fn fixture() -> (Vec<Node>, Vec<Link>) {
        let nodes = vec![
            node("ann", Category::Founder, 50.0, vec2(100.0, 100.0)),
            node("bob", Category::Investor, 0.0, vec2(250.0, 100.0)),
            node("cy", Category::Founder, 100.0, vec2(100.0, 250.0)),
        ];
        let links = vec![
            Link {
                source: 0,
                target: 1,
                strength: 0.8,
                kind: LinkKind::SameEmployer,
            },
            Link {
                source: 0,
                target: 2,
                strength: 0.9,
                kind: LinkKind::SharedTransaction,
            },
        ];
        (nodes, links)
    }

    fn run(nodes: &[Node], links: &[Link], interaction: &InteractionState) -> Vec<DrawCommand> {
        let viewport = Viewport::default();
        let scene = Scene {
            nodes,
            links,
            viewport: &viewport,
            interaction,
            canvas: vec2(800.0, 600.0),
        };
        render(&scene, &GraphPalette::default(), &ApproxTextMeasure)
    }

    fn count(commands: &[DrawCommand], pred: impl Fn(&DrawCommand) -> bool) -> usize {
        commands.iter().filter(|command| pred(command)).count()
    }

    #[test]
    fn empty_graph_draws_nothing() {
        assert!(run(&[], &[], &InteractionState::default()).is_empty());
    }

    #[test]
    fn filter_matching_nothing_draws_nothing() {
        let (nodes, links) = fixture();
        let interaction = InteractionState {
            category_filter: Some(Category::Banker),
            ..InteractionState::default()
        };
        assert!(run(&nodes, &links, &interaction).is_empty());
    }

    #[test]
    fn draws_every_link_and_node_inside_the_transform() {
        let (nodes, links) = fixture();
        let commands = run(&nodes, &links, &InteractionState::default());

        assert!(matches!(commands.first(), Some(DrawCommand::SetTransform { zoom, .. }) if *zoom == 1.0));
        assert_eq!(commands.last(), Some(&DrawCommand::ResetTransform));
        assert_eq!(count(&commands, |c| matches!(c, DrawCommand::Line { .. })), 2);
        assert_eq!(count(&commands, |c| matches!(c, DrawCommand::Circle { .. })), 3);
        // bob has score 0 and gets no ring
        assert_eq!(count(&commands, |c| matches!(c, DrawCommand::Arc { .. })), 2);
        assert!(commands.iter().any(|c| c.is_text("A")));
    }

    #[test]
    fn filter_hides_nodes_and_their_links() {
        let (nodes, links) = fixture();
        let interaction = InteractionState {
            category_filter: Some(Category::Founder),
            ..InteractionState::default()
        };
        let commands = run(&nodes, &links, &interaction);

        assert_eq!(count(&commands, |c| matches!(c, DrawCommand::Circle { .. })), 2);
        let lines = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { stroke, .. } => Some(*stroke),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![Stroke::new(2.5, GraphPalette::default().link_shared_transaction)]
        );
    }

    #[test]
    fn path_links_and_nodes_are_emphasized() {
        let (nodes, links) = fixture();
        let palette = GraphPalette::default();
        let interaction = InteractionState {
            highlight_path: HashSet::from(["ann".to_owned(), "bob".to_owned()]),
            ..InteractionState::default()
        };
        let commands = run(&nodes, &links, &interaction);

        let emphasized_lines = count(&commands, |c| {
            matches!(c, DrawCommand::Line { stroke, .. } if stroke.color == palette.emphasis)
        });
        assert_eq!(emphasized_lines, 1);

        let circles = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { stroke, fill, .. } => Some((*stroke, *fill)),
                _ => None,
            })
            .collect::<Vec<_>>();
        // cy is drawn first, the two path nodes after it
        assert_eq!(circles[0].0.color, palette.category(Category::Founder));
        assert_eq!(circles[1].0.color, palette.emphasis);
        assert_eq!(circles[2].0.color, palette.emphasis);
        assert_eq!(circles[2].1, palette.category(Category::Investor));
    }

    fn circle_strokes(commands: &[DrawCommand]) -> Vec<(Pos2, Stroke)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { center, stroke, .. } => Some((*center, *stroke)),
                _ => None,
            })
            .collect()
    }

    fn assert_ann_on_top(interaction: &InteractionState) {
        let (nodes, links) = fixture();
        let palette = GraphPalette::default();
        let commands = run(&nodes, &links, interaction);

        let circles = circle_strokes(&commands);
        assert_eq!(circles.len(), 3);
        let (center, stroke) = circles[2];
        assert_eq!(center, nodes[0].position.to_pos2());
        assert_eq!(stroke, Stroke::new(EMPHASIS_BORDER_WIDTH, palette.emphasis));
        assert!(circles[..2].iter().all(|(_, stroke)| stroke.color != palette.emphasis));
    }

    #[test]
    fn hovered_node_is_emphasized_and_drawn_last() {
        assert_ann_on_top(&InteractionState {
            hovered: Some("ann".to_owned()),
            ..InteractionState::default()
        });
    }

    #[test]
    fn selected_node_is_emphasized_and_drawn_last() {
        assert_ann_on_top(&InteractionState {
            selected: Some("ann".to_owned()),
            ..InteractionState::default()
        });
    }

    #[test]
    fn ring_sweep_is_proportional_to_score() {
        assert_eq!(affinity_sweep(0.0), 0.0);
        assert!((affinity_sweep(25.0) - FRAC_PI_2).abs() < 1e-6);
        assert!((affinity_sweep(100.0) - TAU).abs() < 1e-6);
        assert_eq!(affinity_sweep(f32::NAN), 0.0);

        let (nodes, links) = fixture();
        let commands = run(&nodes, &links, &InteractionState::default());
        let arc = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Arc {
                    start_angle, sweep, ..
                } => Some((*start_angle, *sweep)),
                _ => None,
            })
            .unwrap();
        assert_eq!(arc.0, -FRAC_PI_2);
        assert!((arc.1 - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn hovered_node_gets_a_screen_space_tooltip() {
        let (mut nodes, links) = fixture();
        let mut entity = (*nodes[0].entity).clone();
        entity.title = Some("Partner".to_owned());
        entity.company = Some("Acme Ventures".to_owned());
        nodes[0].entity = Arc::new(entity);

        let interaction = InteractionState {
            hovered: Some("ann".to_owned()),
            ..InteractionState::default()
        };
        let commands = run(&nodes, &links, &interaction);

        let reset_at = commands
            .iter()
            .position(|c| *c == DrawCommand::ResetTransform)
            .unwrap();
        let tooltip = &commands[reset_at + 1..];
        let Some(DrawCommand::RoundedRect { rect, .. }) = tooltip.first() else {
            panic!("tooltip box missing: {tooltip:?}");
        };
        let texts = tooltip
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            texts,
            vec!["ann", "Partner", "Acme Ventures", "Affinity score: 50"]
        );

        let widest = ApproxTextMeasure.width("Affinity score: 50", TOOLTIP_TEXT_SIZE);
        assert!((rect.width() - (widest + TOOLTIP_PADDING * 2.0)).abs() < 1e-3);
        assert!(rect.left() > 100.0 + nodes[0].radius);
    }

    #[test]
    fn tooltip_flips_left_near_the_right_edge() {
        let nodes = vec![node("zed", Category::Banker, 10.0, vec2(790.0, 300.0))];
        let interaction = InteractionState {
            hovered: Some("zed".to_owned()),
            ..InteractionState::default()
        };
        let commands = run(&nodes, &[], &interaction);

        let rect = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::RoundedRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert!(rect.right() < 790.0);
    }

    #[test]
    fn hidden_hovered_node_has_no_tooltip() {
        let (nodes, links) = fixture();
        let interaction = InteractionState {
            hovered: Some("bob".to_owned()),
            category_filter: Some(Category::Founder),
            ..InteractionState::default()
        };
        let commands = run(&nodes, &links, &interaction);
        assert!(!commands
            .iter()
            .any(|c| matches!(c, DrawCommand::RoundedRect { .. })));
    }
}
