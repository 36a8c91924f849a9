use std::f32::consts::TAU;

use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, Ui,
    Vec2, pos2,
};
use relnet::{DrawCommand, GraphSession, TextMeasure, WheelDirection};

use super::{ViewModel, layout_seed};

const ARC_SEGMENTS_PER_TURN: f32 = 64.0;

/// Sizes text with the painter's real fonts.
struct PainterTextMeasure<'a> {
    painter: &'a Painter,
}

impl TextMeasure for PainterTextMeasure<'_> {
    fn width(&self, text: &str, size: f32) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), FontId::proportional(size), Color32::WHITE)
            .size()
            .x
    }
}

/// Maps command coordinates onto the canvas rect.
#[derive(Clone, Copy)]
struct CanvasTransform {
    origin: Vec2,
    zoom: f32,
    pan: Vec2,
}

impl CanvasTransform {
    fn screen(origin: Vec2) -> Self {
        Self {
            origin,
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }

    fn point(self, point: Pos2) -> Pos2 {
        (point.to_vec2() * self.zoom + self.pan + self.origin).to_pos2()
    }

    fn length(self, length: f32) -> f32 {
        length * self.zoom
    }

    fn stroke(self, stroke: Stroke) -> Stroke {
        Stroke::new(self.length(stroke.width), stroke.color)
    }
}

fn draw_background(painter: &Painter, rect: Rect, session: &GraphSession) {
    let palette = session.palette();
    let viewport = session.viewport();
    painter.rect_filled(rect, 0.0, palette.background);

    let step = (56.0 * viewport.zoom).max(20.0);
    let origin = rect.min + viewport.pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 60));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
        y += step;
    }
}

fn arc_points(center: Pos2, radius: f32, start_angle: f32, sweep: f32) -> Vec<Pos2> {
    let segments = ((sweep.abs() / TAU) * ARC_SEGMENTS_PER_TURN).ceil().max(8.0) as usize;
    (0..=segments)
        .map(|step| {
            let angle = start_angle + sweep * (step as f32 / segments as f32);
            center + Vec2::angled(angle) * radius
        })
        .collect()
}

fn paint_commands(painter: &Painter, rect: Rect, commands: &[DrawCommand]) {
    let origin = rect.min.to_vec2();
    let mut transform = CanvasTransform::screen(origin);

    for command in commands {
        match command {
            DrawCommand::SetTransform { zoom, pan } => {
                transform = CanvasTransform {
                    origin,
                    zoom: *zoom,
                    pan: *pan,
                };
            }
            DrawCommand::ResetTransform => transform = CanvasTransform::screen(origin),
            DrawCommand::Line { from, to, stroke } => {
                painter.line_segment(
                    [transform.point(*from), transform.point(*to)],
                    transform.stroke(*stroke),
                );
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                painter.circle(
                    transform.point(*center),
                    transform.length(*radius),
                    *fill,
                    transform.stroke(*stroke),
                );
            }
            DrawCommand::Arc {
                center,
                radius,
                start_angle,
                sweep,
                stroke,
            } => {
                let points = arc_points(
                    transform.point(*center),
                    transform.length(*radius),
                    *start_angle,
                    *sweep,
                );
                painter.add(Shape::line(points, transform.stroke(*stroke)));
            }
            DrawCommand::Text {
                position,
                anchor,
                text,
                size,
                color,
            } => {
                painter.text(
                    transform.point(*position),
                    *anchor,
                    text,
                    FontId::proportional(transform.length(*size).max(1.0)),
                    *color,
                );
            }
            DrawCommand::RoundedRect {
                rect: command_rect,
                corner_radius,
                fill,
                stroke,
            } => {
                let min = transform.point(command_rect.min);
                let max = transform.point(command_rect.max);
                painter.rect(
                    Rect::from_min_max(min, max),
                    transform.length(*corner_radius),
                    *fill,
                    transform.stroke(*stroke),
                    StrokeKind::Inside,
                );
            }
        }
    }
}

impl ViewModel {
    fn ensure_session(&mut self, size: Vec2) {
        if self.session.is_some() || size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let Some(entities) = self.pending_entities.take() else {
            return;
        };

        let mut session = GraphSession::new(&entities, size, layout_seed(self.seed));
        session.set_category_filter(self.category_filter);
        self.session = Some(session);
        self.refresh_highlight();
    }

    fn handle_canvas_input(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        let (hover_pos, latest_pos, pressed, released, scroll) = ui.input(|input| {
            (
                input.pointer.hover_pos(),
                input.pointer.latest_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.raw_scroll_delta.y,
            )
        });
        let to_canvas = |pos: Pos2| (pos - rect.min).to_pos2();

        let Some(session) = self.session.as_mut() else {
            return;
        };

        let dragging = session.viewport().is_dragging();
        match hover_pos.filter(|pos| rect.contains(*pos)) {
            Some(pos) => session.pointer_move(to_canvas(pos)),
            None => {
                if dragging && let Some(pos) = latest_pos {
                    session.pointer_move(to_canvas(pos));
                }
                session.pointer_leave();
            }
        }

        let mut selection = None;
        if pressed
            && let Some(pos) = hover_pos.filter(|pos| rect.contains(*pos))
            && let Some(entity) = session.pointer_down(to_canvas(pos))
        {
            selection = Some(Some(entity.id.clone()));
        }

        if released {
            session.pointer_up();
        }

        if response.clicked() && session.hovered_entity().is_none() {
            selection = Some(None);
        }

        if response.hovered()
            && let Some(direction) = WheelDirection::from_delta(scroll)
        {
            session.wheel(direction);
        }

        if let Some(selection) = selection {
            self.set_selected(selection.as_deref());
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.ensure_session(rect.size());

        self.handle_canvas_input(ui, rect, &response);

        let dt = ui.input(|input| input.stable_dt);
        let live_physics = self.live_physics;
        let pause_when_settled = self.pause_when_settled;

        let Some(session) = self.session.as_mut() else {
            ui.painter_at(rect)
                .rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
            return;
        };

        session.resize(rect.size());

        let mut moving = false;
        if live_physics {
            let report = session.tick(dt);
            moving = report.moving;
            self.last_tick = Some(report);
        }

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, session);

        let commands = session.render(&PainterTextMeasure { painter: &painter });
        if commands.is_empty() {
            let message = if session.simulation().nodes().is_empty() {
                "No entities to display."
            } else {
                "No entities match the current category filter."
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(15.0),
                Color32::from_gray(170),
            );
        } else {
            paint_commands(&painter, rect, &commands);
        }

        let settled = pause_when_settled && !moving;
        if (live_physics && !settled) || session.viewport().is_dragging() {
            ui.ctx().request_repaint();
        }
    }
}
