use eframe::egui::{self, RichText, Ui};
use relnet::{Category, LinkKind, render::link_width};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Network Controls");
        ui.add_space(6.0);

        ui.label("Search");
        let search_response = ui.text_edit_singleline(&mut self.search);
        if search_response.changed() {
            self.refresh_highlight();
        }
        if let Some(matches) = self.cached_search_matches() {
            ui.small(format!("{} matching entities", matches.len()));
        }

        ui.separator();
        self.draw_category_filter(ui);

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Reset view").clicked()
                && let Some(session) = self.session.as_mut()
            {
                session.reset_view();
            }
            if ui.button("Clear selection").clicked() {
                self.set_selected(None);
            }
        });
        if let Some(session) = &self.session {
            let viewport = session.viewport();
            ui.small(format!(
                "zoom {:.2}x  pan ({:.0}, {:.0})",
                viewport.zoom, viewport.pan.x, viewport.pan.y
            ));
        }

        ui.separator();
        self.draw_physics_controls(ui);

        ui.separator();
        self.draw_legend(ui);
    }

    fn draw_category_filter(&mut self, ui: &mut Ui) {
        let mut filter = self.category_filter;
        let selected_text = filter.map_or("All categories", Category::label);

        egui::ComboBox::from_label("Category")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filter, None, "All categories");
                for category in Category::ALL {
                    ui.selectable_value(&mut filter, Some(category), category.label());
                }
            });

        if filter != self.category_filter {
            tracing::debug!(?filter, "category filter changed");
            self.set_category_filter(filter);
        }

        if self.initial_category.is_some() && self.category_filter != self.initial_category {
            ui.small("Startup filter overridden.");
        }
    }

    fn draw_physics_controls(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Physics").strong());
        ui.checkbox(&mut self.live_physics, "Live simulation");
        ui.checkbox(&mut self.pause_when_settled, "Pause when settled");

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let params = session.params_mut();

        ui.add(egui::Slider::new(&mut params.centering, 0.0..=0.01).text("Centering"));
        ui.add(egui::Slider::new(&mut params.repulsion, 0.0..=2.0).text("Repulsion"));
        ui.add(
            egui::Slider::new(&mut params.collision_padding, 0.0..=60.0).text("Collision padding"),
        );
        ui.add(egui::Slider::new(&mut params.spring, 0.0..=0.05).text("Spring"));
        ui.add(egui::Slider::new(&mut params.spring_length, 20.0..=300.0).text("Spring length"));
        ui.add(egui::Slider::new(&mut params.damping, 0.5..=0.99).text("Damping"));

        if ui.button("Restore defaults").clicked() {
            *params = relnet::ForceParams::default();
        }
    }

    fn draw_legend(&self, ui: &mut Ui) {
        let Some(session) = &self.session else {
            return;
        };
        let palette = session.palette();

        ui.label(RichText::new("Legend").strong());
        for category in Category::ALL {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter()
                    .circle_filled(rect.center(), 6.0, palette.category(category));
                ui.label(category.label());
            });
        }

        ui.add_space(4.0);
        for kind in [
            LinkKind::SameEmployer,
            LinkKind::SharedTransaction,
            LinkKind::HighAffinityPair,
        ] {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 12.0), egui::Sense::hover());
                ui.painter().line_segment(
                    [rect.left_center(), rect.right_center()],
                    egui::Stroke::new(link_width(kind), palette.link(kind)),
                );
                ui.label(kind.label());
            });
        }
    }
}
