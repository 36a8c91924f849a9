use std::sync::Arc;

use eframe::egui::{self, RichText, Ui};
use relnet::{Entity, GraphSession, LinkKind};

use super::super::ViewModel;

struct Connection {
    id: String,
    name: String,
    kind: LinkKind,
}

fn connections_of(session: &GraphSession, id: &str) -> Vec<Connection> {
    let graph = session.simulation().graph();
    let Some(&index) = graph.index_by_id.get(id) else {
        return Vec::new();
    };

    graph
        .links
        .iter()
        .filter(|link| link.touches(index))
        .map(|link| {
            let other = if link.source == index {
                link.target
            } else {
                link.source
            };
            let node = &graph.nodes[other];
            Connection {
                id: node.id.clone(),
                name: node.entity.display_name(),
                kind: link.kind,
            }
        })
        .collect()
}

fn optional_field(ui: &mut Ui, label: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
        ui.label(format!("{label}: {value}"));
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(entity) = self.selected.as_ref().map(Arc::clone) else {
            ui.label("Click a node in the network to inspect it.");
            self.draw_hover_hint(ui);
            return;
        };

        Self::draw_entity_fields(ui, &entity);

        let connections = self
            .session
            .as_ref()
            .map(|session| connections_of(session, &entity.id))
            .unwrap_or_default();

        ui.separator();
        ui.label(RichText::new(format!("Connections ({})", connections.len())).strong());

        let mut next_selection = None;
        if connections.is_empty() {
            ui.label("No relationships derived for this entity.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("connections_scroll")
                .max_height(360.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for connection in &connections {
                        let label = format!("{}  [{}]", connection.name, connection.kind.label());
                        if ui
                            .link(label)
                            .on_hover_text(connection.id.as_str())
                            .clicked()
                        {
                            next_selection = Some(connection.id.clone());
                        }
                    }
                });
        }

        if let Some(id) = next_selection {
            self.set_selected(Some(&id));
        }
    }

    fn draw_entity_fields(ui: &mut Ui, entity: &Entity) {
        ui.label(RichText::new(entity.display_name()).strong().size(16.0));
        ui.small(entity.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Category: {}", entity.category.label()));
        optional_field(ui, "Title", entity.title.as_deref());
        optional_field(ui, "Company", entity.company.as_deref());
        optional_field(ui, "Employer", entity.employer());
        ui.label(format!(
            "Affinity score: {:.0}",
            entity.affinity_score.clamp(0.0, 100.0)
        ));

        if !entity.transaction_ids.is_empty() {
            ui.label(format!("Transactions: {}", entity.transaction_ids.join(", ")));
        }
    }

    fn draw_hover_hint(&self, ui: &mut Ui) {
        let Some(hovered) = self
            .session
            .as_ref()
            .and_then(|session| session.hovered_entity())
        else {
            return;
        };

        ui.add_space(8.0);
        ui.label(RichText::new("Hovering").weak());
        ui.label(hovered.display_name());
    }
}
