use std::path::Path;
use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use relnet::{Category, Entity};

use super::super::{SearchMatchCache, ViewModel, layout_seed};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

fn search_haystack(entity: &Entity) -> String {
    format!(
        "{} {} {} {}",
        entity.display_name(),
        entity.title.as_deref().unwrap_or_default(),
        entity.company.as_deref().unwrap_or_default(),
        entity.category
    )
}

impl ViewModel {
    pub(in crate::app) fn new(
        entities: Vec<Entity>,
        seed: Option<u64>,
        initial_category: Option<Category>,
        pause_when_settled: bool,
    ) -> Self {
        Self {
            session: None,
            entity_count: entities.len(),
            pending_entities: Some(entities),
            seed,
            initial_category,
            category_filter: initial_category,
            search: String::new(),
            search_match_cache: None,
            selected: None,
            live_physics: true,
            pause_when_settled,
            last_tick: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        entities_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("relnet");
                    ui.separator();
                    ui.label(format!("source: {}", entities_path.display()));
                    ui.label(format!("entities: {}", self.entity_count));
                    if let Some(session) = &self.session {
                        ui.label(format!("links: {}", session.simulation().links().len()));
                    }
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload entities"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(status) = self.physics_status_text() {
                            ui.label(status);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if is_loading && self.session.is_none() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relationship network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                } else {
                    self.draw_graph(ui);
                }
            });
    }

    fn physics_status_text(&self) -> Option<String> {
        let report = self.last_tick?;
        let state = if !self.live_physics {
            "paused"
        } else if report.moving {
            "settling"
        } else {
            "settled"
        };
        Some(format!(
            "gen {} | {state} | max speed {:.2}",
            report.generation, report.max_speed
        ))
    }

    /// Swaps in a freshly loaded entity list. The session keeps its viewport,
    /// filter and any selection that still resolves.
    pub(in crate::app) fn replace_entities(&mut self, entities: Vec<Entity>) {
        self.entity_count = entities.len();
        self.search_match_cache = None;

        let Some(session) = self.session.as_mut() else {
            self.pending_entities = Some(entities);
            return;
        };

        session.replace_entities(&entities, layout_seed(self.seed));
        self.selected = self
            .selected
            .as_ref()
            .and_then(|entity| session.simulation().node(&entity.id))
            .map(|node| Arc::clone(&node.entity));
        self.refresh_highlight();
    }

    pub(in crate::app) fn set_selected(&mut self, id: Option<&str>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        self.selected = id
            .and_then(|id| session.simulation().node(id))
            .map(|node| Arc::clone(&node.entity));
        session.set_selected(self.selected.as_ref().map(|entity| entity.id.clone()));
        self.refresh_highlight();
    }

    pub(in crate::app) fn set_category_filter(&mut self, filter: Option<Category>) {
        self.category_filter = filter;
        if let Some(session) = self.session.as_mut() {
            session.set_category_filter(filter);
        }
    }

    /// Search matches win over the selection neighbourhood when a query is
    /// active.
    pub(in crate::app) fn refresh_highlight(&mut self) {
        if let Some(matches) = self.cached_search_matches() {
            if let Some(session) = self.session.as_mut() {
                session.set_highlight_path(matches.iter().cloned());
            }
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };

        let path = match &self.selected {
            Some(entity) => {
                let mut ids = vec![entity.id.clone()];
                ids.extend(
                    session
                        .simulation()
                        .graph()
                        .neighbor_ids(&entity.id)
                        .into_iter()
                        .map(str::to_owned),
                );
                ids
            }
            None => Vec::new(),
        };
        session.set_highlight_path(path);
    }

    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<Vec<String>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let session = self.session.as_ref()?;
        let generation = session.generation();

        if let Some(cached) = &self.search_match_cache
            && cached.generation == generation
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = session
            .simulation()
            .nodes()
            .iter()
            .filter(|node| {
                fuzzy_match_score(&matcher, &search_haystack(&node.entity), query).is_some()
            })
            .map(|node| node.id.clone())
            .collect::<Vec<_>>();
        let matches = Arc::new(matches);

        tracing::debug!(query, matches = matches.len(), "search matches refreshed");

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            generation,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }
}
