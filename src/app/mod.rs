use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use eframe::egui::{self, Context};
use relnet::source::load_entities;
use relnet::{Category, Entity, GraphSession, TickReport};

mod canvas;
mod ui;

pub struct AppConfig {
    pub entities_path: PathBuf,
    pub seed: Option<u64>,
    pub initial_category: Option<Category>,
    pub pause_when_settled: bool,
}

type LoadResult = Result<Vec<Entity>, String>;

pub struct RelnetApp {
    config: AppConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    /// Built on the first frame, once the canvas size is known.
    session: Option<GraphSession>,
    pending_entities: Option<Vec<Entity>>,
    entity_count: usize,
    seed: Option<u64>,
    initial_category: Option<Category>,
    category_filter: Option<Category>,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    selected: Option<Arc<Entity>>,
    live_physics: bool,
    pause_when_settled: bool,
    last_tick: Option<TickReport>,
}

struct SearchMatchCache {
    query: String,
    generation: u64,
    matches: Arc<Vec<String>>,
}

impl RelnetApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let state = Self::start_load(config.entities_path.clone());
        Self {
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_entities(&path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(path),
        }
    }

    fn ready_state(config: &AppConfig, entities: Vec<Entity>) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(
            entities,
            config.seed,
            config.initial_category,
            config.pause_when_settled,
        )))
    }
}

/// Non-blocking check on a load worker. A worker that went away without
/// answering counts as a failed load.
fn poll_load(rx: &Receiver<LoadResult>) -> Option<LoadResult> {
    match rx.try_recv() {
        Ok(result) => Some(result),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => {
            Some(Err("Background load worker disconnected".to_owned()))
        }
    }
}

/// Seed for a fresh layout; fixed when configured, time-derived otherwise.
fn layout_seed(configured: Option<u64>) -> u64 {
    configured.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0)
    })
}

impl eframe::App for RelnetApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Some(result) = poll_load(rx) {
                    transition = Some(match result {
                        Ok(entities) => Self::ready_state(&self.config, entities),
                        Err(error) => {
                            tracing::error!(%error, "failed to load entities");
                            AppState::Error(error)
                        }
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relationship network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load entities");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.config.entities_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(
                    ctx,
                    &self.config.entities_path,
                    &mut reload_requested,
                    is_reloading,
                );

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.config.entities_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match poll_load(&rx) {
                        Some(Ok(entities)) => model.replace_entities(entities),
                        Some(Err(error)) => {
                            tracing::error!(%error, "failed to reload entities");
                            transition = Some(AppState::Error(error));
                        }
                        None => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
