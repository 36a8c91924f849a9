mod app;

use std::path::PathBuf;

use clap::Parser;
use relnet::Category;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Entity list as JSON (array, or object with an `entities` array).
    #[arg(long, default_value = "data/entities.json")]
    entities: PathBuf,

    /// Fixed layout seed; a fresh one is drawn per load otherwise.
    #[arg(long)]
    seed: Option<u64>,

    /// Only show nodes of this category at startup.
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,

    /// Stop scheduling frames once the layout has settled.
    #[arg(long)]
    pause_when_settled: bool,
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse(raw).ok_or_else(|| {
        let known = Category::ALL
            .iter()
            .map(|category| category.label())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown category `{raw}` (expected one of: {known})")
    })
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    tracing::info!(entities = %args.entities.display(), "starting relnet");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    let config = app::AppConfig {
        entities_path: args.entities,
        seed: args.seed,
        initial_category: args.category,
        pause_when_settled: args.pause_when_settled,
    };

    eframe::run_native(
        "relnet",
        options,
        Box::new(move |cc| Ok(Box::new(app::RelnetApp::new(cc, config)))),
    )
}
