mod app;

use std::sync::Arc;

use eframe::{egui, NativeOptions};
use hn_core::AppConfig;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::{FeedApp, FeedAppInit};

fn main() -> eframe::Result<()> {
    init_tracing();

    let runtime = Arc::new(Runtime::new().expect("failed to initialise Tokio runtime"));
    let config = AppConfig::load();
    let client = config
        .build_client()
        .expect("failed to build HTTP client");
    let options = config.feed_options();
    info!(
        feed = ?options.feed,
        limit = options.limit.get(),
        auto_refresh = options.auto_refresh,
        "starting story feed"
    );

    eframe::run_native(
        "Hacker News",
        NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([760.0, 820.0])
                .with_min_inner_size([480.0, 400.0]),
            ..Default::default()
        },
        Box::new(move |cc| {
            Box::new(FeedApp::new(FeedAppInit {
                runtime,
                client,
                options,
                ctx: cc.egui_ctx.clone(),
            }))
        }),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
