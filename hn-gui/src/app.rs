use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Color32, RichText};
use hn_core::{FeedKind, FeedOptions, FeedPhase, FeedState, HnClient, Story, StoryFeed};
use tokio::runtime::Runtime;
use tracing::warn;

// Keeps the "N minutes ago" labels moving without any state change.
const AGE_REPAINT_INTERVAL: Duration = Duration::from_secs(30);

pub struct FeedAppInit {
    pub runtime: Arc<Runtime>,
    pub client: HnClient,
    pub options: FeedOptions,
    pub ctx: egui::Context,
}

pub struct FeedApp {
    runtime: Arc<Runtime>,
    client: HnClient,
    ctx: egui::Context,
    feed: Option<StoryFeed>,
    auto_refresh: bool,
    kind: FeedKind,
    options: FeedOptions,
}

impl FeedApp {
    pub fn new(init: FeedAppInit) -> Self {
        let mut app = Self {
            runtime: init.runtime,
            client: init.client,
            ctx: init.ctx,
            feed: None,
            auto_refresh: init.options.auto_refresh,
            kind: init.options.feed,
            options: init.options,
        };
        app.mount_feed();
        app
    }

    /// Replaces the current feed (if any) with one for `self.kind`.
    fn mount_feed(&mut self) {
        if let Some(old) = self.feed.take() {
            self.runtime.block_on(old.teardown());
        }

        let options = FeedOptions {
            feed: self.kind,
            auto_refresh: self.auto_refresh,
            ..self.options
        };
        let feed = {
            let _guard = self.runtime.enter();
            StoryFeed::mount(self.client.clone(), options)
        };

        let mut updates = feed.subscribe();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            while updates.changed().await.is_ok() {
                ctx.request_repaint();
            }
        });
        self.feed = Some(feed);
    }

    fn snapshot(&self) -> FeedState {
        self.feed
            .as_ref()
            .map(StoryFeed::state)
            .unwrap_or_default()
    }

    fn refresh(&self) {
        if let Some(feed) = &self.feed {
            let _guard = self.runtime.enter();
            let _ = feed.refresh();
        }
    }

    fn retry(&self) {
        if let Some(feed) = &self.feed {
            let _guard = self.runtime.enter();
            let _ = feed.retry();
        }
    }

    fn apply_auto_refresh(&mut self) {
        if let Some(feed) = &mut self.feed {
            let _guard = self.runtime.enter();
            feed.set_auto_refresh(self.auto_refresh);
        }
    }

    fn draw_header(&mut self, ui: &mut egui::Ui, state: &FeedState) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Hacker News").size(18.0));
            let before = self.kind;
            egui::ComboBox::from_id_source("feed_kind")
                .selected_text(self.kind.label())
                .show_ui(ui, |ui| {
                    for kind in FeedKind::ALL {
                        ui.selectable_value(&mut self.kind, kind, kind.label());
                    }
                });
            if self.kind != before {
                self.mount_feed();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let refresh = ui.add_enabled(
                    !state.loading && !state.refreshing,
                    egui::Button::new("⟳ Refresh"),
                );
                if refresh.clicked() {
                    self.refresh();
                }
                if ui
                    .checkbox(&mut self.auto_refresh, "Auto refresh")
                    .on_hover_text("Reload the list every few minutes")
                    .changed()
                {
                    self.apply_auto_refresh();
                }
                ui.separator();
                if state.refreshing {
                    ui.spinner();
                    ui.label(RichText::new("refreshing…").weak());
                } else {
                    ui.label(RichText::new(format!("{} stories", state.stories.len())).weak());
                }
            });
        });
    }

    fn draw_error_banner(&self, ui: &mut egui::Ui, message: &str) -> bool {
        let mut retry = false;
        egui::Frame::none()
            .fill(Color32::from_rgb(90, 30, 30))
            .rounding(4.0)
            .inner_margin(egui::Margin::same(8.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(message).color(Color32::WHITE));
                    if ui.button("Retry").clicked() {
                        retry = true;
                    }
                });
            });
        retry
    }

    fn draw_story(ui: &mut egui::Ui, rank: usize, story: &Story) {
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(format!("{rank}.")).weak().monospace());
            let title = ui.add(egui::Link::new(RichText::new(&story.title).size(15.0)));
            if title.clicked() {
                open_link(&story.link());
            }
            let host = story.hostname();
            if !host.is_empty() {
                ui.label(RichText::new(format!("({host})")).weak().small());
            }
        });
        ui.horizontal(|ui| {
            ui.add_space(24.0);
            let byline = if story.by.is_empty() {
                format!("{} points · {}", story.score, story.age())
            } else {
                format!("{} points by {} · {}", story.score, story.by, story.age())
            };
            ui.label(RichText::new(byline).weak().small());
            let comments = ui.add(egui::Link::new(
                RichText::new(format!("{} comments", story.descendants)).small(),
            ));
            if comments.clicked() {
                open_link(&story.discussion_url());
            }
        });
        ui.add_space(6.0);
    }
}

fn open_link(url: &str) {
    if let Err(e) = webbrowser::open(url) {
        warn!(error = %e, url, "failed to open browser");
    }
}

impl Drop for FeedApp {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.take() {
            self.runtime.block_on(feed.teardown());
        }
    }
}

impl eframe::App for FeedApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = self.snapshot();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            self.draw_header(ui, &state);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &state.error {
                if self.draw_error_banner(ui, message) {
                    self.retry();
                }
                ui.add_space(6.0);
            }

            if state.phase() == FeedPhase::InitialLoading && state.stories.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.spinner();
                    ui.label("Loading stories…");
                });
                return;
            }

            if state.stories.is_empty() && state.error.is_none() {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.label(RichText::new("No stories right now").size(16.0));
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (index, story) in state.stories.iter().enumerate() {
                        Self::draw_story(ui, index + 1, story);
                    }
                });
        });

        ctx.request_repaint_after(AGE_REPAINT_INTERVAL);
    }
}
