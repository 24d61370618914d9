//! Main application struct and eframe integration

use crate::api::InputSource;
use crate::transcribe::RecordingState;
use crate::ui::components::{InputBar, MessageList, ShortcutRow};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, TopBottomPanel};

/// A query to submit on the first frame, mirroring the original
/// query-string navigation into the chat view
#[derive(Debug, Clone)]
pub struct LaunchQuery {
    pub query: String,
    pub source: InputSource,
}

/// Main Pactum application
pub struct PactumApp {
    state: AppState,
    theme: Theme,
    launch_query: Option<LaunchQuery>,
    initialized: bool,
}

impl PactumApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        state: AppState,
        launch_query: Option<LaunchQuery>,
    ) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            state,
            theme,
            launch_query,
            initialized: false,
        }
    }

    /// First-frame initialization: route the launch query into the chat
    fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        if let Some(launch) = self.launch_query.take() {
            self.state.submit_launch_query(&launch.query, launch.source);
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Pactum")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );

                    ui.label(
                        RichText::new("Contract Drafting Assistant")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🗑").on_hover_text("Clear Chat").clicked() {
                            self.state.clear_messages();
                        }

                        if self.state.intake.is_in_flight() {
                            ui.label(
                                RichText::new("processing…")
                                    .size(11.0)
                                    .color(self.theme.text_muted),
                            );
                        }
                    });
                });
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.vertical(|ui| {
                    ShortcutRow::new(&mut self.state, &self.theme).show(ui);
                    ui.add_space(self.theme.spacing_sm);
                    InputBar::new(&mut self.state, &self.theme).show(ui);
                });
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                MessageList::new(&mut self.state, &self.theme).show(ui);
            });
    }
}

impl eframe::App for PactumApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.initialize();

        // Drain recorder chunks and worker events
        self.state.poll_events();

        self.show_header(ctx);
        self.show_input_area(ctx);
        self.show_content(ctx);

        // Keep polling while anything is outstanding
        if self.state.intake.is_in_flight()
            || self.state.download_in_progress
            || self.state.recorder.state() != RecordingState::Idle
        {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.intake.shutdown();
    }
}
