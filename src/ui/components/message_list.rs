//! Message list component
//!
//! Displays the conversation transcript; contract bodies render as rich
//! cards carrying the download affordance.

use crate::messages::{Message, MessageContent, Speaker};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText, Vec2};

pub struct MessageList<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let messages = self.state.log.snapshot();
        let mut download_clicked = false;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    if messages.is_empty() {
                        self.show_empty_state(ui);
                    } else {
                        for message in &messages {
                            download_clicked |= self.show_message(ui, message);
                            ui.add_space(self.theme.spacing_sm);
                        }
                    }

                    ui.add_space(self.theme.spacing);
                });
            });

        if download_clicked {
            self.state.request_download();
        }
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.label(
                RichText::new("Pactum")
                    .size(24.0)
                    .color(self.theme.text_primary),
            );

            ui.add_space(self.theme.spacing);

            ui.label(
                RichText::new(
                    "Describe the contract you need, pick a shortcut below, \
                     or record a voice message.",
                )
                .size(14.0)
                .color(self.theme.text_muted),
            );
        });
    }

    /// Render one entry; returns true when its download button was clicked
    fn show_message(&self, ui: &mut egui::Ui, message: &Message) -> bool {
        let is_user = message.speaker == Speaker::User;
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        let mut download_clicked = false;

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { "You" } else { "Pactum" })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            match &message.content {
                MessageContent::Text(text) => {
                    let bubble_color = if is_user {
                        self.theme.user_bubble
                    } else {
                        self.theme.assistant_bubble
                    };
                    let text_color = if message.metadata.is_error {
                        self.theme.error
                    } else if is_user {
                        Color32::WHITE
                    } else {
                        self.theme.text_primary
                    };

                    egui::Frame::none()
                        .fill(bubble_color)
                        .rounding(self.theme.bubble_rounding)
                        .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                        .show(ui, |ui| {
                            ui.set_max_width(max_width);
                            ui.label(RichText::new(text).color(text_color));
                        });
                }
                MessageContent::Contract {
                    contract_type,
                    text,
                } => {
                    download_clicked = self.show_contract_card(ui, contract_type, text, max_width);
                }
            }

            let time_str = message.timestamp.format("%H:%M").to_string();
            ui.label(
                RichText::new(time_str)
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });

        download_clicked
    }

    fn show_contract_card(
        &self,
        ui: &mut egui::Ui,
        contract_type: &str,
        text: &str,
        max_width: f32,
    ) -> bool {
        let mut download_clicked = false;

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .stroke(egui::Stroke::new(1.0, self.theme.primary.gamma_multiply(0.5)))
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_max_width(max_width);

                ui.label(
                    RichText::new(contract_type)
                        .size(14.0)
                        .strong()
                        .color(self.theme.primary),
                );

                ui.add_space(self.theme.spacing_sm);

                ui.label(
                    RichText::new(text)
                        .family(egui::FontFamily::Monospace)
                        .size(12.0)
                        .color(self.theme.text_secondary),
                );

                ui.add_space(self.theme.spacing_sm);

                let label = if self.state.download_in_progress {
                    "Preparing document…"
                } else {
                    "⬇ Download document"
                };

                let button = egui::Button::new(
                    RichText::new(label).size(13.0).color(Color32::WHITE),
                )
                .min_size(Vec2::new(160.0, 32.0))
                .rounding(self.theme.button_rounding)
                .fill(self.theme.primary);

                if ui.add_enabled(self.state.can_download(), button).clicked() {
                    download_clicked = true;
                }
            });

        download_clicked
    }
}
