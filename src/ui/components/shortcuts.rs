//! Contract-type shortcut buttons
//!
//! One click submits a button-sourced turn for that contract type.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::RichText;

/// The contract types offered as one-click shortcuts
pub const SHORTCUT_CONTRACT_TYPES: &[&str] = &[
    "Real Estate Lease Agreement",
    "Power of attorney",
    "Complaint",
];

pub struct ShortcutRow<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> ShortcutRow<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let mut clicked: Option<&str> = None;

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::Vec2::splat(self.theme.spacing_sm);

            for contract_type in SHORTCUT_CONTRACT_TYPES {
                let button = egui::Button::new(
                    RichText::new(*contract_type)
                        .size(13.0)
                        .color(self.theme.text_secondary),
                )
                .fill(self.theme.bg_tertiary)
                .rounding(self.theme.button_rounding);

                if ui.add(button).clicked() {
                    clicked = Some(contract_type);
                }
            }
        });

        if let Some(contract_type) = clicked {
            self.state.select_shortcut(contract_type);
        }
    }
}
