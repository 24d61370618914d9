//! egui user interface

pub mod app;
pub mod components;
pub mod state;
pub mod theme;

pub use app::PactumApp;
pub use state::AppState;
pub use theme::Theme;
