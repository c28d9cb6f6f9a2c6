//! GUI module - User interface components

mod app;
mod control_panel;
mod dashboard_view;

pub use app::DashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction, Selection, Warning};
pub use dashboard_view::{DashboardView, SelectionKey, ViewModel};
