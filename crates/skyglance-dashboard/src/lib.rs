//! Dashboard for Skyglance
//!
//! Turns a place name or a position fix into a rendered weather dashboard:
//! lookup orchestration, the view model, and the presenter seam.

pub mod error_mapping;
pub mod orchestrator;
pub mod presenter;
pub mod view;

pub use error_mapping::WeatherErrorExt;
pub use orchestrator::{Dashboard, DashboardSettings, Panels, RequestGeneration, Ticket, ViewState};
pub use presenter::{Presenter, TemperatureChart, TerminalPresenter};
pub use view::{ChartSeries, DashboardView, ForecastRow, IconSet};
