//! Dashboard Module
//!
//! Turns a page of closed positions into what the dashboard shows: summary
//! cards, table rows and chart series. The view is served as JSON or printed
//! as text; drawing it is left to whatever consumes the data.
//!
//! # Usage Pattern
//!
//! ```ignore
//! use okx_positions::dashboard::DashboardView;
//! use okx_positions::{HistoryQuery, PositionClient};
//!
//! let client = PositionClient::new(settings.okx)?;
//! let positions = client.positions_history(&HistoryQuery::new().limit(15)).await?;
//!
//! let view = DashboardView::from_positions(&positions);
//! println!("{}", view.render_text());
//! ```

mod server;
mod view;

pub use server::{router, start_server};
pub use view::{ChartSeries, DashboardView, PositionRow, SummaryCards};
