#![deny(unreachable_pub)]
pub mod client;
pub mod config;
mod consts;
pub mod dashboard;
pub mod duration;
mod errors;
pub mod metrics;
pub mod runner;
pub mod signature;
mod types;
pub use client::{HistoryQuery, PositionClient, PositionSource};
pub use self::config::Settings;
pub use consts::{AWS_API_URL, DEFAULT_PAGE_LIMIT, OKX_API_URL, QUOTE_CCY};
pub use duration::format_holding_time;
pub use errors::{Error, Result};
pub use metrics::{PositionSummary, WinLoss};
pub use runner::DashboardRunner;
pub use signature::{sign_request_headers, Credentials, SignedHeaders};
pub use types::{CloseType, Position};
