//! Data behind the dashboard page: overview cards, the position table and
//! the three chart series

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::consts::QUOTE_CCY;
use crate::duration::format_holding_time;
use crate::metrics::{self, PositionSummary, WinLoss};
use crate::types::Position;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Overview figures with their display labels
#[derive(Debug, Clone, Serialize)]
pub struct SummaryCards {
    pub total_pnl_ratio: String,
    pub total_pnl: String,
    pub success_rate: String,
    pub average_holding_time: String,
    pub raw: PositionSummary,
}

/// One row of the position table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRow {
    pub pos_id: String,
    pub inst_id: String,
    pub direction: String,
    pub is_long: bool,
    pub lever: String,
    pub pnl: String,
    pub is_profit: bool,
    pub pnl_ratio: String,
    pub close_type: String,
    pub opened_at: String,
    pub closed_at: String,
    pub holding_time: String,
}

impl From<&Position> for PositionRow {
    fn from(p: &Position) -> Self {
        Self {
            pos_id: p.pos_id.clone(),
            inst_id: p.inst_id.clone(),
            direction: p.direction_label().to_string(),
            is_long: p.is_long(),
            lever: format!("{}x", p.lever),
            pnl: format!("{:.2} {}", p.pnl(), QUOTE_CCY),
            is_profit: p.pnl() > 0.0,
            pnl_ratio: format!("{:.2}%", p.pnl_ratio() * 100.0),
            close_type: p.close_type().label().to_string(),
            opened_at: format_millis(p.created_at_ms(), DATETIME_FORMAT),
            closed_at: format_millis(p.closed_at_ms(), DATETIME_FORMAT),
            holding_time: format_holding_time(p.holding_time_ms()),
        }
    }
}

/// Chart inputs, oldest position first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Open date of each position, the shared x axis
    pub dates: Vec<String>,
    /// Return per position in percent
    pub pnl_ratio: Vec<f64>,
    /// Running P&L total
    pub cumulative_pnl: Vec<i64>,
    /// Win / loss pie
    pub distribution: WinLoss,
}

impl ChartSeries {
    pub fn from_positions(positions: &[Position]) -> Self {
        let ordered = metrics::chronological(positions);
        Self {
            dates: ordered
                .iter()
                .map(|p| format_millis(p.created_at_ms(), DATE_FORMAT))
                .collect(),
            pnl_ratio: metrics::pnl_ratio_series(&ordered),
            cumulative_pnl: metrics::cumulative_pnl(&ordered),
            distribution: metrics::win_loss_counts(&ordered),
        }
    }
}

/// Everything one dashboard load shows
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub summary: SummaryCards,
    /// Newest first, as delivered
    pub rows: Vec<PositionRow>,
    pub charts: ChartSeries,
}

impl DashboardView {
    pub fn from_positions(positions: &[Position]) -> Self {
        let raw = PositionSummary::from_positions(positions);
        Self {
            summary: SummaryCards {
                total_pnl_ratio: raw.total_pnl_ratio_label(),
                total_pnl: raw.total_pnl_label(),
                success_rate: raw.success_rate_label(),
                average_holding_time: raw.average_holding_label(),
                raw,
            },
            rows: positions.iter().map(PositionRow::from).collect(),
            charts: ChartSeries::from_positions(positions),
        }
    }

    /// Plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary.raw)?;
        writeln!(
            f,
            "盈利交易: {}  亏损交易: {}",
            self.charts.distribution.wins, self.charts.distribution.losses
        )?;
        writeln!(f)?;

        if self.rows.is_empty() {
            return writeln!(f, "暂无仓位记录");
        }

        for row in &self.rows {
            writeln!(
                f,
                "{:<18} {} {:>5} {:>16} {:>9} {:<8} {} -> {}  {}",
                row.inst_id,
                row.direction,
                row.lever,
                row.pnl,
                row.pnl_ratio,
                row.close_type,
                row.opened_at,
                row.closed_at,
                row.holding_time,
            )?;
        }
        Ok(())
    }
}

/// Format epoch millis as UTC, `-` when missing or out of range
fn format_millis(ms: Option<i64>, fmt: &str) -> String {
    ms.and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::position;

    // 2023-11-14 22:13:20 UTC
    const T0: i64 = 1_700_000_000_000;
    const DAY: i64 = 86_400_000;

    fn sample() -> Vec<Position> {
        // Newest first, like the exchange
        let mut newest = position("-0.4", T0 + DAY, T0 + DAY + 3_600_000);
        newest.direction = "short".to_string();
        newest.close_type = "3".to_string();
        newest.pnl_ratio = "-0.25".to_string();
        let oldest = position("1.6", T0, T0 + DAY + DAY / 2);
        vec![newest, oldest]
    }

    #[test]
    fn test_row_labels() {
        let positions = sample();
        let row = PositionRow::from(&positions[1]);

        assert_eq!(row.inst_id, "BTC-USDT-SWAP");
        assert_eq!(row.direction, "多");
        assert_eq!(row.lever, "10x");
        assert_eq!(row.pnl, "1.60 USDT");
        assert!(row.is_profit);
        assert_eq!(row.pnl_ratio, "10.00%");
        assert_eq!(row.close_type, "完全平仓");
        assert_eq!(row.opened_at, "2023-11-14 22:13:20");
        assert_eq!(row.holding_time, "1.50 天");

        let row = PositionRow::from(&positions[0]);
        assert_eq!(row.direction, "空");
        assert_eq!(row.close_type, "强平");
        assert_eq!(row.pnl_ratio, "-25.00%");
        assert_eq!(row.holding_time, "1.00 小时");
    }

    #[test]
    fn test_charts_are_chronological() {
        let charts = ChartSeries::from_positions(&sample());

        assert_eq!(charts.dates, vec!["2023-11-14", "2023-11-15"]);
        assert_eq!(charts.pnl_ratio, vec![10.0, -25.0]);
        // 1.6 -> 1, 1 - 0.4 = 0.6 -> 0
        assert_eq!(charts.cumulative_pnl, vec![1, 0]);
        assert_eq!(charts.distribution, WinLoss { wins: 1, losses: 1 });
    }

    #[test]
    fn test_view_keeps_api_order_for_rows() {
        let view = DashboardView::from_positions(&sample());
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].direction, "空");
        assert_eq!(view.summary.success_rate, "50.00%");
        assert_eq!(view.summary.total_pnl, "1.20 USDT");
    }

    #[test]
    fn test_empty_view() {
        let view = DashboardView::from_positions(&[]);
        assert!(view.rows.is_empty());
        assert_eq!(view.charts, ChartSeries::default());
        assert_eq!(view.summary.success_rate, "N/A");
        assert_eq!(view.summary.average_holding_time, "0 秒");
        assert_eq!(view.summary.total_pnl, "0.00 USDT");
        assert_eq!(view.summary.total_pnl_ratio, "0.00%");
        assert!(view.render_text().contains("暂无仓位记录"));
        assert!(!view.to_string().contains("-0.00"));
    }

    #[test]
    fn test_missing_times_render_dash() {
        let mut p = position("1", 0, 0);
        p.c_time = String::new();
        let row = PositionRow::from(&p);
        assert_eq!(row.opened_at, "-");
        assert_eq!(row.holding_time, "0 秒");
    }

    #[test]
    fn test_render_text_lists_rows() {
        let text = DashboardView::from_positions(&sample()).render_text();
        assert!(text.contains("BTC-USDT-SWAP"));
        assert!(text.contains("强平"));
        assert!(text.contains("盈利交易: 1"));
        assert_eq!(text.lines().filter(|l| l.contains("BTC-USDT-SWAP")).count(), 2);
    }

    #[test]
    fn test_view_serializes() {
        let value = serde_json::to_value(DashboardView::from_positions(&sample())).unwrap();
        assert_eq!(value["summary"]["success_rate"], "50.00%");
        assert_eq!(value["charts"]["cumulative_pnl"][0], 1);
        assert_eq!(value["rows"][1]["lever"], "10x");
    }
}
