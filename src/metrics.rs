//! Aggregate statistics over a page of closed positions
//!
//! Everything here is a pure function of the slice it is given. Positions
//! arrive newest first from the exchange; the series functions expect
//! chronological order, see [`chronological`].

use std::fmt;

use serde::Serialize;

use crate::consts::QUOTE_CCY;
use crate::duration::{format_holding_time, ZERO_DURATION_LABEL};
use crate::types::Position;

/// Win / loss bucket sizes. Break-even positions are in neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinLoss {
    pub wins: usize,
    pub losses: usize,
}

/// Reverse the exchange's newest-first order
pub fn chronological(positions: &[Position]) -> Vec<Position> {
    positions.iter().rev().cloned().collect()
}

/// Sum of `pnlRatio / closeTotalPos` over all positions, `0.0` for an
/// empty page.
///
/// This divides a return ratio by a position size, which mixes units. It is
/// kept as the dashboard has always reported it.
pub fn total_pnl_ratio(positions: &[Position]) -> f64 {
    positions
        .iter()
        .fold(0.0, |acc, p| acc + p.pnl_ratio() / p.close_total_pos())
}

/// Sum of realized P&L, `0.0` for an empty page
pub fn total_pnl(positions: &[Position]) -> f64 {
    positions.iter().fold(0.0, |acc, p| acc + p.pnl())
}

pub fn win_loss_counts(positions: &[Position]) -> WinLoss {
    positions.iter().fold(WinLoss::default(), |mut acc, p| {
        let pnl = p.pnl();
        if pnl > 0.0 {
            acc.wins += 1;
        } else if pnl < 0.0 {
            acc.losses += 1;
        }
        acc
    })
}

/// Percentage of positions closed in profit, `None` when there is no data
pub fn success_rate(positions: &[Position]) -> Option<f64> {
    if positions.is_empty() {
        return None;
    }
    let wins = win_loss_counts(positions).wins;
    Some(wins as f64 / positions.len() as f64 * 100.0)
}

/// Mean of `uTime - cTime` in milliseconds, `None` when there is no data
pub fn average_holding_ms(positions: &[Position]) -> Option<f64> {
    if positions.is_empty() {
        return None;
    }
    let total: f64 = positions.iter().map(Position::holding_time_ms).sum();
    Some(total / positions.len() as f64)
}

pub fn average_holding_time(positions: &[Position]) -> String {
    average_holding_ms(positions)
        .map(format_holding_time)
        .unwrap_or_else(|| ZERO_DURATION_LABEL.to_string())
}

/// Running P&L total for the cumulative chart.
///
/// Each step rounds `previous + pnl` to cents and truncates it toward zero;
/// the truncated value is what the next step adds to, so the loss of
/// precision compounds. Unparsable P&L contributes nothing. Totals outside
/// the `i64` range saturate at `i64::MIN` / `i64::MAX`.
pub fn cumulative_pnl(chronological: &[Position]) -> Vec<i64> {
    let mut acc: i64 = 0;
    chronological
        .iter()
        .map(|p| {
            let pnl = p.pnl();
            if pnl.is_finite() {
                acc = to_whole_units(round_cents(acc as f64 + pnl));
            }
            acc
        })
        .collect()
}

/// Per-position return in percent, rounded to cents
pub fn pnl_ratio_series(chronological: &[Position]) -> Vec<f64> {
    chronological
        .iter()
        .map(|p| round_cents(p.pnl_ratio() * 100.0))
        .collect()
}

fn to_whole_units(value: f64) -> i64 {
    value.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Overview figures shown at the top of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSummary {
    pub count: usize,
    pub total_pnl_ratio: f64,
    pub total_pnl: f64,
    pub success_rate: Option<f64>,
    pub average_holding_ms: Option<f64>,
    pub win_loss: WinLoss,
}

impl PositionSummary {
    pub fn from_positions(positions: &[Position]) -> Self {
        Self {
            count: positions.len(),
            total_pnl_ratio: total_pnl_ratio(positions),
            total_pnl: total_pnl(positions),
            success_rate: success_rate(positions),
            average_holding_ms: average_holding_ms(positions),
            win_loss: win_loss_counts(positions),
        }
    }

    /// e.g. `12.34%`
    pub fn total_pnl_ratio_label(&self) -> String {
        format!("{:.2}%", self.total_pnl_ratio * 100.0)
    }

    /// e.g. `-5.00 USDT`
    pub fn total_pnl_label(&self) -> String {
        format!("{:.2} {}", self.total_pnl, QUOTE_CCY)
    }

    /// e.g. `66.67%`, or `N/A` without data
    pub fn success_rate_label(&self) -> String {
        match self.success_rate {
            Some(rate) => format!("{:.2}%", rate),
            None => "N/A".to_string(),
        }
    }

    pub fn average_holding_label(&self) -> String {
        self.average_holding_ms
            .map(format_holding_time)
            .unwrap_or_else(|| ZERO_DURATION_LABEL.to_string())
    }
}

impl fmt::Display for PositionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "总收益率:     {}", self.total_pnl_ratio_label())?;
        writeln!(f, "总盈亏金额:   {}", self.total_pnl_label())?;
        writeln!(f, "成功率:       {}", self.success_rate_label())?;
        write!(f, "平均持仓时间: {}", self.average_holding_label())
    }
}
