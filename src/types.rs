//! Position records as delivered by `/api/v5/account/positions-history`

use serde::{Deserialize, Serialize};

/// One historical position-close event
///
/// All values are kept as the decimal or categorical strings the exchange
/// sends. Use the accessors for numeric views; a malformed number reads as
/// `NaN` rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    /// Shared across partial closes of the same open
    pub pos_id: String,
    pub inst_id: String,
    pub inst_type: String,
    /// `cross` or `isolated`
    pub mgn_mode: String,
    /// `long`, `short` or `net`
    pub pos_side: String,
    /// `long` or `short`
    pub direction: String,
    /// Margin currency
    pub ccy: String,
    /// Underlying index
    pub uly: String,

    pub pnl: String,
    pub pnl_ratio: String,
    /// `pnl + fee + fundingFee + liqPenalty`
    pub realized_pnl: String,
    pub fee: String,
    pub funding_fee: String,
    pub liq_penalty: String,
    pub open_avg_px: String,
    pub close_avg_px: String,
    pub open_max_pos: String,
    pub close_total_pos: String,
    pub lever: String,
    /// Only set for close types 3, 4 and 5
    pub trigger_px: String,

    /// Creation time, epoch millis
    #[serde(rename = "cTime")]
    pub c_time: String,
    /// Last update / close time, epoch millis
    #[serde(rename = "uTime")]
    pub u_time: String,

    /// Latest close type, see [`CloseType`]
    #[serde(rename = "type")]
    pub close_type: String,
}

/// Parse an exchange decimal string, `NaN` when it is not a number
pub(crate) fn parse_decimal(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(f64::NAN)
}

impl Position {
    pub fn pnl(&self) -> f64 {
        parse_decimal(&self.pnl)
    }

    pub fn pnl_ratio(&self) -> f64 {
        parse_decimal(&self.pnl_ratio)
    }

    pub fn realized_pnl(&self) -> f64 {
        parse_decimal(&self.realized_pnl)
    }

    pub fn fee(&self) -> f64 {
        parse_decimal(&self.fee)
    }

    pub fn funding_fee(&self) -> f64 {
        parse_decimal(&self.funding_fee)
    }

    pub fn liq_penalty(&self) -> f64 {
        parse_decimal(&self.liq_penalty)
    }

    pub fn close_total_pos(&self) -> f64 {
        parse_decimal(&self.close_total_pos)
    }

    pub fn created_at_ms(&self) -> Option<i64> {
        self.c_time.trim().parse().ok()
    }

    pub fn closed_at_ms(&self) -> Option<i64> {
        self.u_time.trim().parse().ok()
    }

    /// Milliseconds between creation and last close, `NaN` if either time is missing
    pub fn holding_time_ms(&self) -> f64 {
        match (self.created_at_ms(), self.closed_at_ms()) {
            (Some(c), Some(u)) => (u - c) as f64,
            _ => f64::NAN,
        }
    }

    pub fn close_type(&self) -> CloseType {
        CloseType::from(self.close_type.as_str())
    }

    pub fn is_long(&self) -> bool {
        self.direction == "long"
    }

    pub fn direction_label(&self) -> &'static str {
        if self.is_long() {
            "多"
        } else {
            "空"
        }
    }

    /// Check the advisory `realizedPnl = pnl + fee + fundingFee + liqPenalty` relation.
    ///
    /// Empty components count as zero, since the exchange leaves e.g. `liqPenalty`
    /// blank when no penalty applied. Never enforced, only reported.
    pub fn realized_pnl_consistent(&self, epsilon: f64) -> bool {
        let part = |s: &str| if s.trim().is_empty() { 0.0 } else { parse_decimal(s) };
        let sum = part(&self.pnl) + part(&self.fee) + part(&self.funding_fee) + part(&self.liq_penalty);
        (self.realized_pnl() - sum).abs() <= epsilon
    }
}

/// Type of the most recent close on a position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseType {
    PartialClose,
    FullClose,
    Liquidation,
    ForcedReduction,
    AutoDeleveraging,
    Unknown(String),
}

impl CloseType {
    pub fn label(&self) -> &str {
        match self {
            CloseType::PartialClose => "部分平仓",
            CloseType::FullClose => "完全平仓",
            CloseType::Liquidation => "强平",
            CloseType::ForcedReduction => "强减",
            CloseType::AutoDeleveraging => "ADL自动减仓",
            CloseType::Unknown(raw) => raw.as_str(),
        }
    }

    /// Closes the exchange forced on the account
    pub fn is_forced(&self) -> bool {
        matches!(
            self,
            CloseType::Liquidation | CloseType::ForcedReduction | CloseType::AutoDeleveraging
        )
    }
}

impl From<&str> for CloseType {
    fn from(s: &str) -> Self {
        match s.trim() {
            "1" => CloseType::PartialClose,
            "2" => CloseType::FullClose,
            "3" => CloseType::Liquidation,
            "4" => CloseType::ForcedReduction,
            "5" => CloseType::AutoDeleveraging,
            other => CloseType::Unknown(other.to_string()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "cTime": "1654177169995",
        "ccy": "BTC",
        "closeAvgPx": "29786.5999999789081085",
        "closeTotalPos": "1",
        "instId": "BTC-USD-SWAP",
        "instType": "SWAP",
        "lever": "10.0",
        "mgnMode": "cross",
        "openAvgPx": "29783.8999999995535393",
        "openMaxPos": "1",
        "realizedPnl": "0.001",
        "fee": "-0.0001",
        "fundingFee": "0",
        "liqPenalty": "0",
        "pnl": "0.0011",
        "pnlRatio": "0.000906447858888",
        "posId": "452587086133239818",
        "posSide": "long",
        "direction": "long",
        "triggerPx": "",
        "type": "1",
        "uTime": "1654177174419",
        "uly": "BTC-USD"
    }"#;

    #[test]
    fn test_deserialize_exchange_record() {
        let pos: Position = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(pos.inst_id, "BTC-USD-SWAP");
        assert_eq!(pos.pos_id, "452587086133239818");
        assert_eq!(pos.c_time, "1654177169995");
        assert_eq!(pos.close_type(), CloseType::PartialClose);
        assert!((pos.pnl() - 0.0011).abs() < 1e-12);
        assert_eq!(pos.holding_time_ms(), 4424.0);
        assert!(pos.realized_pnl_consistent(1e-9));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let pos: Position = serde_json::from_str(r#"{"instId": "ETH-USDT-SWAP"}"#).unwrap();
        assert_eq!(pos.inst_id, "ETH-USDT-SWAP");
        assert!(pos.pnl.is_empty());
        assert!(pos.pnl().is_nan());
        assert!(pos.holding_time_ms().is_nan());
    }

    #[test]
    fn test_malformed_number_is_nan() {
        let pos = Position {
            pnl: "abc".to_string(),
            ..Default::default()
        };
        assert!(pos.pnl().is_nan());
    }

    #[test]
    fn test_serialize_keeps_exchange_keys() {
        let pos: Position = serde_json::from_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&pos).unwrap();

        assert_eq!(value["cTime"], "1654177169995");
        assert_eq!(value["uTime"], "1654177174419");
        assert_eq!(value["type"], "1");
        assert_eq!(value["closeTotalPos"], "1");
    }

    #[test]
    fn test_close_type_labels() {
        assert_eq!(CloseType::from("1").label(), "部分平仓");
        assert_eq!(CloseType::from("2").label(), "完全平仓");
        assert_eq!(CloseType::from("3").label(), "强平");
        assert_eq!(CloseType::from("4").label(), "强减");
        assert_eq!(CloseType::from("5").label(), "ADL自动减仓");
        assert_eq!(CloseType::from("9"), CloseType::Unknown("9".to_string()));
        assert!(CloseType::from("3").is_forced());
        assert!(!CloseType::from("2").is_forced());
    }

    #[test]
    fn test_direction_label() {
        let mut pos = Position::default();
        pos.direction = "long".to_string();
        assert_eq!(pos.direction_label(), "多");
        pos.direction = "short".to_string();
        assert_eq!(pos.direction_label(), "空");
    }

    #[test]
    fn test_realized_pnl_inconsistency_reported() {
        let pos = Position {
            pnl: "10".to_string(),
            fee: "-1".to_string(),
            funding_fee: "0.5".to_string(),
            realized_pnl: "12".to_string(),
            ..Default::default()
        };
        assert!(!pos.realized_pnl_consistent(1e-9));
    }
}
