use std::collections::HashMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a trading signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalSide {
    Buy,
    Sell,
}

/// Risk classification attached to a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// AI trading signal
///
/// Payload items of [`trading_signals`](crate::types::event::TRADING_SIGNALS)
/// and [`active_signals`](crate::types::event::ACTIVE_SIGNALS) frames, and
/// the payload of a
/// [`realtime_signal`](crate::types::event::REALTIME_SIGNAL) frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: SignalSide,
    pub confidence: f64,
    pub entry_price: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

/// Status change for an active signal
///
/// Payload of a [`signal_update`](crate::types::event::SIGNAL_UPDATE) frame.
/// Observed statuses: `hit_tp`, `hit_sl`, `modified`, `expired`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalUpdate {
    pub signal_id: String,
    pub status: String,
    pub timestamp: NaiveDateTime,
}

/// Signal generation statistics
///
/// Payload of a
/// [`signal_statistics`](crate::types::event::SIGNAL_STATISTICS) frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalStatistics {
    pub total_active_signals: u32,
    #[serde(default)]
    pub subscribers_count: u32,
    #[serde(default)]
    pub signals_by_style: HashMap<String, u32>,
    #[serde(default)]
    pub signals_by_type: HashMap<String, u32>,
}
