use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price tick for a single symbol
///
/// Payload of a [`price_update`](crate::types::event::PRICE_UPDATE) frame.
/// Timestamps are naive ISO-8601, as the backend emits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub bid: Decimal,
    pub ask: Decimal,
    pub spread: Decimal,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub volume: u64,
}

/// One row of a market overview snapshot
///
/// Payload items of a
/// [`market_overview`](crate::types::event::MARKET_OVERVIEW) frame, which
/// carries a `Vec<MarketTicker>` covering every streamed symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTicker {
    pub symbol: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    #[serde(default)]
    pub volume: u64,
    pub high: Decimal,
    pub low: Decimal,
    pub timestamp: NaiveDateTime,
}

/// Portfolio performance snapshot
///
/// Payload of a [`portfolio_update`](crate::types::event::PORTFOLIO_UPDATE)
/// frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub total_balance: Decimal,
    pub equity: Decimal,
    pub margin: Decimal,
    pub free_margin: Decimal,
    pub profit_loss: Decimal,
    pub daily_pnl: Decimal,
    pub open_positions: u32,
    pub win_rate: f64,
    pub timestamp: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_price_quote_from_backend_json() {
        let quote: PriceQuote = serde_json::from_str(
            r#"{
                "bid": 1.08901,
                "ask": 1.08923,
                "spread": 0.00022,
                "timestamp": "2024-06-01T12:34:56.789123",
                "volume": 512
            }"#,
        )
        .unwrap();
        assert_eq!(quote.bid, Decimal::from_str("1.08901").unwrap());
        assert_eq!(quote.volume, 512);
    }

    #[test]
    fn test_portfolio_snapshot_from_backend_json() {
        let snapshot: PortfolioSnapshot = serde_json::from_str(
            r#"{
                "total_balance": 52340.5,
                "equity": 51200.25,
                "margin": 2300.0,
                "free_margin": 42100.0,
                "profit_loss": 1140.25,
                "daily_pnl": -230.5,
                "open_positions": 4,
                "win_rate": 0.72,
                "timestamp": "2024-06-01T12:00:00"
            }"#,
        )
        .unwrap();
        assert_eq!(snapshot.open_positions, 4);
        assert_eq!(snapshot.daily_pnl, Decimal::from_str("-230.5").unwrap());
    }
}
