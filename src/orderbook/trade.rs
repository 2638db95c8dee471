//! Trade records produced by the matching engine.

use super::order::{OrderId, Price, Quantity};
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One side of an executed trade: the resting order's id, the price
/// recorded for that side at match time, and the traded quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeInfo {
    /// Identifier of the order on this side.
    pub order_id: OrderId,
    /// The price this side was resting at when the match occurred.
    pub price: Price,
    /// Executed quantity.
    pub quantity: Quantity,
}

/// An executed trade, pairing the bid- and ask-side information.
///
/// Each side carries its own resting price; the engine does not collapse
/// them into a single execution price. Both sides always report the same
/// quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier for this execution.
    pub trade_id: Uuid,
    /// Buy-side information.
    pub bid: TradeInfo,
    /// Sell-side information.
    pub ask: TradeInfo,
    /// Wall-clock time of the execution, milliseconds since the epoch.
    pub timestamp_ms: u64,
}

impl Trade {
    pub(crate) fn new(bid: TradeInfo, ask: TradeInfo) -> Self {
        debug_assert_eq!(bid.quantity, ask.quantity);
        Self {
            trade_id: Uuid::new_v4(),
            bid,
            ask,
            timestamp_ms: current_time_millis(),
        }
    }

    /// The quantity exchanged, identical on both sides.
    #[must_use]
    #[inline]
    pub fn quantity(&self) -> Quantity {
        self.bid.quantity
    }
}

/// The sequence of trades produced by a single submission.
pub type Trades = Vec<Trade>;
