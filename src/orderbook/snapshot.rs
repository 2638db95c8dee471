//! Depth snapshots of the book's resting liquidity.

use super::order::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// One price level in a depth snapshot: the price and the total remaining
/// quantity resting there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// The level's price.
    pub price: Price,
    /// Sum of remaining quantities of every order at this price.
    pub quantity: Quantity,
}

/// A point-in-time view of both sides of the book.
///
/// Bids are listed best-first in descending price order, asks best-first
/// in ascending price order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookDepth {
    /// Bid levels, highest price first.
    pub bids: Vec<LevelInfo>,
    /// Ask levels, lowest price first.
    pub asks: Vec<LevelInfo>,
}

impl BookDepth {
    /// The best (highest) bid level, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<LevelInfo> {
        self.bids.first().copied()
    }

    /// The best (lowest) ask level, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<LevelInfo> {
        self.asks.first().copied()
    }

    /// Total remaining quantity across all bid levels.
    #[must_use]
    pub fn total_bid_quantity(&self) -> u64 {
        self.bids.iter().map(|level| u64::from(level.quantity)).sum()
    }

    /// Total remaining quantity across all ask levels.
    #[must_use]
    pub fn total_ask_quantity(&self) -> u64 {
        self.asks.iter().map(|level| u64::from(level.quantity)).sum()
    }
}
