//! Prelude re-exporting the types needed for everyday use of the book.
//!
//! ```rust
//! use matchbook::prelude::*;
//!
//! let book = Orderbook::new();
//! book.add_order(Order::new(OrderType::GoodTillCancel, 1, Side::Buy, 100, 10));
//! ```

pub use crate::orderbook::Orderbook;

// Domain types and constants
pub use crate::orderbook::order::{
    Order, OrderId, OrderIds, OrderModify, OrderType, Price, Quantity, Side, INVALID_PRICE,
};

// Trades and lifecycle events
pub use crate::orderbook::events::{BookEvent, EventListener};
pub use crate::orderbook::trade::{Trade, TradeInfo, Trades};

// Snapshots
pub use crate::orderbook::snapshot::{BookDepth, LevelInfo};

// Configuration and rejection reasons
pub use crate::orderbook::error::RejectReason;
pub use crate::orderbook::expiry::BookConfig;

// Utility functions
pub use crate::utils::current_time_millis;
