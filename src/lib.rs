//! # Matchbook
//!
//! A price-time priority limit order matching engine.
//!
//! The book maintains two price-ordered sides of FIFO queues, a by-id
//! index for O(1) cancellation and per-price aggregates for O(levels)
//! fill-or-kill feasibility checks. Incoming orders are matched against
//! the opposite side immediately on admission; resting liquidity is
//! served best price first, then earliest arrival.
//!
//! ## Order types
//!
//! - **GoodTillCancel**: rests until filled or cancelled.
//! - **GoodForDay**: rests like GoodTillCancel, but a background worker
//!   cancels it at the daily cutoff (16:00 local by default,
//!   configurable via [`BookConfig`]).
//! - **FillAndKill**: matches what it can on arrival; the remainder is
//!   cancelled rather than rested.
//! - **FillOrKill**: accepted only when the book can fill it completely.
//! - **Market**: promoted at admission to a limit at the far end of the
//!   opposite side, so it sweeps every reachable level.
//!
//! ## Concurrency
//!
//! All mutation happens under a single exclusive book lock, shared with
//! the expiry worker through a condition variable; dropping the book
//! signals shutdown and joins the worker. [`Orderbook`] is `Send + Sync`
//! and its methods take `&self`.
//!
//! ## Events
//!
//! Every lifecycle transition is reported synchronously to an optional
//! [`EventListener`], in the exact order the mutations committed. Adapters can persist or render the stream; the
//! engine itself performs no I/O.
//!
//! ## Example
//!
//! ```
//! use matchbook::{Order, Orderbook, OrderType, Side};
//!
//! let book = Orderbook::new();
//!
//! book.add_order(Order::new(OrderType::GoodTillCancel, 1, Side::Buy, 100, 10));
//! book.add_order(Order::new(OrderType::GoodTillCancel, 2, Side::Buy, 100, 5));
//!
//! // Crosses the resting bids, best price first, then FIFO.
//! let trades = book.add_order(Order::new(OrderType::GoodTillCancel, 3, Side::Sell, 100, 7));
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].bid.order_id, 1);
//! assert_eq!(trades[0].quantity(), 7);
//!
//! let depth = book.depth_snapshot();
//! assert_eq!(depth.bids[0].quantity, 8); // 3 left on order 1, 5 on order 2
//! assert!(depth.asks.is_empty());
//! ```

pub mod orderbook;

pub mod prelude;
mod utils;

pub use orderbook::{
    BookConfig, BookDepth, BookEvent, EventListener, LevelInfo, Order, OrderId, OrderIds,
    OrderModify, OrderType, Orderbook, Price, Quantity, RejectReason, Side, Trade, TradeInfo,
    Trades, INVALID_PRICE,
};
pub use utils::current_time_millis;
