//! Typed lifecycle events emitted by the book.
//!
//! The event stream replaces inline logging of mutations with structured
//! records an adapter can persist, render or forward. Emission is
//! synchronous and happens while the book lock is held, so events are
//! observed in exactly the order their underlying mutations committed.

use super::order::{Order, Price, Quantity};
use super::trade::Trade;
use serde::Serialize;
use std::sync::Arc;

/// A lifecycle event observed by the book's listener.
#[derive(Debug, Clone, Serialize)]
pub enum BookEvent {
    /// An order passed admission and was indexed. Carries a snapshot of
    /// the order as inserted (after any market-order promotion).
    OrderAdded(Order),

    /// An order left the book without fully filling: explicit cancel,
    /// fill-and-kill residue sweep, or day-order expiry. The snapshot
    /// carries the remaining quantity at removal time.
    OrderCancelled(Order),

    /// One side of a match executed at `price` for `quantity` units.
    /// Emitted once per participating order per match step.
    OrderMatched {
        /// The resting price of the matched order.
        price: Price,
        /// Quantity executed in this step.
        quantity: Quantity,
        /// Whether this fill exhausted the order.
        fully_filled: bool,
    },

    /// A completed execution pairing both sides.
    Trade(Trade),
}

/// Callback invoked for every [`BookEvent`].
///
/// The listener runs synchronously under the book lock: it must be cheap
/// and must not call back into the book, or the calling thread deadlocks.
pub type EventListener = Arc<dyn Fn(&BookEvent) + Send + Sync>;
