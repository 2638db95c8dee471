//! Core order book state and the thread-safe `Orderbook` facade.

use super::events::{BookEvent, EventListener};
use super::expiry::{self, BookConfig};
use super::level::{LevelAction, LevelData, OrderNode, PriceLevel};
use super::order::{OrderId, Price, Quantity, Side};
use super::snapshot::{BookDepth, LevelInfo};
use crossbeam::atomic::AtomicCell;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::trace;

/// The mutable book state. Three cross-indexed structures that stay
/// mutually consistent under the single book lock:
///
/// - `bids` / `asks`: price-ordered maps of FIFO queues. The best bid is
///   the last key of `bids`, the best ask the first key of `asks`.
/// - `orders`: the by-id index, which also owns every live order record
///   and threads each level's FIFO links through its nodes.
/// - `level_data`: per-price aggregates over both sides, used by the
///   fill-or-kill feasibility walk.
pub(crate) struct BookCore {
    pub(crate) bids: BTreeMap<Price, PriceLevel>,
    pub(crate) asks: BTreeMap<Price, PriceLevel>,
    pub(crate) orders: HashMap<OrderId, OrderNode>,
    pub(crate) level_data: HashMap<Price, LevelData>,
    pub(crate) event_listener: Option<EventListener>,
}

impl BookCore {
    pub(crate) fn new(event_listener: Option<EventListener>) -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            orders: HashMap::new(),
            level_data: HashMap::new(),
            event_listener,
        }
    }

    /// Hands an event to the listener, if one is installed. Runs under
    /// the book lock; listeners must not call back into the book.
    pub(crate) fn emit(&self, event: BookEvent) {
        if let Some(listener) = &self.event_listener {
            listener(&event);
        }
    }

    /// Single update routine for the level aggregates. The entry is
    /// erased as soon as its live-order count reaches zero, which also
    /// covers a price shared by both sides: the aggregate survives until
    /// the last order at that price is gone.
    pub(crate) fn update_level_data(
        &mut self,
        price: Price,
        quantity: Quantity,
        action: LevelAction,
    ) {
        let data = self.level_data.entry(price).or_default();
        match action {
            LevelAction::Add => {
                data.count += 1;
                data.quantity += quantity;
            }
            LevelAction::Remove => {
                data.count -= 1;
                data.quantity -= quantity;
            }
            LevelAction::Match => {
                data.quantity -= quantity;
            }
        }
        if data.count == 0 {
            self.level_data.remove(&price);
        }
    }

    #[inline]
    pub(crate) fn best_bid_price(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    #[inline]
    pub(crate) fn best_ask_price(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    /// Head order id of the best level on `side`, if the side is
    /// non-empty.
    pub(crate) fn best_head(&self, side: Side) -> Option<OrderId> {
        match side {
            Side::Buy => self.bids.values().next_back().and_then(|level| level.head),
            Side::Sell => self.asks.values().next().and_then(|level| level.head),
        }
    }

    /// Builds a depth snapshot by walking every level's queue. Bids are
    /// reported best-first (descending), asks best-first (ascending).
    pub(crate) fn depth(&self) -> BookDepth {
        let bids = self
            .bids
            .iter()
            .rev()
            .map(|(&price, level)| LevelInfo {
                price,
                quantity: level.total_remaining(&self.orders),
            })
            .collect();
        let asks = self
            .asks
            .iter()
            .map(|(&price, level)| LevelInfo {
                price,
                quantity: level.total_remaining(&self.orders),
            })
            .collect();
        BookDepth { bids, asks }
    }
}

/// State shared between the caller-facing facade and the expiry worker.
pub(crate) struct BookShared {
    pub(crate) core: Mutex<BookCore>,
    /// Paired with `core`'s mutex: the expiry worker waits on it and
    /// shutdown wakes it immediately.
    pub(crate) shutdown_cv: Condvar,
    pub(crate) shutdown: AtomicBool,
    /// Last execution price, readable without the book lock.
    pub(crate) last_trade_price: AtomicCell<Price>,
    pub(crate) has_traded: AtomicBool,
}

/// A price-time priority limit order book.
///
/// All mutators and snapshot reads serialize on a single exclusive lock;
/// a background worker cancels good-for-day orders at the configured
/// daily cutoff and is joined when the book is dropped.
///
/// # Examples
///
/// ```
/// use matchbook::{Order, Orderbook, OrderType, Side};
///
/// let book = Orderbook::new();
/// book.add_order(Order::new(OrderType::GoodTillCancel, 1, Side::Buy, 100, 10));
/// let trades = book.add_order(Order::new(OrderType::GoodTillCancel, 2, Side::Sell, 100, 4));
/// assert_eq!(trades.len(), 1);
/// assert_eq!(book.len(), 1);
/// ```
pub struct Orderbook {
    pub(crate) shared: Arc<BookShared>,
    expiry_worker: Option<JoinHandle<()>>,
}

impl Orderbook {
    /// Creates an empty book with the default expiry configuration
    /// (16:00 local cutoff, 100 ms slack) and starts the expiry worker.
    #[must_use]
    pub fn new() -> Self {
        Self::build(BookConfig::default(), None)
    }

    /// Creates an empty book with a custom expiry configuration.
    #[must_use]
    pub fn with_config(config: BookConfig) -> Self {
        Self::build(config, None)
    }

    /// Creates an empty book that reports lifecycle events to `listener`.
    #[must_use]
    pub fn with_event_listener(listener: EventListener) -> Self {
        Self::build(BookConfig::default(), Some(listener))
    }

    /// Creates an empty book with both a custom configuration and an
    /// event listener.
    #[must_use]
    pub fn with_config_and_listener(config: BookConfig, listener: EventListener) -> Self {
        Self::build(config, Some(listener))
    }

    fn build(config: BookConfig, listener: Option<EventListener>) -> Self {
        let shared = Arc::new(BookShared {
            core: Mutex::new(BookCore::new(listener)),
            shutdown_cv: Condvar::new(),
            shutdown: AtomicBool::new(false),
            last_trade_price: AtomicCell::new(0),
            has_traded: AtomicBool::new(false),
        });

        let worker = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || expiry::run(&shared, config))
        };

        Self {
            shared,
            expiry_worker: Some(worker),
        }
    }

    /// Locks the core state, recovering the guard if a panicking holder
    /// poisoned the mutex.
    pub(crate) fn core(&self) -> MutexGuard<'_, BookCore> {
        self.shared
            .core
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs or replaces the event listener.
    pub fn set_event_listener(&self, listener: EventListener) {
        self.core().event_listener = Some(listener);
    }

    /// Removes the event listener.
    pub fn clear_event_listener(&self) {
        self.core().event_listener = None;
    }

    /// Number of live orders in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.core().orders.len()
    }

    /// True when no orders are resting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.core().orders.is_empty()
    }

    /// The best (highest) bid price, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<Price> {
        self.core().best_bid_price()
    }

    /// The best (lowest) ask price, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<Price> {
        self.core().best_ask_price()
    }

    /// Best ask minus best bid, when both sides are populated.
    #[must_use]
    pub fn spread(&self) -> Option<Price> {
        let core = self.core();
        match (core.best_bid_price(), core.best_ask_price()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Midpoint of the best bid and ask, when both sides are populated.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        let core = self.core();
        match (core.best_bid_price(), core.best_ask_price()) {
            (Some(bid), Some(ask)) => Some((f64::from(bid) + f64::from(ask)) / 2.0),
            _ => None,
        }
    }

    /// The ask-side resting price of the most recent execution, if any
    /// trade has occurred. Lock-free.
    #[must_use]
    pub fn last_trade_price(&self) -> Option<Price> {
        if self.shared.has_traded.load(Ordering::Relaxed) {
            Some(self.shared.last_trade_price.load())
        } else {
            None
        }
    }

    /// A point-in-time depth snapshot: bids descending, asks ascending,
    /// each level reporting its total remaining quantity.
    #[must_use]
    pub fn depth_snapshot(&self) -> BookDepth {
        self.core().depth()
    }

    /// Records the most recent execution in the lock-free cells.
    pub(crate) fn record_last_trade(&self, trades: &super::trade::Trades) {
        if let Some(trade) = trades.last() {
            self.shared.last_trade_price.store(trade.ask.price);
            self.shared.has_traded.store(true, Ordering::Relaxed);
        }
    }
}

impl Default for Orderbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Orderbook {
    /// Signals shutdown, wakes the expiry worker and joins it before the
    /// book's state is torn down.
    fn drop(&mut self) {
        // Store the flag under the book lock: the worker checks it while
        // holding the same lock before waiting, so the notification below
        // can never be lost.
        {
            let _core = self.core();
            self.shared.shutdown.store(true, Ordering::Release);
        }
        self.shared.shutdown_cv.notify_all();
        if let Some(worker) = self.expiry_worker.take() {
            if worker.join().is_err() {
                trace!("expiry worker exited with a panic");
            }
        }
    }
}
