//! Public mutators (add, cancel, modify) and the internal removal
//! plumbing they share with the matching engine and the expiry worker.

use super::book::{BookCore, Orderbook};
use super::error::RejectReason;
use super::events::BookEvent;
use super::level::{LevelAction, OrderNode};
use super::order::{Order, OrderId, OrderIds, OrderModify, OrderType, Side};
use super::trade::Trades;
use tracing::trace;

impl Orderbook {
    /// Submits an order, returning the trades produced by admission-time
    /// matching.
    ///
    /// A rejected submission (duplicate id, market order against an empty
    /// opposite side, fill-and-kill that would not cross, fill-or-kill
    /// that cannot fully fill, zero quantity) returns an empty list and
    /// leaves the book untouched.
    pub fn add_order(&self, order: Order) -> Trades {
        trace!(
            order_id = order.id(),
            side = %order.side(),
            order_type = %order.order_type(),
            price = order.price(),
            quantity = order.initial_quantity(),
            "submitting order"
        );
        let trades = self.core().add_order(order);
        self.record_last_trade(&trades);
        trades
    }

    /// Cancels a resting order. Unknown ids are a silent no-op.
    pub fn cancel_order(&self, order_id: OrderId) {
        self.core().cancel_order(order_id);
    }

    /// Atomically replaces an order: the existing order is cancelled and
    /// a fresh one with the same id and the captured order type is
    /// submitted, all in one critical section. Returns the trades
    /// produced by the re-submission. Unknown ids are a no-op.
    pub fn modify_order(&self, modify: OrderModify) -> Trades {
        let trades = self.core().modify_order(modify);
        self.record_last_trade(&trades);
        trades
    }
}

impl BookCore {
    /// Admission sequence: validate, promote market orders, apply the
    /// per-type acceptance checks in fixed order, then index the order
    /// and run the matching loop.
    pub(crate) fn add_order(&mut self, mut order: Order) -> Trades {
        if order.initial_quantity() == 0 {
            trace!(reason = %RejectReason::ZeroQuantity(order.id()), "order rejected");
            return Vec::new();
        }

        if self.orders.contains_key(&order.id()) {
            trace!(reason = %RejectReason::DuplicateOrderId(order.id()), "order rejected");
            return Vec::new();
        }

        // A market order becomes a good-till-cancel limit at the far end
        // of the opposite side, which guarantees it crosses every resting
        // opposite level before any residue could rest.
        if order.order_type() == OrderType::Market {
            let far_end = match order.side() {
                Side::Buy => self.asks.keys().next_back().copied(),
                Side::Sell => self.bids.keys().next().copied(),
            };
            match far_end {
                Some(price) => {
                    order.to_good_till_cancel(price);
                    debug_assert!(
                        match order.side() {
                            Side::Buy => self.asks.keys().all(|&p| order.price() >= p),
                            Side::Sell => self.bids.keys().all(|&p| order.price() <= p),
                        },
                        "promoted market order must cross every reachable opposite level"
                    );
                }
                None => {
                    let reason = RejectReason::NoOppositeLiquidity { side: order.side() };
                    trace!(%reason, order_id = order.id(), "order rejected");
                    return Vec::new();
                }
            }
        }

        if order.order_type() == OrderType::FillAndKill
            && !self.can_match(order.side(), order.price())
        {
            let reason = RejectReason::NotCrossable {
                side: order.side(),
                price: order.price(),
            };
            trace!(%reason, order_id = order.id(), "order rejected");
            return Vec::new();
        }

        if order.order_type() == OrderType::FillOrKill
            && !self.can_fully_fill(order.side(), order.price(), order.initial_quantity())
        {
            let reason = RejectReason::NotFullyFillable {
                side: order.side(),
                price: order.price(),
                quantity: order.initial_quantity(),
            };
            trace!(%reason, order_id = order.id(), "order rejected");
            return Vec::new();
        }

        let id = order.id();
        let side = order.side();
        let price = order.price();

        self.orders.insert(id, OrderNode::new(order));
        let level = match side {
            Side::Buy => self.bids.entry(price).or_default(),
            Side::Sell => self.asks.entry(price).or_default(),
        };
        level.push_back(&mut self.orders, id);

        self.update_level_data(price, order.initial_quantity(), LevelAction::Add);
        trace!(order_id = id, %side, price, "order added");
        self.emit(BookEvent::OrderAdded(order));

        self.match_orders()
    }

    /// Cancels by id: unlink, repair aggregates, emit the cancellation.
    pub(crate) fn cancel_order(&mut self, order_id: OrderId) {
        let Some(order) = self.remove_from_book(order_id) else {
            trace!(order_id, "cancel ignored, unknown order id");
            return;
        };
        self.update_level_data(order.price(), order.remaining_quantity(), LevelAction::Remove);
        trace!(order_id, price = order.price(), side = %order.side(), "order cancelled");
        self.emit(BookEvent::OrderCancelled(order));
    }

    /// Cancel-and-reinsert under one critical section, preserving the
    /// existing order's type. The replacement joins the back of its FIFO
    /// queue, losing time priority.
    pub(crate) fn modify_order(&mut self, modify: OrderModify) -> Trades {
        let Some(order_type) = self
            .orders
            .get(&modify.order_id)
            .map(|node| node.order.order_type())
        else {
            trace!(order_id = modify.order_id, "modify ignored, unknown order id");
            return Vec::new();
        };

        trace!(
            order_id = modify.order_id,
            side = %modify.side,
            price = modify.price,
            quantity = modify.quantity,
            "modifying order"
        );
        self.cancel_order(modify.order_id);
        self.add_order(modify.to_order(order_type))
    }

    /// Removes an order from its FIFO queue and the by-id index, pruning
    /// the level if the queue drained. Returns the removed record.
    /// Aggregates are untouched; the caller chooses the right action.
    pub(crate) fn remove_from_book(&mut self, order_id: OrderId) -> Option<Order> {
        let (price, side) = {
            let node = self.orders.get(&order_id)?;
            (node.order.price(), node.order.side())
        };

        let side_map = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        if let Some(level) = side_map.get_mut(&price) {
            level.unlink(&mut self.orders, order_id);
            if level.is_empty() {
                side_map.remove(&price);
            }
        }

        self.orders.remove(&order_id).map(|node| node.order)
    }

    /// Cancels every good-for-day order currently in the book. Called by
    /// the expiry worker inside a single critical section so the batch of
    /// cancellation events is contiguous.
    pub(crate) fn cancel_good_for_day(&mut self) -> usize {
        let expired: OrderIds = self
            .orders
            .values()
            .filter(|node| node.order.order_type() == OrderType::GoodForDay)
            .map(|node| node.order.id())
            .collect();

        for &id in &expired {
            self.cancel_order(id);
        }
        expired.len()
    }
}
