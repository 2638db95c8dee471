//! The matching loop and the admission-time feasibility checks.

use super::book::BookCore;
use super::events::BookEvent;
use super::level::LevelAction;
use super::order::{Order, OrderId, OrderType, Price, Quantity, Side};
use super::trade::{Trade, TradeInfo, Trades};
use tracing::{debug, trace};

impl BookCore {
    /// Crosses the best bid against the best ask for as long as the book
    /// is crossed, producing a trade per match step. Invoked after every
    /// successful admission.
    ///
    /// After the cross loop terminates, a fill-and-kill order left
    /// resting at the top of either side is cancelled: it can only be
    /// there as a consequence of the admission just processed, and a
    /// fill-and-kill must not persist.
    pub(crate) fn match_orders(&mut self) -> Trades {
        let mut trades: Trades = Vec::with_capacity(self.orders.len());

        loop {
            let (Some(bid_price), Some(ask_price)) =
                (self.best_bid_price(), self.best_ask_price())
            else {
                break;
            };
            if bid_price < ask_price {
                break;
            }

            // Walk the two head queues until one level drains; the level
            // maps prune themselves through `remove_from_book`, so a
            // vanished level simply ends the inner loop.
            loop {
                let Some(bid_id) = self.bids.get(&bid_price).and_then(|level| level.head) else {
                    break;
                };
                let Some(ask_id) = self.asks.get(&ask_price).and_then(|level| level.head) else {
                    break;
                };

                let quantity = {
                    let (Some(bid_node), Some(ask_node)) =
                        (self.orders.get(&bid_id), self.orders.get(&ask_id))
                    else {
                        break;
                    };
                    bid_node
                        .order
                        .remaining_quantity()
                        .min(ask_node.order.remaining_quantity())
                };

                let (Some(bid_order), Some(ask_order)) = (
                    self.fill_order(bid_id, quantity),
                    self.fill_order(ask_id, quantity),
                ) else {
                    break;
                };

                debug!(
                    bid_id,
                    ask_id,
                    quantity,
                    bid_price = bid_order.price(),
                    ask_price = ask_order.price(),
                    "orders matched"
                );

                if bid_order.is_filled() {
                    self.remove_from_book(bid_id);
                }
                if ask_order.is_filled() {
                    self.remove_from_book(ask_id);
                }

                self.on_order_matched(bid_order.price(), quantity, bid_order.is_filled());
                self.on_order_matched(ask_order.price(), quantity, ask_order.is_filled());

                let trade = Trade::new(
                    TradeInfo {
                        order_id: bid_order.id(),
                        price: bid_order.price(),
                        quantity,
                    },
                    TradeInfo {
                        order_id: ask_order.id(),
                        price: ask_order.price(),
                        quantity,
                    },
                );
                self.emit(BookEvent::Trade(trade.clone()));
                trades.push(trade);
            }
        }

        // Residue sweep: only the current top-of-book can hold a
        // fill-and-kill left over from this admission round.
        if let Some(id) = self.resting_fill_and_kill(Side::Buy) {
            trace!(order_id = id, "cancelling fill-and-kill residue");
            self.cancel_order(id);
        }
        if let Some(id) = self.resting_fill_and_kill(Side::Sell) {
            trace!(order_id = id, "cancelling fill-and-kill residue");
            self.cancel_order(id);
        }

        trades
    }

    /// Fills `quantity` units of the identified order and returns a copy
    /// of its post-fill state.
    fn fill_order(&mut self, id: OrderId, quantity: Quantity) -> Option<Order> {
        let node = self.orders.get_mut(&id)?;
        node.order.fill(quantity);
        Some(node.order)
    }

    /// Id of the lead order at the best level on `side` when that order
    /// is a fill-and-kill.
    fn resting_fill_and_kill(&self, side: Side) -> Option<OrderId> {
        let id = self.best_head(side)?;
        let node = self.orders.get(&id)?;
        (node.order.order_type() == OrderType::FillAndKill).then_some(id)
    }

    /// Aggregate bookkeeping for one side of a match step: a full fill
    /// removes the order from its level's aggregate, a partial fill only
    /// reduces the quantity.
    fn on_order_matched(&mut self, price: Price, quantity: Quantity, fully_filled: bool) {
        let action = if fully_filled {
            LevelAction::Remove
        } else {
            LevelAction::Match
        };
        self.update_level_data(price, quantity, action);
        self.emit(BookEvent::OrderMatched {
            price,
            quantity,
            fully_filled,
        });
    }

    /// True when an order on `side` at `price` would cross the opposite
    /// best: a buy crosses iff asks exist and `price >=` best ask, a sell
    /// iff bids exist and `price <=` best bid.
    pub(crate) fn can_match(&self, side: Side, price: Price) -> bool {
        match side {
            Side::Buy => self.best_ask_price().is_some_and(|best_ask| price >= best_ask),
            Side::Sell => self.best_bid_price().is_some_and(|best_bid| price <= best_bid),
        }
    }

    /// Fill-or-kill feasibility: walks the level aggregates instead of
    /// individual orders, counting only levels that are reachable from
    /// the current opposite best and within the caller's limit price.
    pub(crate) fn can_fully_fill(&self, side: Side, price: Price, quantity: Quantity) -> bool {
        if !self.can_match(side, price) {
            return false;
        }

        let threshold = match side {
            Side::Buy => self.best_ask_price(),
            Side::Sell => self.best_bid_price(),
        };
        let Some(threshold) = threshold else {
            return false;
        };

        let mut needed = quantity;
        for (&level_price, data) in &self.level_data {
            let unreachable = match side {
                Side::Buy => level_price < threshold,
                Side::Sell => level_price > threshold,
            };
            if unreachable {
                continue;
            }

            let outside_limit = match side {
                Side::Buy => level_price > price,
                Side::Sell => level_price < price,
            };
            if outside_limit {
                continue;
            }

            if needed <= data.quantity {
                return true;
            }
            needed -= data.quantity;
        }

        false
    }
}
