//! Price-level FIFO queues and per-level aggregates.
//!
//! Each price level stores only the head and tail of a doubly-linked
//! queue; the links themselves are threaded through the by-id order map
//! via `prev`/`next` order ids. This keeps a single owning container for
//! every live order while giving O(1) removal from any queue position,
//! so cancellation never scans a level.

use super::order::{Order, OrderId, Quantity};
use std::collections::HashMap;

/// A live order together with its position in its level's FIFO queue.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderNode {
    pub(crate) order: Order,
    pub(crate) prev: Option<OrderId>,
    pub(crate) next: Option<OrderId>,
}

impl OrderNode {
    pub(crate) fn new(order: Order) -> Self {
        Self {
            order,
            prev: None,
            next: None,
        }
    }
}

/// FIFO queue of live orders at one price, earliest accepted first.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PriceLevel {
    pub(crate) head: Option<OrderId>,
    pub(crate) tail: Option<OrderId>,
}

impl PriceLevel {
    /// Appends `id` at the back of the queue. The node must already be
    /// present in `orders` with cleared links.
    pub(crate) fn push_back(&mut self, orders: &mut HashMap<OrderId, OrderNode>, id: OrderId) {
        match self.tail {
            Some(tail) => {
                if let Some(node) = orders.get_mut(&tail) {
                    node.next = Some(id);
                }
                if let Some(node) = orders.get_mut(&id) {
                    node.prev = Some(tail);
                    node.next = None;
                }
                self.tail = Some(id);
            }
            None => {
                if let Some(node) = orders.get_mut(&id) {
                    node.prev = None;
                    node.next = None;
                }
                self.head = Some(id);
                self.tail = Some(id);
            }
        }
    }

    /// Unlinks `id` from anywhere in the queue, patching its neighbours.
    /// The node itself stays in `orders`; the caller decides whether to
    /// drop it.
    pub(crate) fn unlink(&mut self, orders: &mut HashMap<OrderId, OrderNode>, id: OrderId) {
        let (prev, next) = match orders.get(&id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = orders.get_mut(&p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = orders.get_mut(&n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = orders.get_mut(&id) {
            node.prev = None;
            node.next = None;
        }
    }

    /// True once the queue holds no orders.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Sums the remaining quantity of every order in the queue.
    pub(crate) fn total_remaining(&self, orders: &HashMap<OrderId, OrderNode>) -> Quantity {
        let mut total: Quantity = 0;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            match orders.get(&id) {
                Some(node) => {
                    total += node.order.remaining_quantity();
                    cursor = node.next;
                }
                None => break,
            }
        }
        total
    }

    /// Number of orders currently linked in the queue.
    pub(crate) fn len(&self, orders: &HashMap<OrderId, OrderNode>) -> usize {
        let mut count = 0;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            match orders.get(&id) {
                Some(node) => {
                    count += 1;
                    cursor = node.next;
                }
                None => break,
            }
        }
        count
    }
}

/// Aggregate state for one price across both sides of the book: total
/// remaining quantity and live order count. Used by the fill-or-kill
/// feasibility check to walk levels instead of individual orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LevelData {
    pub(crate) quantity: Quantity,
    pub(crate) count: u32,
}

/// How a mutation affects a level aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelAction {
    /// A new order arrived at the level.
    Add,
    /// An order left the level (cancel, or a fill that exhausted it).
    Remove,
    /// A partial fill reduced quantity without removing the order.
    Match,
}
