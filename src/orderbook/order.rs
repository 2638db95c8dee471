//! Order domain types: prices, quantities, sides, order types and the
//! order record itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Limit price in integer ticks. Negative prices are permitted (some
/// futures markets trade through zero).
pub type Price = i32;

/// Order quantity in whole units. Strictly positive at submission.
pub type Quantity = u32;

/// Unique order identifier, assigned by the caller.
pub type OrderId = u64;

/// A batch of order identifiers, as collected by the expiry worker.
pub type OrderIds = Vec<OrderId>;

/// Sentinel price carried by market orders before admission. A market
/// order never rests with this price: admission either promotes it to a
/// concrete limit price or rejects it.
pub const INVALID_PRICE: Price = Price::MIN;

/// Which side of the book an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// A bid: willing to buy at or below the limit price.
    Buy,
    /// An ask: willing to sell at or above the limit price.
    Sell,
}

impl Side {
    /// Returns the opposite side of the book.
    #[must_use]
    #[inline]
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// Lifecycle policy of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Rests in the book until filled or explicitly cancelled.
    GoodTillCancel,
    /// Matches whatever it can on arrival; any remainder is cancelled.
    FillAndKill,
    /// Accepted only if it can be completely filled on arrival.
    FillOrKill,
    /// Rests like `GoodTillCancel` but is cancelled at the daily cutoff.
    GoodForDay,
    /// Executes at any price; crosses every reachable opposite level.
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderType::GoodTillCancel => "GoodTillCancel",
            OrderType::FillAndKill => "FillAndKill",
            OrderType::FillOrKill => "FillOrKill",
            OrderType::GoodForDay => "GoodForDay",
            OrderType::Market => "Market",
        };
        write!(f, "{name}")
    }
}

/// A single order: immutable identity plus the mutable remaining quantity.
///
/// Orders are created by the caller and handed to
/// [`Orderbook::add_order`](crate::Orderbook::add_order); once accepted the
/// book exclusively owns the live record and only hands out copies (in
/// events and snapshots). Fills are applied by the matching engine, never
/// by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    order_type: OrderType,
    id: OrderId,
    side: Side,
    price: Price,
    initial_quantity: Quantity,
    remaining_quantity: Quantity,
}

impl Order {
    /// Creates a new limit order.
    #[must_use]
    pub fn new(
        order_type: OrderType,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            order_type,
            id,
            side,
            price,
            initial_quantity: quantity,
            remaining_quantity: quantity,
        }
    }

    /// Creates a market order. The price is a sentinel until admission
    /// promotes the order to a concrete limit.
    #[must_use]
    pub fn market(id: OrderId, side: Side, quantity: Quantity) -> Self {
        Self::new(OrderType::Market, id, side, INVALID_PRICE, quantity)
    }

    /// The order's unique identifier.
    #[must_use]
    #[inline]
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Buy or Sell.
    #[must_use]
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// The current limit price.
    #[must_use]
    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// The current order type.
    #[must_use]
    #[inline]
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Quantity at submission time.
    #[must_use]
    #[inline]
    pub fn initial_quantity(&self) -> Quantity {
        self.initial_quantity
    }

    /// Quantity not yet executed.
    #[must_use]
    #[inline]
    pub fn remaining_quantity(&self) -> Quantity {
        self.remaining_quantity
    }

    /// Cumulative executed quantity.
    #[must_use]
    #[inline]
    pub fn filled_quantity(&self) -> Quantity {
        self.initial_quantity - self.remaining_quantity
    }

    /// True once the remaining quantity reaches zero.
    #[must_use]
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Applies an execution of `quantity` units.
    ///
    /// # Panics
    /// Panics if `quantity` exceeds the remaining quantity. The matching
    /// engine always fills the minimum of both heads, so this is
    /// unreachable from well-formed callers.
    pub(crate) fn fill(&mut self, quantity: Quantity) {
        assert!(
            quantity <= self.remaining_quantity,
            "order {} cannot be filled for more than its remaining quantity",
            self.id
        );
        self.remaining_quantity -= quantity;
    }

    /// Promotes a market order to a good-till-cancel limit at `price`.
    ///
    /// # Panics
    /// Panics if the order is not a market order. Only market orders may
    /// have their price adjusted.
    pub(crate) fn to_good_till_cancel(&mut self, price: Price) {
        assert!(
            self.order_type == OrderType::Market,
            "order {} cannot have its price adjusted, only market orders can",
            self.id
        );
        self.price = price;
        self.order_type = OrderType::GoodTillCancel;
    }
}

/// A request to replace an existing order with new parameters.
///
/// Applying a modification cancels the old order and re-submits a fresh
/// one under the same id, preserving the original order type. The
/// replacement joins the back of the FIFO queue at its price, so time
/// priority is deliberately lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderModify {
    /// Identifier of the order to replace.
    pub order_id: OrderId,
    /// New side.
    pub side: Side,
    /// New limit price.
    pub price: Price,
    /// New total quantity.
    pub quantity: Quantity,
}

impl OrderModify {
    /// Creates a new modification request.
    #[must_use]
    pub fn new(order_id: OrderId, side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            order_id,
            side,
            price,
            quantity,
        }
    }

    /// Materializes the replacement order, carrying over the type captured
    /// from the order being replaced.
    #[must_use]
    pub fn to_order(&self, order_type: OrderType) -> Order {
        Order::new(
            order_type,
            self.order_id,
            self.side,
            self.price,
            self.quantity,
        )
    }
}
