//! Submission rejection reasons.

use super::order::{OrderId, Price, Quantity, Side};
use std::fmt;

/// Why a submission was turned away at admission time.
///
/// Rejections are not errors: `add_order` returns an empty trade list and
/// the order is simply never indexed. The reason is logged via `tracing`
/// and exposed here for documentation and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RejectReason {
    /// An order with this id is already live in the book.
    DuplicateOrderId(OrderId),

    /// Submitted with a quantity of zero.
    ZeroQuantity(OrderId),

    /// A market order arrived while the opposite side was empty.
    NoOppositeLiquidity {
        /// Side of the rejected market order.
        side: Side,
    },

    /// A fill-and-kill order that would not cross the opposite best.
    NotCrossable {
        /// Side of the rejected order.
        side: Side,
        /// Its limit price.
        price: Price,
    },

    /// A fill-or-kill order that cannot be completely filled from the
    /// levels reachable at its limit price.
    NotFullyFillable {
        /// Side of the rejected order.
        side: Side,
        /// Its limit price.
        price: Price,
        /// The quantity that would have had to fill.
        quantity: Quantity,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::DuplicateOrderId(id) => {
                write!(f, "duplicate order id {id}")
            }
            RejectReason::ZeroQuantity(id) => {
                write!(f, "order {id} submitted with zero quantity")
            }
            RejectReason::NoOppositeLiquidity { side } => {
                write!(f, "market {side} order has no opposite liquidity")
            }
            RejectReason::NotCrossable { side, price } => {
                write!(
                    f,
                    "fill-and-kill {side} order at {price} does not cross the book"
                )
            }
            RejectReason::NotFullyFillable {
                side,
                price,
                quantity,
            } => {
                write!(
                    f,
                    "fill-or-kill {side} order for {quantity} at {price} cannot be fully filled"
                )
            }
        }
    }
}
