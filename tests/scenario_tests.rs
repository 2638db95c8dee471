//! End-to-end scenarios through the public API.

use matchbook::prelude::*;

fn gtc(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Order {
    Order::new(OrderType::GoodTillCancel, id, side, price, quantity)
}

#[test]
fn test_price_time_priority_within_level() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Buy, 100, 10));
    book.add_order(gtc(2, Side::Buy, 100, 5));

    let trades = book.add_order(gtc(3, Side::Sell, 100, 7));
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].bid.order_id, 1);
    assert_eq!(trades[0].ask.order_id, 3);
    assert_eq!(trades[0].quantity(), 7);

    // Order 1 keeps 3, order 2 keeps 5, no asks remain.
    assert_eq!(book.len(), 2);
    let depth = book.depth_snapshot();
    assert_eq!(depth.bids, vec![LevelInfo { price: 100, quantity: 8 }]);
    assert!(depth.asks.is_empty());
}

#[test]
fn test_better_price_wins_across_levels() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Buy, 99, 5));
    book.add_order(gtc(2, Side::Buy, 101, 5));

    let trades = book.add_order(gtc(3, Side::Sell, 99, 5));
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].bid.order_id, 2);
    assert_eq!(trades[0].bid.price, 101);
    assert_eq!(trades[0].ask.price, 99);
}

#[test]
fn test_market_order_consumes_all_levels() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Sell, 101, 4));
    book.add_order(gtc(2, Side::Sell, 103, 6));

    let trades = book.add_order(Order::market(3, Side::Buy, 8));
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].ask.order_id, 1);
    assert_eq!(trades[0].quantity(), 4);
    assert_eq!(trades[1].ask.order_id, 2);
    assert_eq!(trades[1].quantity(), 4);
    // The market order was promoted to a limit at the worst ask.
    assert_eq!(trades[0].bid.price, 103);

    // Seller 2 keeps 2 units; the promoted buy is fully filled and gone.
    assert_eq!(book.len(), 1);
    let depth = book.depth_snapshot();
    assert_eq!(depth.asks, vec![LevelInfo { price: 103, quantity: 2 }]);
    assert!(depth.bids.is_empty());
}

#[test]
fn test_market_order_rejected_on_empty_opposite() {
    let book = Orderbook::new();
    let trades = book.add_order(Order::market(1, Side::Buy, 10));
    assert!(trades.is_empty());
    assert!(book.is_empty());
}

#[test]
fn test_market_residue_rests_as_good_till_cancel() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Sell, 101, 4));

    // Market buy for more than the book offers: fills 4, rests 6 at 101.
    let trades = book.add_order(Order::market(2, Side::Buy, 10));
    assert_eq!(trades.len(), 1);
    assert_eq!(book.len(), 1);
    assert_eq!(book.best_bid(), Some(101));
    let depth = book.depth_snapshot();
    assert_eq!(depth.bids, vec![LevelInfo { price: 101, quantity: 6 }]);
}

#[test]
fn test_fill_and_kill_residue_is_cancelled() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Sell, 100, 3));

    let trades = book.add_order(Order::new(OrderType::FillAndKill, 2, Side::Buy, 100, 10));
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity(), 3);
    // The 7 remaining units must not rest.
    assert!(book.is_empty());
}

#[test]
fn test_fill_and_kill_rejected_when_not_crossing() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Sell, 100, 3));

    let trades = book.add_order(Order::new(OrderType::FillAndKill, 2, Side::Buy, 99, 10));
    assert!(trades.is_empty());
    assert_eq!(book.len(), 1);
}

#[test]
fn test_fill_or_kill_rejected_when_insufficient() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Sell, 100, 3));
    book.add_order(gtc(2, Side::Sell, 101, 3));

    let trades = book.add_order(Order::new(OrderType::FillOrKill, 3, Side::Buy, 101, 10));
    assert!(trades.is_empty());
    assert_eq!(book.len(), 2);
    // Nothing was consumed.
    assert_eq!(book.depth_snapshot().total_ask_quantity(), 6);
}

#[test]
fn test_fill_or_kill_accepted_when_fully_fillable() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Sell, 100, 3));
    book.add_order(gtc(2, Side::Sell, 101, 3));

    let trades = book.add_order(Order::new(OrderType::FillOrKill, 3, Side::Buy, 101, 6));
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].ask.order_id, 1);
    assert_eq!(trades[0].quantity(), 3);
    assert_eq!(trades[1].ask.order_id, 2);
    assert_eq!(trades[1].quantity(), 3);
    assert!(book.is_empty());
}

#[test]
fn test_fill_or_kill_respects_price_bound() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Sell, 100, 3));
    book.add_order(gtc(2, Side::Sell, 102, 10));

    // Enough total liquidity, but the 102 level is outside the limit.
    let trades = book.add_order(Order::new(OrderType::FillOrKill, 3, Side::Buy, 101, 5));
    assert!(trades.is_empty());
    assert_eq!(book.len(), 2);
}

#[test]
fn test_modify_preserves_type_but_loses_time_priority() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Buy, 100, 5));
    book.add_order(gtc(2, Side::Buy, 100, 5));

    // Same parameters: the order re-queues behind order 2.
    let trades = book.modify_order(OrderModify::new(1, Side::Buy, 100, 5));
    assert!(trades.is_empty());
    assert_eq!(book.len(), 2);

    let trades = book.add_order(gtc(3, Side::Sell, 100, 5));
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].bid.order_id, 2);
}

#[test]
fn test_modify_unknown_id_is_noop() {
    let book = Orderbook::new();
    let trades = book.modify_order(OrderModify::new(404, Side::Buy, 100, 5));
    assert!(trades.is_empty());
    assert!(book.is_empty());
}

#[test]
fn test_cancel_unknown_id_is_noop() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Buy, 100, 5));
    book.cancel_order(404);
    assert_eq!(book.len(), 1);
}

#[test]
fn test_duplicate_id_rejected() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Buy, 100, 5));
    let trades = book.add_order(gtc(1, Side::Sell, 100, 5));
    assert!(trades.is_empty());
    assert_eq!(book.len(), 1);
    assert_eq!(book.best_ask(), None);
}

#[test]
fn test_market_queries() {
    let book = Orderbook::new();
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.spread(), None);
    assert_eq!(book.mid_price(), None);
    assert_eq!(book.last_trade_price(), None);

    book.add_order(gtc(1, Side::Buy, 100, 5));
    book.add_order(gtc(2, Side::Sell, 104, 5));
    assert_eq!(book.best_bid(), Some(100));
    assert_eq!(book.best_ask(), Some(104));
    assert_eq!(book.spread(), Some(4));
    assert_eq!(book.mid_price(), Some(102.0));

    book.add_order(gtc(3, Side::Buy, 104, 2));
    assert_eq!(book.last_trade_price(), Some(104));
}

#[test]
fn test_depth_snapshot_ordering() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Buy, 98, 1));
    book.add_order(gtc(2, Side::Buy, 100, 2));
    book.add_order(gtc(3, Side::Buy, 99, 3));
    book.add_order(gtc(4, Side::Sell, 103, 4));
    book.add_order(gtc(5, Side::Sell, 101, 5));

    let depth = book.depth_snapshot();
    let bid_prices: Vec<Price> = depth.bids.iter().map(|l| l.price).collect();
    let ask_prices: Vec<Price> = depth.asks.iter().map(|l| l.price).collect();
    assert_eq!(bid_prices, vec![100, 99, 98]);
    assert_eq!(ask_prices, vec![101, 103]);
}

#[test]
fn test_negative_prices_are_supported() {
    let book = Orderbook::new();
    book.add_order(gtc(1, Side::Buy, -5, 10));
    book.add_order(gtc(2, Side::Buy, -2, 10));
    let trades = book.add_order(gtc(3, Side::Sell, -4, 10));
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].bid.order_id, 2);
    assert_eq!(trades[0].bid.price, -2);
}
