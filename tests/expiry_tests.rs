//! Good-for-day expiry behavior of the background worker.

use chrono::{Duration as ChronoDuration, Local, Timelike};
use matchbook::prelude::*;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

fn gtc(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Order {
    Order::new(OrderType::GoodTillCancel, id, side, price, quantity)
}

fn gfd(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Order {
    Order::new(OrderType::GoodForDay, id, side, price, quantity)
}

/// A cutoff a moment from now, snapped to whole seconds so the worker's
/// wait stays short and deterministic enough for a test.
fn imminent_cutoff(seconds_ahead: i64) -> chrono::NaiveTime {
    (Local::now() + ChronoDuration::seconds(seconds_ahead))
        .time()
        .with_nanosecond(0)
        .expect("zero nanoseconds is valid")
}

#[test]
fn test_good_for_day_orders_expire_at_cutoff() {
    let config = BookConfig::with_cutoff(imminent_cutoff(2));
    let book = Orderbook::with_config(config);

    book.add_order(gfd(1, Side::Buy, 100, 10));
    book.add_order(gtc(2, Side::Buy, 99, 10));
    book.add_order(gfd(3, Side::Sell, 105, 10));

    assert_eq!(book.len(), 3);

    // Wait past the cutoff (plus slack) for the worker to run its scan.
    let deadline = Instant::now() + Duration::from_secs(6);
    while book.len() != 1 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(50));
    }

    assert_eq!(book.len(), 1);
    assert_eq!(book.best_bid(), Some(99));
    assert_eq!(book.best_ask(), None);
}

#[test]
fn test_expiry_emits_contiguous_cancellations() {
    let log: Arc<Mutex<Vec<OrderId>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let listener: EventListener = Arc::new(move |event: &BookEvent| {
        if let BookEvent::OrderCancelled(order) = event {
            sink.lock().unwrap().push(order.id());
        }
    });

    let config = BookConfig::with_cutoff(imminent_cutoff(2));
    let book = Orderbook::with_config_and_listener(config, listener);

    book.add_order(gfd(1, Side::Buy, 100, 10));
    book.add_order(gfd(2, Side::Sell, 105, 10));

    let deadline = Instant::now() + Duration::from_secs(6);
    while !book.is_empty() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(50));
    }

    assert!(book.is_empty());
    let mut cancelled = log.lock().unwrap().clone();
    cancelled.sort_unstable();
    assert_eq!(cancelled, vec![1, 2]);
}

#[test]
fn test_drop_joins_worker_promptly() {
    let book = Orderbook::new();
    book.add_order(gfd(1, Side::Buy, 100, 10));

    // The default cutoff is hours away; drop must not wait for it.
    let started = Instant::now();
    drop(book);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_cancelled_day_orders_do_not_resurrect() {
    let config = BookConfig::with_cutoff(imminent_cutoff(2));
    let book = Orderbook::with_config(config);

    book.add_order(gfd(1, Side::Buy, 100, 10));
    book.cancel_order(1);
    assert!(book.is_empty());

    thread::sleep(Duration::from_secs(3));
    assert!(book.is_empty());
}
