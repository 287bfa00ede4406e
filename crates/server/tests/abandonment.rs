use std::sync::Arc;
use std::time::Duration;

use basket_common::{BasketLine, ManualClock};
use basket_server::ledger::ActivityLedger;
use basket_server::metrics::{names, MetricsRegistry};
use basket_server::monitor::{AbandonmentMonitor, MonitorHandle, MonitorTask};
use basket_server::service::BasketService;
use basket_server::store::InMemoryBasketStore;

const THRESHOLD: Duration = Duration::from_secs(30 * 60);

struct Harness {
    service: BasketService,
    registry: Arc<MetricsRegistry>,
    ledger: ActivityLedger,
    clock: ManualClock,
    monitor: MonitorHandle,
}

fn start() -> Harness {
    let registry = MetricsRegistry::new();
    let ledger = ActivityLedger::new();
    let clock = ManualClock::new(0);
    let service = BasketService::new(
        Arc::new(InMemoryBasketStore::new()),
        ledger.clone(),
        registry.clone(),
        Arc::new(clock.clone()),
    );
    let monitor = MonitorTask {
        period: Duration::from_secs(60),
        monitor: AbandonmentMonitor::new(
            ledger.clone(),
            registry.clone(),
            Arc::new(clock.clone()),
            THRESHOLD,
        ),
    }
    .spawn();
    Harness {
        service,
        registry,
        ledger,
        clock,
        monitor,
    }
}

#[tokio::test]
async fn idle_cart_is_abandoned_on_next_tick() {
    let h = start();
    h.service
        .update_basket("u1", vec![BasketLine::new(1, 1)])
        .await
        .unwrap();

    h.clock.advance(Duration::from_secs(31 * 60));
    assert_eq!(h.monitor.tick_now().await, Some(1));
    assert_eq!(h.registry.counter_total(names::ABANDONED_CARTS_TOTAL), 1);
    assert_eq!(h.ledger.last_update_at("u1"), None);

    // Terminal: a second sweep does not count the same cart again.
    assert_eq!(h.monitor.tick_now().await, Some(0));
    assert_eq!(h.registry.counter_total(names::ABANDONED_CARTS_TOTAL), 1);

    h.monitor.stop().await;
}

#[tokio::test]
async fn crossing_the_threshold_alone_does_not_flag() {
    let h = start();
    h.service.update_basket("u1", Vec::new()).await.unwrap();
    h.clock.advance(Duration::from_secs(45 * 60));

    // Nothing happens until the monitor actually runs.
    assert_eq!(h.registry.counter_total(names::ABANDONED_CARTS_TOTAL), 0);
    assert_eq!(h.ledger.tracked_users(), 1);

    assert_eq!(h.monitor.tick_now().await, Some(1));
    h.monitor.stop().await;
}

#[tokio::test]
async fn checked_out_cart_is_excluded() {
    let h = start();
    h.service
        .update_basket("u1", vec![BasketLine::new(2, 3)])
        .await
        .unwrap();
    h.service
        .update_basket("u2", vec![BasketLine::new(2, 1)])
        .await
        .unwrap();
    h.service.mark_checkout_completed("u2");

    h.clock.advance(Duration::from_secs(60 * 60));
    assert_eq!(h.monitor.tick_now().await, Some(1));
    assert!(h.ledger.last_update_at("u2").is_some());
    assert!(h.ledger.is_checked_out("u2"));

    h.monitor.stop().await;
}

#[tokio::test]
async fn recent_update_keeps_cart_active() {
    let h = start();
    h.service.update_basket("u1", Vec::new()).await.unwrap();
    h.clock.advance(Duration::from_secs(25 * 60));
    h.service
        .update_basket("u1", vec![BasketLine::new(1, 1)])
        .await
        .unwrap();
    h.clock.advance(Duration::from_secs(25 * 60));

    assert_eq!(h.monitor.tick_now().await, Some(0));
    assert_eq!(h.ledger.tracked_users(), 1);
    h.monitor.stop().await;
}

#[tokio::test]
async fn abandoned_user_is_tracked_again_after_returning() {
    let h = start();
    h.service.update_basket("u1", Vec::new()).await.unwrap();
    h.clock.advance(Duration::from_secs(31 * 60));
    assert_eq!(h.monitor.tick_now().await, Some(1));

    h.service.update_basket("u1", Vec::new()).await.unwrap();
    assert_eq!(h.ledger.last_update_at("u1"), Some(31 * 60_000));

    h.clock.advance(Duration::from_secs(31 * 60));
    assert_eq!(h.monitor.tick_now().await, Some(1));
    assert_eq!(h.registry.counter_total(names::ABANDONED_CARTS_TOTAL), 2);
    h.monitor.stop().await;
}

#[tokio::test]
async fn stopped_monitor_no_longer_sweeps() {
    let h = start();
    h.service.update_basket("u1", Vec::new()).await.unwrap();
    h.monitor.stop().await;

    h.clock.advance(Duration::from_secs(2 * 60 * 60));
    assert_eq!(h.ledger.tracked_users(), 1);
    assert_eq!(h.registry.counter_total(names::ABANDONED_CARTS_TOTAL), 0);
}
