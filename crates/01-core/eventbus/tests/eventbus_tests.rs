//! 事件总线测试

use boot_eventbus::{EventBus, EventBusError, HandlerError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Ping(u32);

#[derive(Debug)]
struct Pong;

#[derive(Debug, thiserror::Error)]
#[error("rejected ping {0}")]
struct Rejected(u32);

#[test]
fn test_publish_before_activation_is_queued_in_order() {
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    bus.subscribe(move |ping: &Ping| sink.lock().push(ping.0));

    for i in 1..=3 {
        bus.publish(Ping(i)).unwrap();
    }
    assert!(seen.lock().is_empty());
    assert_eq!(bus.queued_events(), 3);
    assert!(!bus.is_active());

    bus.activate().unwrap();
    assert_eq!(*seen.lock(), vec![1, 2, 3]);
    assert_eq!(bus.queued_events(), 0);
    assert!(bus.is_active());

    bus.publish(Ping(4)).unwrap();
    assert_eq!(*seen.lock(), vec![1, 2, 3, 4]);
}

#[test]
fn test_activate_twice_fails() {
    let bus = EventBus::new();
    bus.activate().unwrap();
    assert!(matches!(bus.activate(), Err(EventBusError::AlreadyActive)));
}

#[test]
fn test_publish_without_subscribers() {
    let bus = EventBus::activated();
    assert!(bus.publish(Pong).is_ok());
    assert!(!bus.has_handler::<Pong>());
}

#[test]
fn test_unsubscribe_middle_handler_keeps_order() {
    let bus = EventBus::activated();
    let order = Arc::new(Mutex::new(Vec::new()));

    let first = {
        let order = order.clone();
        move |_: &Ping| order.lock().push("first")
    };
    let second = {
        let order = order.clone();
        move |_: &Ping| order.lock().push("second")
    };
    let third = {
        let order = order.clone();
        move |_: &Ping| order.lock().push("third")
    };

    bus.subscribe(first);
    bus.subscribe(second.clone());
    bus.subscribe(third);
    assert_eq!(bus.subscriber_count::<Ping>(), 3);

    bus.unsubscribe(&second).unwrap();
    bus.publish(Ping(1)).unwrap();

    assert_eq!(*order.lock(), vec!["first", "third"]);
    assert!(matches!(
        bus.unsubscribe(&second),
        Err(EventBusError::HandlerNotFound { .. })
    ));
}

fn count_pong(_: &Pong) {}

#[test]
fn test_unsubscribe_errors() {
    let bus = EventBus::activated();
    assert!(matches!(
        bus.unsubscribe(&count_pong),
        Err(EventBusError::NoSubscribers { .. })
    ));

    bus.subscribe(count_pong);
    assert!(bus.has_handler_for(&Pong));
    bus.unsubscribe(&count_pong).unwrap();
    assert!(!bus.has_handler::<Pong>());
    assert!(matches!(
        bus.unsubscribe(&count_pong),
        Err(EventBusError::NoSubscribers { .. })
    ));
}

static FIRST_PINGS: AtomicUsize = AtomicUsize::new(0);
static SECOND_PINGS: AtomicUsize = AtomicUsize::new(0);

fn first_ping(_: &Ping) {
    FIRST_PINGS.fetch_add(1, Ordering::SeqCst);
}

fn second_ping(_: &Ping) {
    SECOND_PINGS.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn test_unsubscribe_distinguishes_fn_pointers() {
    let bus = EventBus::activated();
    let first = first_ping as fn(&Ping);
    let second = second_ping as fn(&Ping);

    bus.subscribe(first);
    bus.subscribe(second);
    bus.unsubscribe(&second).unwrap();
    bus.publish(Ping(1)).unwrap();

    assert_eq!(FIRST_PINGS.load(Ordering::SeqCst), 1);
    assert_eq!(SECOND_PINGS.load(Ordering::SeqCst), 0);
    assert!(matches!(
        bus.unsubscribe(&second),
        Err(EventBusError::HandlerNotFound { .. })
    ));
}

#[test]
fn test_errors_and_panics_are_aggregated() {
    let bus = EventBus::activated();
    let reached = Arc::new(AtomicUsize::new(0));

    bus.subscribe(|ping: &Ping| -> Result<(), Rejected> { Err(Rejected(ping.0)) });
    bus.subscribe(|ping: &Ping| {
        assert!(ping.0 != 9, "handler exploded");
    });
    let counter = reached.clone();
    bus.subscribe(move |_: &Ping| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let err = bus.publish(Ping(9)).unwrap_err();
    assert_eq!(reached.load(Ordering::SeqCst), 1);

    let EventBusError::Publish(aggregate) = err else {
        panic!("expected publish error");
    };
    assert_eq!(aggregate.events.len(), 1);
    let failed = &aggregate.events[0];
    assert_eq!(failed.event::<Ping>(), Some(&Ping(9)));
    assert_eq!(failed.failures.len(), 2);
    assert!(matches!(
        &failed.failures[0].error,
        HandlerError::Returned { source } if source.to_string() == "rejected ping 9"
    ));
    assert!(matches!(
        &failed.failures[1].error,
        HandlerError::Panicked { message } if message == "handler exploded"
    ));
}

#[test]
fn test_replay_failures_are_merged() {
    let bus = EventBus::new();
    bus.subscribe(|ping: &Ping| -> Result<(), Rejected> {
        if ping.0 % 2 == 0 {
            Err(Rejected(ping.0))
        } else {
            Ok(())
        }
    });

    for i in 1..=4 {
        bus.publish(Ping(i)).unwrap();
    }

    let Err(EventBusError::Publish(aggregate)) = bus.activate() else {
        panic!("expected publish error");
    };
    let failed: Vec<u32> = aggregate
        .events
        .iter()
        .filter_map(|event| event.event::<Ping>().map(|ping| ping.0))
        .collect();
    assert_eq!(failed, vec![2, 4]);
    assert_eq!(aggregate.failure_count(), 2);
    assert!(bus.is_active());
}

#[test]
fn test_handler_can_mutate_bus_during_dispatch() {
    let bus = EventBus::activated();
    let pongs = Arc::new(AtomicUsize::new(0));

    let inner_bus = bus.clone();
    let counter = pongs.clone();
    bus.subscribe(move |_: &Ping| {
        let counter = counter.clone();
        inner_bus.subscribe(move |_: &Pong| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        inner_bus.publish(Pong).unwrap();
    });

    bus.publish(Ping(1)).unwrap();
    assert_eq!(pongs.load(Ordering::SeqCst), 1);
    assert_eq!(bus.subscriber_count::<Pong>(), 1);
}

#[test]
fn test_publish_during_replay_is_delivered_after_queue() {
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let inner_bus = bus.clone();
    let sink = seen.clone();
    bus.subscribe(move |ping: &Ping| {
        sink.lock().push(ping.0);
        if ping.0 == 1 {
            inner_bus.publish(Ping(100)).unwrap();
        }
    });

    bus.publish(Ping(1)).unwrap();
    bus.publish(Ping(2)).unwrap();
    bus.activate().unwrap();

    assert_eq!(*seen.lock(), vec![1, 2, 100]);
}

#[test]
fn test_concurrent_publish_reaches_every_subscriber() {
    const PUBLISHERS: usize = 8;
    const EVENTS_PER_PUBLISHER: usize = 50;
    const SUBSCRIBERS: usize = 5;

    let bus = EventBus::activated();
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..SUBSCRIBERS {
        let counter = counter.clone();
        bus.subscribe(move |_: &Ping| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    std::thread::scope(|scope| {
        for publisher in 0..PUBLISHERS {
            let bus = bus.clone();
            scope.spawn(move || {
                for i in 0..EVENTS_PER_PUBLISHER {
                    bus.publish(Ping((publisher * EVENTS_PER_PUBLISHER + i) as u32))
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(
        counter.load(Ordering::SeqCst),
        PUBLISHERS * EVENTS_PER_PUBLISHER * SUBSCRIBERS
    );
}

#[tokio::test]
async fn test_publish_from_tasks() -> anyhow::Result<()> {
    let bus = EventBus::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let sink = counter.clone();
    bus.subscribe(move |ping: &Ping| {
        sink.fetch_add(ping.0 as usize, Ordering::SeqCst);
    });

    let mut handles = Vec::new();
    for i in 1..=10 {
        let bus = bus.clone();
        handles.push(tokio::spawn(async move { bus.publish(Ping(i)) }));
    }
    for handle in handles {
        handle.await??;
    }

    bus.activate()?;
    assert_eq!(counter.load(Ordering::SeqCst), 55);
    Ok(())
}
