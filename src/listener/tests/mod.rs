//! Unit tests for the listener ledger.

use crate::listener::{
    adapters::memory::InMemoryListenerRegistry,
    domain::{ListenerHandle, NotificationFilter, Subscription, SubscriptionId},
    ports::{ListenerRegistry, ListenerRegistryError},
};
use crate::naming::ObjectName;
use chrono::{DateTime, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::json;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<chrono::Local> {
        self.0.with_timezone(&chrono::Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[fixture]
fn clock() -> FixedClock {
    FixedClock(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
    )
}

#[fixture]
fn queue() -> ObjectName {
    "billing:type=Queue,name=orders".parse().expect("valid name")
}

#[rstest]
#[case("jmx.attribute.change", true)]
#[case("jmx.attribute", true)]
#[case("jmx.mbean.registered", false)]
#[case("custom.alert", true)]
fn filter_enables_by_prefix(#[case] notification_type: &str, #[case] expected: bool) {
    let filter = NotificationFilter::enabling(["jmx.attribute", "custom."]);

    assert_eq!(filter.is_enabled(notification_type), expected);
}

#[test]
fn new_filter_enables_nothing_until_types_are_added() {
    let mut filter = NotificationFilter::new();
    assert!(!filter.is_enabled("anything"));

    filter.enable_type("any");
    assert!(filter.is_enabled("anything"));

    filter.disable_type("any");
    assert!(!filter.is_enabled("anything"));

    filter.enable_type("a");
    filter.enable_type("b");
    filter.disable_all_types();
    assert!(filter.enabled_types().is_empty());
}

#[rstest]
fn subscriptions_record_clock_time_and_handback(clock: FixedClock, queue: ObjectName) {
    let ledger = InMemoryListenerRegistry::new();
    let subscription = Subscription::new(queue.clone(), ListenerHandle::new("client-1"), &clock)
        .with_handback(json!({"session": 7}));

    let id = ledger.add_listener(subscription);

    let recorded = ledger.subscriptions(&queue);
    assert_eq!(recorded.len(), 1);
    let first = recorded.first().expect("subscription recorded");
    assert_eq!(first.id(), id);
    assert_eq!(first.listener().as_str(), "client-1");
    assert_eq!(first.created_at(), clock.utc());
    assert_eq!(first.handback(), Some(&json!({"session": 7})));
}

#[rstest]
fn interested_applies_filters(clock: FixedClock, queue: ObjectName) {
    let ledger = InMemoryListenerRegistry::new();
    let unfiltered = ledger.add_listener(Subscription::new(
        queue.clone(),
        ListenerHandle::new("all"),
        &clock,
    ));
    let filtered = ledger.add_listener(
        Subscription::new(queue.clone(), ListenerHandle::new("changes"), &clock)
            .with_filter(NotificationFilter::enabling(["jmx.attribute.change"])),
    );

    let on_change: Vec<SubscriptionId> = ledger
        .interested(&queue, "jmx.attribute.change")
        .iter()
        .map(Subscription::id)
        .collect();
    let on_alert: Vec<SubscriptionId> = ledger
        .interested(&queue, "custom.alert")
        .iter()
        .map(Subscription::id)
        .collect();

    assert_eq!(on_change, vec![unfiltered, filtered]);
    assert_eq!(on_alert, vec![unfiltered]);
}

#[rstest]
fn remove_listener_takes_out_one_subscription(clock: FixedClock, queue: ObjectName) {
    let ledger = InMemoryListenerRegistry::new();
    let first = ledger.add_listener(Subscription::new(queue.clone(), "a".into(), &clock));
    let second = ledger.add_listener(Subscription::new(queue.clone(), "b".into(), &clock));

    let removed = ledger.remove_listener(&queue, first).expect("removes");

    assert_eq!(removed.id(), first);
    let remaining: Vec<SubscriptionId> =
        ledger.subscriptions(&queue).iter().map(Subscription::id).collect();
    assert_eq!(remaining, vec![second]);
}

#[rstest]
fn removing_an_unknown_subscription_fails(queue: ObjectName) {
    let ledger = InMemoryListenerRegistry::new();
    let id = SubscriptionId::new();

    assert_eq!(
        ledger.remove_listener(&queue, id).map(|subscription| subscription.id()),
        Err(ListenerRegistryError::NotFound {
            name: queue,
            id,
        })
    );
}

#[rstest]
fn subscriptions_are_scoped_to_their_name(clock: FixedClock, queue: ObjectName) {
    let ledger = InMemoryListenerRegistry::new();
    let other: ObjectName = "billing:type=Queue,name=refunds".parse().expect("valid name");
    let id = ledger.add_listener(Subscription::new(queue.clone(), "a".into(), &clock));

    assert!(ledger.subscriptions(&other).is_empty());
    assert!(matches!(
        ledger.remove_listener(&other, id),
        Err(ListenerRegistryError::NotFound { .. })
    ));
}

#[rstest]
fn remove_listeners_reports_count(clock: FixedClock, queue: ObjectName) {
    let ledger = InMemoryListenerRegistry::new();
    ledger.add_listener(Subscription::new(queue.clone(), "a".into(), &clock));
    ledger.add_listener(Subscription::new(queue.clone(), "b".into(), &clock));

    assert_eq!(ledger.remove_listeners(&queue), 2);
    assert_eq!(ledger.remove_listeners(&queue), 0);
    assert!(ledger.subscriptions(&queue).is_empty());
}
