//! Property-based tests using proptest
//!
//! These verify the algebraic invariants of the classifier and the
//! aggregator over arbitrary order sets.


use brewboard::classify::QueuePartition;
use brewboard::model::{AnalyticsOrder, Order, OrderStatus};
use brewboard::stats::DerivedStats;
use chrono::Duration;
use order_helpers::{analytics_order, base_order, ts};
use proptest::prelude::*;

fn any_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Waiting),
        Just(OrderStatus::InProgress),
        Just(OrderStatus::Completed),
        Just(OrderStatus::Unrecognized),
    ]
}

fn recognized_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Waiting),
        Just(OrderStatus::InProgress),
        Just(OrderStatus::Completed),
    ]
}

fn analytics_orders() -> impl Strategy<Value = Vec<AnalyticsOrder>> {
    prop::collection::vec(
        ("(Ava|Noah|Maya|)", "(Latte|Mocha|Espresso|Cold Brew)", 0.0f64..30.0)
            .prop_map(|(barista, drink, wait)| analytics_order(&barista, &drink, wait)),
        0..40,
    )
}

/// Orders with arbitrary recognized statuses and partially-present
/// timestamps, the shape a live snapshot can actually take
fn live_orders() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec(
        (
            recognized_status(),
            prop::option::of(0i64..120),
            prop::option::of(0i64..120),
            prop::option::of(1i64..4),
        ),
        0..30,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (status, arrival, completed, barista))| {
                let mut order = base_order(index as i64, status);
                order.arrival_time = arrival.map(|m| ts(7, 0) + Duration::minutes(m));
                order.completed_at = completed.map(|m| ts(7, 0) + Duration::minutes(m));
                order.assigned_barista_id = barista.map(brewboard::types::BaristaId::new);
                order
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_partition_accounts_for_every_order(statuses in prop::collection::vec(any_status(), 0..50)) {
        let orders: Vec<Order> = statuses
            .iter()
            .enumerate()
            .map(|(index, &status)| base_order(index as i64, status))
            .collect();
        let input_len = orders.len();
        let partition = QueuePartition::from_orders(orders);

        // Groups plus quarantine always cover the input exactly
        prop_assert!(partition.total() <= input_len);
        prop_assert_eq!(partition.total() + partition.unrecognized, input_len);
    }

    #[test]
    fn prop_partition_exhaustive_over_recognized(statuses in prop::collection::vec(recognized_status(), 0..50)) {
        let orders: Vec<Order> = statuses
            .iter()
            .enumerate()
            .map(|(index, &status)| base_order(index as i64, status))
            .collect();
        let input_len = orders.len();
        let partition = QueuePartition::from_orders(orders);
        prop_assert_eq!(partition.total(), input_len);
        prop_assert_eq!(partition.unrecognized, 0);
    }

    #[test]
    fn prop_groups_are_homogeneous(statuses in prop::collection::vec(any_status(), 0..50)) {
        let orders: Vec<Order> = statuses
            .iter()
            .enumerate()
            .map(|(index, &status)| base_order(index as i64, status))
            .collect();
        let partition = QueuePartition::from_orders(orders);
        prop_assert!(partition.waiting.iter().all(|o| o.status == OrderStatus::Waiting));
        prop_assert!(partition.in_progress.iter().all(|o| o.status == OrderStatus::InProgress));
        prop_assert!(partition.completed.iter().all(|o| o.status == OrderStatus::Completed));
    }

    #[test]
    fn prop_drink_percentages_sum_to_hundred(orders in analytics_orders()) {
        prop_assume!(!orders.is_empty());
        let stats = DerivedStats::analytics(&orders);
        let total: f64 = stats
            .drink_counts
            .keys()
            .map(|label| stats.drink_share_percent(label))
            .sum();
        prop_assert!((total - 100.0).abs() < 1e-6, "percentages summed to {}", total);
    }

    #[test]
    fn prop_barista_counts_cover_attributed_orders(orders in analytics_orders()) {
        let stats = DerivedStats::analytics(&orders);
        let attributed = orders.iter().filter(|o| !o.barista.is_empty()).count();
        let grouped: usize = stats.barista_stats.iter().map(|row| row.orders).sum();
        prop_assert_eq!(grouped, attributed);
    }

    #[test]
    fn prop_analytics_average_within_bounds(orders in analytics_orders()) {
        let stats = DerivedStats::analytics(&orders);
        prop_assert!(stats.avg_wait_minutes >= 0.0);
        if let Some(max) = orders.iter().map(|o| o.wait_minutes).fold(None, |acc: Option<f64>, w| {
            Some(acc.map_or(w, |m| m.max(w)))
        }) {
            prop_assert!(stats.avg_wait_minutes <= max + 1e-9);
        } else {
            prop_assert_eq!(stats.avg_wait_minutes, 0.0);
        }
    }

    #[test]
    fn prop_live_aggregation_idempotent(orders in live_orders()) {
        let partition = QueuePartition::from_orders(orders);
        let now = ts(9, 30);
        prop_assert_eq!(
            DerivedStats::live(&partition, now),
            DerivedStats::live(&partition, now)
        );
    }

    #[test]
    fn prop_live_aggregation_never_panics(orders in live_orders()) {
        let partition = QueuePartition::from_orders(orders);
        let _ = DerivedStats::live(&partition, ts(6, 0));
        let _ = DerivedStats::live(&partition, ts(23, 59));
    }
}
