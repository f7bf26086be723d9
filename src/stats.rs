//! Metrics aggregator
//!
//! Turns a classified snapshot (or an analytics test case) into the derived
//! statistics the dashboard renders. Everything here is a pure function of
//! its inputs and the injected "now" timestamp; `DerivedStats` is rebuilt
//! from scratch on every pass and never patched incrementally.

use crate::classify::QueuePartition;
use crate::model::{AnalyticsOrder, Order};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Live dashboard: a WAITING order counts as urgent once its in-flight wait
/// reaches this many minutes (inclusive).
pub const LIVE_EMERGENCY_THRESHOLD_MINUTES: f64 = 8.0;

/// Offline analytics: an order counts as a complaint once its completed wait
/// exceeds this many minutes (strict).
///
/// Independent of [`LIVE_EMERGENCY_THRESHOLD_MINUTES`]; the two views serve
/// different consumers with different tolerances.
pub const ANALYTICS_COMPLAINT_THRESHOLD_MINUTES: f64 = 10.0;

/// Performance row for a single barista
///
/// The `barista` key is whatever identity appears on the order records: a
/// staff id for live snapshots, a plain name for analytics data. Two
/// differently-spelled names are two rows; there is no fuzzy matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaristaPerformance {
    pub barista: String,
    /// Orders grouped under this barista
    pub orders: usize,
    pub total_wait_minutes: f64,
    /// Orders that contributed a resolvable wait to the total
    pub wait_samples: usize,
    pub complaints: usize,
    /// Per-drink breakdown scoped to this barista
    pub drinks: BTreeMap<String, usize>,
}

impl BaristaPerformance {
    /// Create an empty row for a barista key
    #[must_use]
    pub fn new(barista: impl Into<String>) -> Self {
        Self {
            barista: barista.into(),
            ..Default::default()
        }
    }

    /// Average wait over the orders that had a resolvable wait
    #[must_use]
    pub fn avg_wait_minutes(&self) -> f64 {
        if self.wait_samples > 0 {
            self.total_wait_minutes / self.wait_samples as f64
        } else {
            0.0
        }
    }

    fn record(&mut self, drink: &str, wait: Option<f64>) {
        self.orders += 1;
        *self.drinks.entry(drink.to_string()).or_insert(0) += 1;
        if let Some(wait) = wait {
            self.total_wait_minutes += wait;
            self.wait_samples += 1;
            if wait > ANALYTICS_COMPLAINT_THRESHOLD_MINUTES {
                self.complaints += 1;
            }
        }
    }
}

/// Derived operational metrics, recomputed fresh on every aggregation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedStats {
    pub avg_wait_minutes: f64,
    /// Orders past the wait threshold of the consuming view: urgent orders
    /// on the live dashboard, complaints in the analytics replay
    pub complaint_count: usize,
    /// Occurrences per drink label across the whole order set
    pub drink_counts: BTreeMap<String, usize>,
    pub barista_stats: Vec<BaristaPerformance>,
}

impl DerivedStats {
    /// Aggregate a live snapshot at the given instant
    ///
    /// The wait average prefers completed orders (completion − arrival);
    /// only when no completed wait is resolvable does it fall back to
    /// in-flight estimates over the waiting queue. The two regimes are
    /// never mixed into one average.
    #[must_use]
    pub fn live(partition: &QueuePartition, now: NaiveDateTime) -> Self {
        let completed_waits: Vec<f64> = partition
            .completed
            .iter()
            .filter_map(Order::wait_minutes)
            .collect();

        let avg_wait_minutes = if completed_waits.is_empty() {
            // In-flight estimate; an order without an arrival timestamp
            // contributes zero rather than being dropped.
            let active_waits: Vec<f64> = partition
                .waiting
                .iter()
                .map(|order| order.elapsed_minutes(now).unwrap_or(0.0))
                .collect();
            mean(&active_waits)
        } else {
            mean(&completed_waits)
        };

        let complaint_count = partition
            .waiting
            .iter()
            .filter(|order| {
                order
                    .elapsed_minutes(now)
                    .is_some_and(|elapsed| elapsed >= LIVE_EMERGENCY_THRESHOLD_MINUTES)
            })
            .count();

        let mut drink_counts = BTreeMap::new();
        for order in partition.iter() {
            *drink_counts.entry(order.drink_type.clone()).or_insert(0) += 1;
        }

        // A barista's row covers the orders they have finished handling.
        let mut rows: BTreeMap<String, BaristaPerformance> = BTreeMap::new();
        for order in &partition.completed {
            let Some(barista_id) = order.assigned_barista_id else {
                continue;
            };
            let key = barista_id.to_string();
            rows.entry(key.clone())
                .or_insert_with(|| BaristaPerformance::new(key))
                .record(&order.drink_type, order.wait_minutes());
        }

        Self {
            avg_wait_minutes,
            complaint_count,
            drink_counts,
            barista_stats: rows.into_values().collect(),
        }
    }

    /// Aggregate an analytics test case
    ///
    /// Wait minutes are precomputed by the backend simulation, so every
    /// order contributes to the average. Orders with an empty barista field
    /// stay out of the per-barista rows.
    #[must_use]
    pub fn analytics(orders: &[AnalyticsOrder]) -> Self {
        let waits: Vec<f64> = orders.iter().map(|order| order.wait_minutes).collect();
        let avg_wait_minutes = mean(&waits);

        let complaint_count = orders
            .iter()
            .filter(|order| order.wait_minutes > ANALYTICS_COMPLAINT_THRESHOLD_MINUTES)
            .count();

        let mut drink_counts = BTreeMap::new();
        let mut rows: BTreeMap<String, BaristaPerformance> = BTreeMap::new();
        for order in orders {
            *drink_counts.entry(order.drink_type.clone()).or_insert(0) += 1;
            if order.barista.is_empty() {
                continue;
            }
            rows.entry(order.barista.clone())
                .or_insert_with(|| BaristaPerformance::new(order.barista.clone()))
                .record(&order.drink_type, Some(order.wait_minutes));
        }

        Self {
            avg_wait_minutes,
            complaint_count,
            drink_counts,
            barista_stats: rows.into_values().collect(),
        }
    }

    /// Total order count behind the per-drink map
    #[must_use]
    #[inline]
    pub fn total_drinks(&self) -> usize {
        self.drink_counts.values().sum()
    }

    /// Share of one drink as a percentage of the current total
    ///
    /// Recomputed from the map on each call so it stays consistent with
    /// whatever set the stats were built from; 0.0 for an empty set or an
    /// unknown label.
    #[must_use]
    pub fn drink_share_percent(&self, label: &str) -> f64 {
        let total = self.total_drinks();
        if total == 0 {
            return 0.0;
        }
        let count = self.drink_counts.get(label).copied().unwrap_or(0);
        count as f64 / total as f64 * 100.0
    }
}

/// Arithmetic mean, 0.0 for an empty list
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analytics_order(barista: &str, drink: &str, wait: f64) -> AnalyticsOrder {
        AnalyticsOrder {
            id: String::new(),
            customer_name: String::new(),
            drink_type: drink.to_string(),
            barista: barista.to_string(),
            ordered_at: None,
            completed_at: None,
            wait_minutes: wait,
        }
    }

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_simple() {
        assert_eq!(mean(&[5.0, 15.0]), 10.0);
    }

    #[test]
    fn test_analytics_empty_orders() {
        let stats = DerivedStats::analytics(&[]);
        assert_eq!(stats.avg_wait_minutes, 0.0);
        assert_eq!(stats.complaint_count, 0);
        assert!(stats.drink_counts.is_empty());
        assert!(stats.barista_stats.is_empty());
    }

    #[test]
    fn test_analytics_complaint_threshold_is_strict() {
        let orders = vec![
            analytics_order("Ava", "Latte", 10.0),
            analytics_order("Ava", "Latte", 10.01),
        ];
        let stats = DerivedStats::analytics(&orders);
        assert_eq!(stats.complaint_count, 1);
    }

    #[test]
    fn test_analytics_barista_names_are_literal() {
        let orders = vec![
            analytics_order("Ava", "Latte", 2.0),
            analytics_order("ava", "Latte", 3.0),
        ];
        let stats = DerivedStats::analytics(&orders);
        assert_eq!(stats.barista_stats.len(), 2);
    }

    #[test]
    fn test_analytics_empty_barista_excluded_from_rows() {
        let orders = vec![
            analytics_order("", "Mocha", 2.0),
            analytics_order("Noah", "Mocha", 3.0),
        ];
        let stats = DerivedStats::analytics(&orders);
        assert_eq!(stats.barista_stats.len(), 1);
        assert_eq!(stats.barista_stats[0].barista, "Noah");
        // The drink still counts toward the overall map
        assert_eq!(stats.drink_counts["Mocha"], 2);
    }

    #[test]
    fn test_drink_share_percent() {
        let orders = vec![
            analytics_order("Ava", "Latte", 2.0),
            analytics_order("Ava", "Latte", 2.0),
            analytics_order("Ava", "Mocha", 2.0),
            analytics_order("Ava", "Espresso", 2.0),
        ];
        let stats = DerivedStats::analytics(&orders);
        assert_eq!(stats.drink_share_percent("Latte"), 50.0);
        assert_eq!(stats.drink_share_percent("Mocha"), 25.0);
        assert_eq!(stats.drink_share_percent("Flat White"), 0.0);
    }

    #[test]
    fn test_drink_share_percent_empty_set() {
        let stats = DerivedStats::default();
        assert_eq!(stats.drink_share_percent("Latte"), 0.0);
    }

    #[test]
    fn test_barista_avg_wait_no_samples() {
        let row = BaristaPerformance::new("Maya");
        assert_eq!(row.avg_wait_minutes(), 0.0);
    }

    #[test]
    fn test_barista_row_accumulates() {
        let mut row = BaristaPerformance::new("Ethan");
        row.record("Latte", Some(4.0));
        row.record("Latte", Some(12.0));
        row.record("Mocha", Some(2.0));
        assert_eq!(row.orders, 3);
        assert_eq!(row.wait_samples, 3);
        assert_eq!(row.complaints, 1);
        assert_eq!(row.avg_wait_minutes(), 6.0);
        assert_eq!(row.drinks["Latte"], 2);
        assert_eq!(row.drinks["Mocha"], 1);
    }
}
