//! Domain records consumed from the café backend
//!
//! Orders and baristas are owned by the backend; this side holds read-only
//! copies that are valid until the next refresh replaces them wholesale.
//! Timestamps arrive as zoneless ISO-8601 (`2026-08-06T07:15:00`), hence
//! `NaiveDateTime` throughout.

use crate::types::{BaristaId, OrderId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an order
///
/// The backend drives WAITING → IN_PROGRESS → COMPLETED monotonically and
/// this side treats it as authoritative. Unknown wire values land in
/// `Unrecognized` so one bad record cannot fail a whole snapshot; the
/// classifier quarantines them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Waiting,
    InProgress,
    Completed,
    #[serde(other)]
    Unrecognized,
}

impl OrderStatus {
    /// Check whether this is a status the dashboard knows how to place
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

/// A single customer transaction as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub drink_type: String,
    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub arrival_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub loyalty_customer: bool,
    #[serde(default)]
    pub rush_order: bool,
    /// Priority score produced by the backend scheduler
    #[serde(default)]
    pub priority_score: f64,
    pub status: OrderStatus,
    /// Times this order was skipped in favor of a later arrival
    #[serde(default)]
    pub skipped_by_later_count: u32,
    #[serde(default)]
    pub assigned_barista_id: Option<BaristaId>,
    #[serde(default)]
    pub started_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
}

impl Order {
    /// Completed wait in minutes: completion minus arrival
    ///
    /// `None` when either timestamp is missing; such orders are excluded
    /// from averages rather than treated as zero.
    #[must_use]
    pub fn wait_minutes(&self) -> Option<f64> {
        let start = self.arrival_time?;
        let end = self.completed_at?;
        Some(minutes_between(start, end))
    }

    /// In-flight wait estimate in minutes: `now` minus arrival
    #[must_use]
    pub fn elapsed_minutes(&self, now: NaiveDateTime) -> Option<f64> {
        self.arrival_time.map(|start| minutes_between(start, now))
    }
}

/// Minutes from `start` to `end`, fractional, negative if `end` precedes `start`
#[must_use]
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    end.signed_duration_since(start).num_milliseconds() as f64 / 60_000.0
}

/// A staff member as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barista {
    pub id: BaristaId,
    pub name: String,
    pub available: bool,
    /// Accumulated workload in minutes
    #[serde(default)]
    pub workload_minutes: u32,
    /// Order currently occupying this barista, if any
    #[serde(default)]
    pub current_order_id: Option<OrderId>,
}

impl Barista {
    /// Invariant check: unavailable exactly when occupied by an order
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.available == self.current_order_id.is_none()
    }
}

/// One entry of the fixed drink menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drink {
    pub label: &'static str,
    pub prep_minutes: u32,
    pub price_inr: u32,
}

/// The fixed drink menu offered by the order form
pub const DRINK_MENU: &[Drink] = &[
    Drink { label: "Cold Brew", prep_minutes: 1, price_inr: 120 },
    Drink { label: "Espresso", prep_minutes: 2, price_inr: 150 },
    Drink { label: "Americano", prep_minutes: 2, price_inr: 140 },
    Drink { label: "Cappuccino", prep_minutes: 4, price_inr: 180 },
    Drink { label: "Latte", prep_minutes: 4, price_inr: 200 },
    Drink { label: "Mocha", prep_minutes: 6, price_inr: 250 },
];

/// Look up a menu entry by its exact label
#[must_use]
pub fn drink_by_label(label: &str) -> Option<&'static Drink> {
    DRINK_MENU.iter().find(|drink| drink.label == label)
}

/// One synthetic order inside an analytics test case
///
/// Wait minutes are precomputed by the backend simulation; the barista field
/// is a plain name string baked into the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOrder {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub drink_type: String,
    #[serde(default)]
    pub barista: String,
    #[serde(default)]
    pub ordered_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub wait_minutes: f64,
}

/// A named bundle of synthetic orders for offline analytics
///
/// Immutable once loaded; selection is by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub orders: Vec<AnalyticsOrder>,
    #[serde(default)]
    pub average_waiting_minutes: f64,
    #[serde(default)]
    pub average_turnaround_minutes: f64,
}

/// Wire envelope of `GET /api/analytics/test-cases`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResponse {
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// Body of `POST /api/orders`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub drink_type: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub loyalty_customer: bool,
    pub rush_order: bool,
}

/// Current user identity from `GET /api/auth/me`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}
