//! Order-queue dashboard core for the Bean & Brew café backend
//!
//! This crate is the read side of the café dashboard: it polls the backend
//! for order/staff snapshots, partitions the queue by lifecycle status,
//! derives the operational metrics the dashboard renders, and keeps that
//! view current through a polling refresh loop with partial-failure and
//! session-expiry handling. It never assigns orders or mutates persisted
//! state; everything here is a derived view over whatever snapshot the
//! backend returns.
//!
//! The pieces compose one way: [`fetch`] produces a [`fetch::Snapshot`],
//! [`classify`] partitions it, [`stats`] derives metrics from the
//! partition, and [`refresh`] drives repeated passes and owns the latest
//! committed [`refresh::DashboardView`]. [`analytics`] replays canned test
//! cases through the same aggregator without a timer.

pub mod analytics;
pub mod classify;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod refresh;
pub mod stats;
pub mod types;

pub use analytics::AnalyticsReplay;
pub use classify::QueuePartition;
pub use config::{Config, create_default_config, load_config};
pub use fetch::{ApiClient, FetchError, Snapshot, SnapshotSource};
pub use model::{
    AnalyticsOrder, Barista, CreateOrderRequest, DRINK_MENU, Order, OrderStatus, SessionUser,
    TestCase, drink_by_label,
};
pub use refresh::{DashboardHandle, DashboardView, RefreshLoop, RefreshPhase};
pub use stats::{
    ANALYTICS_COMPLAINT_THRESHOLD_MINUTES, BaristaPerformance, DerivedStats,
    LIVE_EMERGENCY_THRESHOLD_MINUTES,
};
pub use types::{BaristaId, OrderId};
