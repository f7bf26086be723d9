//! Queue classifier
//!
//! Partitions a snapshot's order list into the three lifecycle groups the
//! dashboard renders. Pure: no I/O, no failure mode, empty in → empty out.

use crate::model::{Order, OrderStatus};

/// Orders partitioned by lifecycle status
///
/// Relative order within each group matches the input sequence. An order
/// with an unrecognized status lands in no group; it is only tallied so the
/// refresh loop can log that the backend sent something unexpected.
#[derive(Debug, Clone, Default)]
pub struct QueuePartition {
    pub waiting: Vec<Order>,
    pub in_progress: Vec<Order>,
    pub completed: Vec<Order>,
    /// Orders excluded because their status was not recognized
    pub unrecognized: usize,
}

impl QueuePartition {
    /// Partition an order list by exact status match
    #[must_use]
    pub fn from_orders(orders: Vec<Order>) -> Self {
        let mut partition = Self::default();
        for order in orders {
            match order.status {
                OrderStatus::Waiting => partition.waiting.push(order),
                OrderStatus::InProgress => partition.in_progress.push(order),
                OrderStatus::Completed => partition.completed.push(order),
                OrderStatus::Unrecognized => partition.unrecognized += 1,
            }
        }
        partition
    }

    /// Number of classified orders across all three groups
    #[must_use]
    #[inline]
    pub fn total(&self) -> usize {
        self.waiting.len() + self.in_progress.len() + self.completed.len()
    }

    /// Check whether no order was classified
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate every classified order, waiting first, completed last
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.waiting
            .iter()
            .chain(self.in_progress.iter())
            .chain(self.completed.iter())
    }
}
