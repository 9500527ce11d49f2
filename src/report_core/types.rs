//! Result-row types shared by the runner and the emitter.

use serde::{Deserialize, Serialize};

/// One aggregated row: all counters for a single card type.
///
/// `total` is the sum of the six category counts; `daily_used` is
/// informational and excluded from the sum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStatusCounts {
    pub card_type: i64,
    pub activated: i64,
    pub total_used: i64,
    pub deactivated: i64,
    pub expired: i64,
    pub new_cards: i64,
    pub booked_in: i64,
    pub total: i64,
    pub daily_used: i64,
}

impl CardStatusCounts {
    /// Output column order for both the CSV header and the text snapshot.
    pub const COLUMNS: [&'static str; 9] = [
        "CARD_TYPE",
        "ACTIVATED",
        "TOTAL_USED",
        "DEACTIVATED",
        "EXPIRED",
        "NEW",
        "BOOKEDIN",
        "TOTAL",
        "DAILY_USED",
    ];

    /// Values in [`Self::COLUMNS`] order.
    pub fn values(&self) -> [i64; 9] {
        [
            self.card_type,
            self.activated,
            self.total_used,
            self.deactivated,
            self.expired,
            self.new_cards,
            self.booked_in,
            self.total,
            self.daily_used,
        ]
    }

    pub fn category_sum(&self) -> i64 {
        self.activated + self.total_used + self.deactivated + self.expired + self.new_cards
            + self.booked_in
    }

    pub fn total_is_consistent(&self) -> bool {
        self.total == self.category_sum()
    }
}

/// Aggregation result for one source table, rows in query order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub rows: Vec<CardStatusCounts>,
}
