// Check-in analytics over the current line

use crate::application::constants::{
    DAILY_WINDOW_DAYS, DAY_MS, MONTHLY_WINDOW_DAYS, WEEKLY_WINDOW_DAYS,
};
use crate::domain::Customer;
use serde::Serialize;

/// Customers by how recently they checked in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeriodCounts {
    pub total: usize,
    pub daily: usize,
    pub weekly: usize,
    pub monthly: usize,
}

/// Age in whole days, rounded up
fn age_days(checked_in_at: i64, now_millis: i64) -> i64 {
    let diff = (now_millis - checked_in_at).abs();
    (diff + DAY_MS - 1) / DAY_MS
}

pub fn period_counts(customers: &[Customer], now_millis: i64) -> PeriodCounts {
    customers
        .iter()
        .map(|c| age_days(c.checked_in_at, now_millis))
        .fold(
            PeriodCounts {
                total: customers.len(),
                ..Default::default()
            },
            |mut counts, days| {
                counts.daily += (days <= DAILY_WINDOW_DAYS) as usize;
                counts.weekly += (days <= WEEKLY_WINDOW_DAYS) as usize;
                counts.monthly += (days <= MONTHLY_WINDOW_DAYS) as usize;
                counts
            },
        )
}
