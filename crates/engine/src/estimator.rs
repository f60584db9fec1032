//! Goal completion estimator.
//!
//! Derives an average daily savings rate from a goal's deposit history and
//! projects the date the target will be reached. The function is pure: the
//! only external input is `now`, which callers pass explicitly.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// A single point of a goal's history, as seen by the estimator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deposit {
    pub amount: f64,
    pub date: DateTime<Utc>,
}

/// Projection computed from a goal's history.
///
/// Every field is `None` when the history is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub average_daily_savings: Option<f64>,
    pub estimated_days_to_completion: Option<f64>,
    pub estimated_completion_date: Option<DateTime<Utc>>,
}

/// Estimate how long a goal needs to reach `target_amount`.
///
/// `history` can be passed in any order.
pub fn estimate(
    target_amount: f64,
    current_amount: f64,
    history: &[Deposit],
    now: DateTime<Utc>,
) -> Estimate {
    let Some(rate) = average_daily_savings(history) else {
        return Estimate::default();
    };

    let remaining_amount = target_amount - current_amount;

    if remaining_amount <= 0.0 {
        return Estimate {
            average_daily_savings: Some(rate),
            estimated_days_to_completion: Some(0.0),
            estimated_completion_date: Some(now),
        };
    }

    if rate <= 0.0 {
        return Estimate {
            average_daily_savings: Some(rate),
            estimated_days_to_completion: None,
            estimated_completion_date: None,
        };
    }

    let days = remaining_amount / rate;
    Estimate {
        average_daily_savings: Some(rate),
        estimated_days_to_completion: Some(days),
        estimated_completion_date: project(now, days),
    }
}

/// Average amount saved per day over the whole history.
///
/// When the first and the last deposit share a calendar date the whole sum
/// counts as a single day. Otherwise the sum is spread over the truncated
/// number of whole days between them, never less than one.
pub fn average_daily_savings(history: &[Deposit]) -> Option<f64> {
    let mut sorted = history.to_vec();
    sorted.sort_by_key(|deposit| deposit.date);

    let first = sorted.first()?;
    let last = sorted.last()?;
    let total: f64 = sorted.iter().map(|deposit| deposit.amount).sum();

    if first.date.date_naive() == last.date.date_naive() {
        return Some(total);
    }

    // Spans under 24h that cross midnight truncate to zero.
    let days_span = (last.date - first.date).num_days().max(1);
    Some(total / days_span as f64)
}

/// `now` shifted forward by a fractional number of days.
///
/// Returns `None` when the result falls outside the representable range.
fn project(now: DateTime<Utc>, days: f64) -> Option<DateTime<Utc>> {
    let micros = (days * MICROS_PER_DAY).round();
    if !micros.is_finite() || micros >= i64::MAX as f64 {
        return None;
    }
    now.checked_add_signed(TimeDelta::microseconds(micros as i64))
}
