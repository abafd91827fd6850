//! Fee application and per-person rounding.
//!
//! Everything here is pure: the session recomputes a [`Split`] from its current
//! inputs on every read instead of caching derived totals.

use crate::domain::{BillSnapshot, Fees, Split};

/// Multiplier applied when the service charge is enabled.
pub const SERVICE_CHARGE_MULTIPLIER: f64 = 1.10;
/// Multiplier applied when tax is enabled, on top of any service charge.
pub const TAX_MULTIPLIER: f64 = 1.09;
/// Shares are rounded up to multiples of `1 / ROUNDING_STEPS_PER_UNIT` (0.05).
pub const ROUNDING_STEPS_PER_UNIT: f64 = 20.0;

/// Applies the enabled fees to `raw_bill`.
///
/// Tax compounds on the service-charged amount; the order is significant.
pub fn total_with_fees(raw_bill: f64, fees: Fees) -> f64 {
    let mut total = raw_bill;
    if fees.service_charge {
        total *= SERVICE_CHARGE_MULTIPLIER;
    }
    if fees.tax {
        total *= TAX_MULTIPLIER;
    }
    total
}

/// Rounds `total / people_count` up to the next 0.05 so the collected amount always
/// covers the bill. A headcount of zero yields zero.
pub fn amount_per_person(total: f64, people_count: u32) -> f64 {
    if people_count == 0 {
        return 0.0;
    }
    let share = total / f64::from(people_count);
    (share * ROUNDING_STEPS_PER_UNIT).ceil() / ROUNDING_STEPS_PER_UNIT
}

/// Computes the fee-inclusive total and the rounded per-person share.
pub fn forward(raw_bill: f64, fees: Fees, people_count: u32) -> Split {
    let total = total_with_fees(raw_bill, fees);
    Split {
        total_with_fees: total,
        amount_per_person: amount_per_person(total, people_count),
    }
}

/// Reconstructs an editable raw bill from a saved snapshot.
///
/// This is a lossy conversion: dividing back out of the multipliers and rounding to
/// cents does not reproduce the original input bit for bit. Callers re-derive totals
/// forward from the returned value, so the drift stays within a cent of the bill.
pub fn inverse(snapshot: &BillSnapshot) -> f64 {
    let mut raw = snapshot.total_with_fees;
    if snapshot.tax_applied {
        raw /= TAX_MULTIPLIER;
    }
    if snapshot.service_charge_applied {
        raw /= SERVICE_CHARGE_MULTIPLIER;
    }
    round_to_cents(raw)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
