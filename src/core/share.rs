use crate::domain::{Fees, Split};
use crate::errors::Result;

pub const DEFAULT_SHARE_TITLE: &str = "Bill Splitter";
const DEFAULT_SHARE_LABEL: &str = "Dinner";
const PAYEE_PLACEHOLDER: &str = "[ENTER_NUMBER]";

/// How a share request ended. None of these are errors from the session's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Cancelled,
    Unsupported,
}

/// Platform share sheet, clipboard, or anything else that accepts a text summary.
pub trait ShareTarget {
    fn share(&mut self, title: &str, text: &str) -> Result<ShareOutcome>;
}

/// Inputs needed to render a share summary.
#[derive(Debug, Clone, Copy)]
pub struct ShareSummary<'a> {
    pub label: &'a str,
    pub fees: Fees,
    pub people_count: u32,
    pub split: Split,
    pub payee: &'a str,
}

impl ShareSummary<'_> {
    pub fn render(&self) -> String {
        let label = non_empty_or(self.label, DEFAULT_SHARE_LABEL);
        let payee = non_empty_or(self.payee, PAYEE_PLACEHOLDER);
        format!(
            "Bill Breakdown: {label}\n\
             Total Bill: ${:.2} ({})\n\
             Split: {} pax\n\
             Each person owes: ${:.2}\n\
             PayNow to: {payee}",
            self.split.total_with_fees,
            self.fees.short_codes(),
            self.people_count,
            self.split.amount_per_person,
        )
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}
