use serde::{Deserialize, Serialize};

/// Optional surcharges applied on top of the raw bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fees {
    pub service_charge: bool,
    pub tax: bool,
}

impl Fees {
    pub const NONE: Fees = Fees {
        service_charge: false,
        tax: false,
    };

    pub const fn new(service_charge: bool, tax: bool) -> Self {
        Self {
            service_charge,
            tax,
        }
    }

    /// Short codes used in shared summaries, e.g. `+SVC+GST`.
    pub fn short_codes(&self) -> String {
        let mut codes = String::new();
        if self.service_charge {
            codes.push_str("+SVC");
        }
        if self.tax {
            codes.push_str("+GST");
        }
        codes
    }
}

/// Defaults match a fresh calculator: service charge on, tax off.
impl Default for Fees {
    fn default() -> Self {
        Self::new(true, false)
    }
}

/// Outcome of a split calculation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Split {
    pub total_with_fees: f64,
    pub amount_per_person: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_codes_follow_flag_order() {
        assert_eq!(Fees::new(true, true).short_codes(), "+SVC+GST");
        assert_eq!(Fees::new(false, true).short_codes(), "+GST");
        assert_eq!(Fees::NONE.short_codes(), "");
    }

    #[test]
    fn default_fees_enable_service_charge_only() {
        let fees = Fees::default();
        assert!(fees.service_charge);
        assert!(!fees.tax);
    }
}
