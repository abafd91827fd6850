use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Displayable, Fees, Identifiable, Split};

/// Label stored when a bill is saved without a name.
pub const UNNAMED_BILL_LABEL: &str = "Unnamed Bill";

/// Opaque identifier of a history entry.
///
/// New entries receive a UUID v4; identifiers loaded from storage are kept verbatim,
/// so entries written by older clients (millisecond timestamps) stay addressable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SnapshotId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SnapshotId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One saved calculation. Stores the fee-inclusive total, not the raw bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSnapshot {
    pub id: SnapshotId,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "billName", default)]
    pub label: String,
    #[serde(alias = "totalBill")]
    pub total_with_fees: f64,
    #[serde(alias = "peopleCount")]
    pub people_count: u32,
    #[serde(alias = "amountPerPerson")]
    pub amount_per_person: f64,
    #[serde(alias = "serviceCharge")]
    pub service_charge_applied: bool,
    #[serde(alias = "gst")]
    pub tax_applied: bool,
}

impl BillSnapshot {
    pub fn new(
        label: &str,
        fees: Fees,
        people_count: u32,
        split: Split,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SnapshotId::new(),
            created_at,
            label: normalize_label(label),
            total_with_fees: split.total_with_fees,
            people_count,
            amount_per_person: split.amount_per_person,
            service_charge_applied: fees.service_charge,
            tax_applied: fees.tax,
        }
    }

    pub fn fees(&self) -> Fees {
        Fees::new(self.service_charge_applied, self.tax_applied)
    }
}

impl Identifiable for BillSnapshot {
    fn id(&self) -> &SnapshotId {
        &self.id
    }
}

impl Displayable for BillSnapshot {
    fn display_label(&self) -> String {
        let label = if self.label.trim().is_empty() {
            UNNAMED_BILL_LABEL
        } else {
            self.label.as_str()
        };
        format!(
            "{} · ${:.2} per person · {} pax · {}",
            label,
            self.amount_per_person,
            self.people_count,
            self.created_at.format("%Y-%m-%d %H:%M")
        )
    }
}

fn normalize_label(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        UNNAMED_BILL_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 19, 30, 0).unwrap()
    }

    #[test]
    fn empty_label_falls_back_to_sentinel() {
        let snapshot = BillSnapshot::new("   ", Fees::NONE, 2, Split::default(), created());
        assert_eq!(snapshot.label, UNNAMED_BILL_LABEL);
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(SnapshotId::new(), SnapshotId::new());
    }

    #[test]
    fn decodes_entries_written_with_legacy_field_names() {
        let raw = r#"{
            "id": "1718000000000",
            "date": "2024-06-10T06:13:20.000Z",
            "billName": "Lunch",
            "totalBill": 119.9,
            "peopleCount": 3,
            "amountPerPerson": 40.0,
            "serviceCharge": true,
            "gst": true
        }"#;
        let snapshot: BillSnapshot = serde_json::from_str(raw).expect("legacy entry");
        assert_eq!(snapshot.id.as_str(), "1718000000000");
        assert_eq!(snapshot.label, "Lunch");
        assert_eq!(snapshot.people_count, 3);
        assert_eq!(snapshot.fees(), Fees::new(true, true));
    }

    #[test]
    fn display_label_mentions_share_and_headcount() {
        let split = Split {
            total_with_fees: 119.9,
            amount_per_person: 40.0,
        };
        let snapshot = BillSnapshot::new("Dinner", Fees::new(true, true), 3, split, created());
        let label = snapshot.display_label();
        assert!(label.starts_with("Dinner"));
        assert!(label.contains("$40.00 per person"));
        assert!(label.contains("3 pax"));
    }
}
