pub mod bill;
pub mod common;
pub mod snapshot;

pub use bill::{Fees, Split};
pub use common::{Displayable, Identifiable};
pub use snapshot::{BillSnapshot, SnapshotId, UNNAMED_BILL_LABEL};
