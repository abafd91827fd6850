//! Calculation, history and session logic. No terminal I/O lives here.

pub mod calculator;
pub mod confirm;
pub mod history;
pub mod session;
pub mod share;
pub mod time;
pub mod utils;

pub use confirm::ConfirmationPrompt;
pub use history::{HistoryStore, Selection, HISTORY_CAPACITY};
pub use session::{BillSession, CalculatorState, ShareReport};
pub use share::{ShareOutcome, ShareSummary, ShareTarget, DEFAULT_SHARE_TITLE};
pub use time::{Clock, FixedClock, SystemClock};
