//! Calculator state plus the history and preferences that outlive it.

use std::sync::Arc;

use crate::{
    core::{
        calculator,
        confirm::ConfirmationPrompt,
        history::{HistoryStore, Selection},
        share::{ShareOutcome, ShareSummary, ShareTarget},
        time::Clock,
    },
    domain::{BillSnapshot, Fees, SnapshotId, Split},
    errors::{Result, SplitError},
    storage::{keys, read_value, write_value, KeyValueStore},
};

pub const MIN_PEOPLE_COUNT: u32 = 1;
pub const MAX_PEOPLE_COUNT: u32 = 20;
pub const DEFAULT_PEOPLE_COUNT: u32 = 4;

/// Inputs currently entered in the calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    pub raw_bill_amount: f64,
    pub people_count: u32,
    pub fees: Fees,
    pub label: String,
    pub payee: String,
}

impl CalculatorState {
    fn new(people_count: u32, payee: String) -> Self {
        Self {
            raw_bill_amount: 0.0,
            people_count,
            fees: Fees::default(),
            label: String::new(),
            payee,
        }
    }

    /// Derived totals, recomputed on every call.
    pub fn split(&self) -> Split {
        calculator::forward(self.raw_bill_amount, self.fees, self.people_count)
    }
}

/// Result of [`BillSession::share`]. `outcome` is `None` when the target errored; the
/// error has already been logged.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareReport {
    pub saved: Option<BillSnapshot>,
    pub outcome: Option<ShareOutcome>,
}

impl ShareReport {
    pub fn failed(&self) -> bool {
        self.outcome.is_none()
    }
}

/// One user's calculator session.
///
/// Headcount and payee are written through to the store on every change; the history
/// persists itself. Bill amount, label and fee flags live only in memory.
pub struct BillSession {
    state: CalculatorState,
    history: HistoryStore,
    selection: Selection,
    store: Arc<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
}

impl BillSession {
    pub fn open(store: Arc<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        Self::open_with_default_people(store, clock, DEFAULT_PEOPLE_COUNT)
    }

    /// Opens a session, falling back to `default_people` when no headcount was stored.
    pub fn open_with_default_people(
        store: Arc<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        default_people: u32,
    ) -> Self {
        let people_count = match read_value::<u32, _>(store.as_ref(), keys::PEOPLE_COUNT) {
            Ok(Some(count)) => clamp_people(i64::from(count)),
            Ok(None) => clamp_people(i64::from(default_people)),
            Err(err) => {
                tracing::warn!(error = %err, "stored headcount unreadable, using default");
                clamp_people(i64::from(default_people))
            }
        };
        let payee = match read_value::<String, _>(store.as_ref(), keys::PAYEE) {
            Ok(value) => value.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "stored payee unreadable, leaving blank");
                String::new()
            }
        };
        let history = HistoryStore::load(store.clone());
        tracing::debug!(people_count, history = history.len(), "session opened");

        Self {
            state: CalculatorState::new(people_count, payee),
            history,
            selection: Selection::new(),
            store,
            clock,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn split(&self) -> Split {
        self.state.split()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Negative, NaN and infinite amounts are coerced to zero.
    pub fn set_bill_amount(&mut self, amount: f64) {
        self.state.raw_bill_amount = if amount.is_finite() && amount > 0.0 {
            amount
        } else {
            0.0
        };
    }

    /// Parses free-form input; anything that is not a number becomes zero.
    pub fn set_bill_amount_input(&mut self, input: &str) {
        let amount = input.trim().parse::<f64>().unwrap_or(0.0);
        self.set_bill_amount(amount);
    }

    /// Clamps into `[MIN_PEOPLE_COUNT, MAX_PEOPLE_COUNT]` and persists the result.
    pub fn set_people_count(&mut self, count: i64) -> Result<u32> {
        let clamped = clamp_people(count);
        self.state.people_count = clamped;
        write_value(self.store.as_ref(), keys::PEOPLE_COUNT, &clamped)?;
        Ok(clamped)
    }

    pub fn set_service_charge(&mut self, enabled: bool) {
        self.state.fees.service_charge = enabled;
    }

    pub fn set_tax(&mut self, enabled: bool) {
        self.state.fees.tax = enabled;
    }

    pub fn set_label(&mut self, label: &str) {
        self.state.label = label.to_string();
    }

    pub fn set_payee(&mut self, payee: &str) -> Result<()> {
        self.state.payee = payee.trim().to_string();
        write_value(self.store.as_ref(), keys::PAYEE, &self.state.payee)
    }

    /// Clears the bill and restores default fees. Headcount and payee are kept.
    pub fn reset(&mut self) {
        self.state.raw_bill_amount = 0.0;
        self.state.label.clear();
        self.state.fees = Fees::default();
    }

    /// Appends the current calculation to history. A zero bill is not saved.
    pub fn save_to_history(&mut self) -> Result<Option<BillSnapshot>> {
        if self.state.raw_bill_amount == 0.0 {
            tracing::debug!("skipping save of an empty bill");
            return Ok(None);
        }
        let snapshot = BillSnapshot::new(
            &self.state.label,
            self.state.fees,
            self.state.people_count,
            self.split(),
            self.clock.now(),
        );
        self.history.append(snapshot.clone())?;
        Ok(Some(snapshot))
    }

    /// Loads a saved bill back into the calculator. Returns `false` when `id` is unknown.
    ///
    /// The raw amount is reconstructed with [`calculator::inverse`], so it can differ from
    /// what was originally typed by a cent.
    pub fn restore(&mut self, id: &SnapshotId) -> Result<bool> {
        let snapshot = match self.history.restore(id) {
            Ok(snapshot) => snapshot.clone(),
            Err(SplitError::NotFound(missing)) => {
                tracing::debug!(id = %missing, "restore skipped, entry not found");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };
        self.state.label = snapshot.label.clone();
        self.state.raw_bill_amount = calculator::inverse(&snapshot);
        self.state.fees = snapshot.fees();
        self.set_people_count(i64::from(snapshot.people_count))?;
        Ok(true)
    }

    /// Saves the current bill, then hands a text summary to `target`.
    ///
    /// Neither a failed save nor a failed share undoes the other.
    pub fn share(&mut self, target: &mut dyn ShareTarget, title: &str) -> ShareReport {
        let saved = match self.save_to_history() {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(error = %err, "could not persist bill before sharing");
                None
            }
        };
        let text = ShareSummary {
            label: &self.state.label,
            fees: self.state.fees,
            people_count: self.state.people_count,
            split: self.split(),
            payee: &self.state.payee,
        }
        .render();

        let outcome = match target.share(title, &text) {
            Ok(outcome) => {
                tracing::info!(?outcome, "share finished");
                Some(outcome)
            }
            Err(err) => {
                tracing::error!(error = %err, "error sharing bill");
                None
            }
        };
        ShareReport { saved, outcome }
    }

    pub fn toggle_selection(&mut self, id: &SnapshotId) -> bool {
        self.selection.toggle(id)
    }

    pub fn toggle_select_all(&mut self) {
        self.selection.toggle_all(self.history.ids());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn delete_history_entry(&mut self, id: &SnapshotId) -> Result<bool> {
        let removed = self.history.delete(id)?;
        self.selection.retain_existing(&self.history);
        Ok(removed)
    }

    /// Deletes every selected entry after `prompt` confirms.
    pub fn delete_selected(&mut self, prompt: &dyn ConfirmationPrompt) -> Result<usize> {
        self.history.delete_selection(&mut self.selection, prompt)
    }
}

fn clamp_people(count: i64) -> u32 {
    count.clamp(i64::from(MIN_PEOPLE_COUNT), i64::from(MAX_PEOPLE_COUNT)) as u32
}
