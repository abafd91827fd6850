mod common;

use std::collections::HashSet;

use splitbill::{
    core::{calculator, HISTORY_CAPACITY},
    domain::{Fees, SnapshotId, UNNAMED_BILL_LABEL},
    storage::{keys, KeyValueStore},
};

use common::memory_session;

#[test]
fn worked_example_splits_and_saves() {
    let (mut session, store) = memory_session();
    session.set_bill_amount(100.0);
    session.set_people_count(3).expect("people");
    session.set_service_charge(true);
    session.set_tax(true);

    let split = session.split();
    assert!((split.total_with_fees - 119.9).abs() < 1e-9);
    assert_eq!(split.amount_per_person, 40.0);

    let saved = session
        .save_to_history()
        .expect("save")
        .expect("non-zero bill is saved");
    assert_eq!(saved.label, UNNAMED_BILL_LABEL);
    assert_eq!(saved.people_count, 3);
    assert!(saved.service_charge_applied && saved.tax_applied);

    let raw = store.get(keys::BILL_HISTORY).expect("get").expect("persisted");
    assert!(raw.contains(saved.id.as_str()));
}

#[test]
fn history_keeps_the_five_most_recent() {
    let (mut session, _store) = memory_session();
    for amount in 1..=6 {
        session.set_label(&format!("Bill {amount}"));
        session.set_bill_amount(f64::from(amount) * 10.0);
        session.save_to_history().expect("save");
    }

    let labels: Vec<&str> = session
        .history()
        .entries()
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(session.history().len(), HISTORY_CAPACITY);
    assert_eq!(labels, ["Bill 6", "Bill 5", "Bill 4", "Bill 3", "Bill 2"]);
}

#[test]
fn restore_reproduces_the_saved_split() {
    let (mut session, _store) = memory_session();
    session.set_bill_amount(87.35);
    session.set_people_count(4).expect("people");
    session.set_tax(true);
    let saved = session.save_to_history().expect("save").expect("saved");

    session.reset();
    session.set_people_count(2).expect("people");
    assert!(session.restore(&saved.id).expect("restore"));

    let state = session.state();
    assert_eq!(state.fees, Fees::new(true, true));
    assert_eq!(state.people_count, 4);
    let split = session.split();
    assert!((split.total_with_fees - saved.total_with_fees).abs() < 0.02);
    assert_eq!(split.amount_per_person, saved.amount_per_person);
    assert!((calculator::inverse(&saved) - 87.35).abs() < 0.01);
}

#[test]
fn toggle_all_twice_round_trips_from_empty_and_full() {
    let (mut session, _store) = memory_session();
    for amount in [5.0, 15.0] {
        session.set_bill_amount(amount);
        session.save_to_history().expect("save");
    }

    session.toggle_select_all();
    session.toggle_select_all();
    assert!(session.selection().is_empty());

    session.toggle_select_all();
    let full: HashSet<SnapshotId> = session.selection().ids().clone();
    session.toggle_select_all();
    session.toggle_select_all();
    assert_eq!(session.selection().ids(), &full);
}
