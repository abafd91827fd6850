mod common;

use std::fs;

use splitbill::{
    core::utils::tmp_path,
    storage::{keys, JsonStore, KeyValueStore},
};

use common::{json_session, temp_base};

#[test]
fn headcount_payee_and_history_survive_restart() {
    let base = temp_base();
    {
        let mut session = json_session(&base);
        session.set_people_count(7).expect("people");
        session.set_payee("9876 5432").expect("payee");
        session.set_label("Hotpot");
        session.set_bill_amount(210.0);
        session.save_to_history().expect("save");
    }

    let reopened = json_session(&base);
    assert_eq!(reopened.state().people_count, 7);
    assert_eq!(reopened.state().payee, "9876 5432");
    assert_eq!(reopened.state().raw_bill_amount, 0.0);
    assert_eq!(reopened.history().len(), 1);
    assert_eq!(reopened.history().entries()[0].label, "Hotpot");
}

#[test]
fn corrupt_state_file_starts_with_defaults() {
    let base = temp_base();
    let store = JsonStore::new(Some(base.clone())).expect("store");
    fs::write(store.state_file(), "[[[ definitely not json").expect("corrupt");

    let mut session = json_session(&base);
    assert_eq!(session.state().people_count, 4);
    assert!(session.history().is_empty());

    session.set_bill_amount(30.0);
    session.save_to_history().expect("save replaces corrupt file");
    assert_eq!(json_session(&base).history().len(), 1);
}

#[test]
fn undecodable_history_is_ignored_but_other_keys_load() {
    let base = temp_base();
    let store = JsonStore::new(Some(base.clone())).expect("store");
    store.set(keys::PEOPLE_COUNT, "3").expect("people");
    store.set(keys::BILL_HISTORY, "{\"oops\":true}").expect("history");

    let session = json_session(&base);
    assert_eq!(session.state().people_count, 3);
    assert!(session.history().is_empty());
}

#[test]
fn legacy_history_entries_load() {
    let base = temp_base();
    let store = JsonStore::new(Some(base.clone())).expect("store");
    let legacy = r#"[{"id":"1714567890123","date":"2024-05-01T12:31:30Z","billName":"Brunch","totalBill":65.4,"peopleCount":3,"amountPerPerson":21.85,"serviceCharge":true,"gst":false}]"#;
    store.set(keys::BILL_HISTORY, legacy).expect("history");

    let session = json_session(&base);
    let entry = &session.history().entries()[0];
    assert_eq!(entry.id.as_str(), "1714567890123");
    assert_eq!(entry.label, "Brunch");
    assert_eq!(entry.people_count, 3);
    assert!(entry.service_charge_applied);
    assert!(!entry.tax_applied);
}

#[test]
fn failed_write_keeps_previous_state() {
    let base = temp_base();
    let mut session = json_session(&base);
    session.set_bill_amount(50.0);
    session.save_to_history().expect("first save");

    let state_file = JsonStore::new(Some(base.clone()))
        .expect("store")
        .state_file()
        .to_path_buf();
    let original = fs::read_to_string(&state_file).expect("read state");

    // A directory at the staging path makes the write fail before the rename.
    fs::create_dir_all(tmp_path(&state_file)).expect("block tmp path");
    session.set_bill_amount(60.0);
    assert!(session.save_to_history().is_err());

    let current = fs::read_to_string(&state_file).expect("read after failure");
    assert_eq!(current, original);
    assert_eq!(session.history().len(), 1);

    // Once the store recovers, the rejected bill must not reappear on disk.
    fs::remove_dir(tmp_path(&state_file)).expect("unblock tmp path");
    session.set_bill_amount(70.0);
    session.save_to_history().expect("save after recovery");
    let reopened = json_session(&base);
    let totals: Vec<f64> = reopened
        .history()
        .entries()
        .iter()
        .map(|entry| entry.total_with_fees)
        .collect();
    assert_eq!(totals.len(), 2);
    assert!((totals[0] - 77.0).abs() < 1e-9);
    assert!((totals[1] - 55.0).abs() < 1e-9);
}
