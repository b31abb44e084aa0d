use monthcal::{
    core::store::{AddOutcome, EventStore, StoreError},
    event::EventDraft,
    persist::{codec, memory::MemorySlot},
    types::MAX_EVENTS_PER_DAY,
    validate::{EventForm, ValidationError},
};
use regex::Regex;

fn draft(name: &str, time: &str, invitees: &[&str]) -> EventDraft {
    EventDraft::new(name, time, invitees.iter().copied())
}

fn stored(slot: &MemorySlot) -> monthcal::event::Calendar {
    codec::decode(&slot.blob().expect("slot written")).expect("decodes")
}

#[test]
fn fourth_standup_is_ignored() {
    let slot = MemorySlot::new();
    let mut store = EventStore::open(slot.clone());

    for _ in 0..3 {
        let outcome = store.add_event(15, draft("Standup", "9:00 AM", &["a@b.com"]));
        assert!(outcome.is_added());
    }
    assert_eq!(store.event_count(15), 3);
    assert!(store.is_day_full(15));

    let before = store.events().clone();
    let outcome = store.add_event(15, draft("Standup", "9:00 AM", &["a@b.com"]));
    assert_eq!(outcome, AddOutcome::DayFull);
    assert_eq!(store.events(), &before);
    assert_eq!(store.event_count(15), MAX_EVENTS_PER_DAY);
    assert_eq!(stored(&slot), before);
}

#[test]
fn edit_keeps_original_color() {
    let slot = MemorySlot::new();
    let mut store = EventStore::open(slot.clone());

    store.add_event(10, draft("Lunch", "12:30 PM", &["x@y.com"]));
    let color = store.day(10)[0].color.clone();

    store
        .edit_event(
            10,
            0,
            draft("Lunch Meeting", "1:00 PM", &["x@y.com", "z@y.com"]),
        )
        .expect("edit");

    let events = store.day(10);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "Lunch Meeting");
    assert_eq!(events[0].time, "1:00 PM");
    assert_eq!(events[0].invitees, vec!["x@y.com", "z@y.com"]);
    assert_eq!(events[0].color, color);
    assert_eq!(&stored(&slot), store.events());
}

#[test]
fn added_colors_are_six_hex_digits() {
    let re = Regex::new(r"^#[0-9A-F]{6}$").unwrap();
    let mut store = EventStore::open(MemorySlot::new());
    for day in 1..=31 {
        for i in 0..3 {
            store.add_event(day, draft(&format!("e{i}"), "1:00 AM", &["a@b.com"]));
        }
    }
    for (_, events) in store.days() {
        for event in events {
            assert!(re.is_match(event.color.as_str()), "{}", event.color);
        }
    }
}

#[test]
fn delete_middle_keeps_order() {
    let mut store = EventStore::open(MemorySlot::new());
    for name in ["e0", "e1", "e2"] {
        store.add_event(7, draft(name, "8:00 AM", &["a@b.com"]));
    }
    let e0 = store.day(7)[0].clone();
    let e2 = store.day(7)[2].clone();

    let removed = store.delete_event(7, 1).expect("delete");
    assert_eq!(removed.name, "e1");
    assert_eq!(store.day(7), &[e0, e2]);
}

#[test]
fn reopen_sees_every_mutation() {
    let slot = MemorySlot::new();
    let mut store = EventStore::open(slot.clone());
    store.add_event(1, draft("a", "1:00 AM", &["a@b.com"]));
    store.add_event(1, draft("b", "2:00 AM", &["a@b.com"]));
    store.add_event(30, draft("c", "3:00 PM", &["c@d.com"]));
    store
        .edit_event(1, 1, draft("b2", "2:30 AM", &["e@f.com"]))
        .expect("edit");
    store.delete_event(1, 0).expect("delete");

    let reopened = EventStore::open(slot);
    assert_eq!(reopened.events(), store.events());
    assert_eq!(reopened.day(1)[0].name, "b2");
}

#[test]
fn empty_and_corrupt_slots_open_empty() {
    assert!(EventStore::open(MemorySlot::new()).events().is_empty());
    assert!(EventStore::open(MemorySlot::with_blob("")).events().is_empty());
    assert!(
        EventStore::open(MemorySlot::with_blob(r#"{"1":"nope"}"#))
            .events()
            .is_empty()
    );
}

#[test]
fn persistence_failure_keeps_in_memory_change() {
    let slot = MemorySlot::new();
    let mut store = EventStore::open(slot.clone());
    store.add_event(4, draft("kept", "4:00 PM", &["a@b.com"]));
    assert!(store.is_persisted());

    slot.set_failing(true);
    let outcome = store.add_event(4, draft("unsaved", "5:00 PM", &["a@b.com"]));
    assert!(outcome.is_added());
    assert_eq!(store.event_count(4), 2);
    assert!(!store.is_persisted());
    assert_eq!(stored(&slot).get(&4).map(Vec::len), Some(1));

    slot.set_failing(false);
    store.persist_now().expect("retry");
    assert!(store.is_persisted());
    assert_eq!(&stored(&slot), store.events());
}

#[test]
fn ids_survive_deletion_of_earlier_events() {
    let mut store = EventStore::open(MemorySlot::new());
    let ids: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|name| match store.add_event(20, draft(name, "9:00 AM", &["a@b.com"])) {
            AddOutcome::Added { id, .. } => id,
            AddOutcome::DayFull => panic!("day should have room"),
        })
        .collect();

    store.delete_by_id(ids[0]).expect("delete a");
    assert_eq!(store.locate(ids[2]), Some((20, 1)));

    store
        .edit_by_id(ids[2], draft("c2", "10:00 AM", &["a@b.com"]))
        .expect("edit c");
    assert_eq!(store.get_by_id(ids[2]).map(|e| e.name.as_str()), Some("c2"));
    assert_eq!(store.get_by_id(ids[1]).map(|e| e.name.as_str()), Some("b"));
    assert_eq!(store.day_ids(20), &ids[1..]);
    assert_eq!(store.delete_by_id(ids[0]), Err(StoreError::UnknownId(ids[0])));
}

#[test]
fn loaded_events_get_ids() {
    let slot = MemorySlot::new();
    {
        let mut store = EventStore::open(slot.clone());
        store.add_event(2, draft("x", "1:00 PM", &["a@b.com"]));
        store.add_event(9, draft("y", "1:00 PM", &["a@b.com"]));
    }
    let store = EventStore::open(slot);
    let id = store.day_ids(9)[0];
    assert_eq!(store.get_by_id(id).map(|e| e.name.as_str()), Some("y"));
}

#[test]
fn form_entry_validates_before_touching_state() {
    let slot = MemorySlot::new();
    let mut store = EventStore::open(slot.clone());

    let err = store
        .add_form(3, &EventForm::new("Review", "9:00 AM", "a@b.com, not-an-email"))
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::Invalid(ValidationError::BadInvitee("not-an-email".to_string()))
    );
    assert!(store.events().is_empty());
    assert_eq!(slot.write_count(), 0);

    store
        .add_form(3, &EventForm::new(" Review ", "9:00 am", "a@b.com, c@d.com"))
        .expect("valid");
    assert_eq!(store.day(3)[0].name, "Review");
    assert_eq!(store.day(3)[0].time, "9:00 AM");
    assert_eq!(store.day(3)[0].invitees, vec!["a@b.com", "c@d.com"]);

    let err = store
        .edit_form(3, 0, &EventForm::new("", "9:00 AM", "a@b.com"))
        .unwrap_err();
    assert_eq!(err, StoreError::Invalid(ValidationError::EmptyName));
    assert_eq!(store.day(3)[0].name, "Review");
}

#[test]
fn add_form_rejects_days_outside_month() {
    let slot = MemorySlot::new();
    let mut store = EventStore::open(slot.clone());
    let form = EventForm::new("Review", "9:00 AM", "a@b.com");

    for day in [0, 32, 99] {
        let err = store.add_form(day, &form).unwrap_err();
        assert_eq!(err, StoreError::Invalid(ValidationError::BadDay(day)));
    }
    assert!(store.events().is_empty());
    assert_eq!(slot.write_count(), 0);

    assert!(store.add_form(31, &form).expect("last day").is_added());
    assert!(store.add_form(1, &form).expect("first day").is_added());
}

fn event_json(name: &str) -> String {
    format!(r##"{{"name":"{name}","time":"9:00 AM","invitees":["a@b.com"],"color":"#00FF00"}}"##)
}

#[test]
fn open_truncates_overfull_days() {
    let events: Vec<_> = ["a", "b", "c", "d", "e"].into_iter().map(event_json).collect();
    let blob = format!(r#"{{"12":[{}]}}"#, events.join(","));

    let store = EventStore::open(MemorySlot::with_blob(blob));
    assert_eq!(store.event_count(12), MAX_EVENTS_PER_DAY);
    let names: Vec<_> = store.day(12).iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert_eq!(store.day_ids(12).len(), MAX_EVENTS_PER_DAY);
}

#[test]
fn empty_overwriting_ignores_existing_blob_until_first_write() {
    let slot = MemorySlot::with_blob(format!(r#"{{"3":[{}]}}"#, event_json("old")));
    let mut store = EventStore::empty_overwriting(slot.clone());
    assert!(store.events().is_empty());
    assert_eq!(slot.write_count(), 0);
    assert!(slot.blob().expect("untouched").contains("old"));

    store.add_event(8, draft("new", "1:00 PM", &["a@b.com"]));
    let saved = stored(&slot);
    assert!(!saved.contains_key(&3));
    assert_eq!(saved[&8][0].name, "new");
}

#[test]
fn bad_addressing_leaves_state_untouched() {
    let slot = MemorySlot::new();
    let mut store = EventStore::open(slot.clone());
    store.add_event(5, draft("only", "6:00 PM", &["a@b.com"]));
    let before = store.events().clone();
    let writes = slot.write_count();

    assert_eq!(
        store.edit_event(6, 0, draft("x", "1:00 AM", &["a@b.com"])),
        Err(StoreError::DayNotFound(6))
    );
    assert_eq!(
        store.delete_event(5, 1),
        Err(StoreError::IndexOutOfRange {
            day: 5,
            index: 1,
            len: 1
        })
    );
    assert_eq!(
        store.edit_event(5, 3, draft("x", "1:00 AM", &["a@b.com"])),
        Err(StoreError::IndexOutOfRange {
            day: 5,
            index: 3,
            len: 1
        })
    );
    assert_eq!(store.events(), &before);
    assert_eq!(slot.write_count(), writes);
}

#[test]
fn full_day_add_does_not_write() {
    let slot = MemorySlot::new();
    let mut store = EventStore::open(slot.clone());
    for name in ["a", "b", "c"] {
        store.add_event(19, draft(name, "7:00 AM", &["a@b.com"]));
    }
    assert_eq!(slot.write_count(), 3);

    assert_eq!(
        store.add_event(19, draft("d", "7:00 AM", &["a@b.com"])),
        AddOutcome::DayFull
    );
    assert_eq!(slot.write_count(), 3);
}

#[test]
fn deleting_last_event_keeps_empty_day() {
    let slot = MemorySlot::new();
    let mut store = EventStore::open(slot.clone());
    store.add_event(22, draft("solo", "3:00 PM", &["a@b.com"]));

    store.delete_event(22, 0).expect("delete");
    assert_eq!(store.events().get(&22).map(Vec::len), Some(0));
    assert_eq!(store.event_count(22), 0);
    assert_eq!(store.days().count(), 0);
    assert_eq!(stored(&slot).get(&22).map(Vec::len), Some(0));
}
