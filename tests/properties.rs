//! Property tests for the store and the query engine.

use chrono::NaiveDate;
use keepsake::entities::{Note, Trip};
use keepsake::query::{duration_days, filter, search, sort};
use keepsake::{
    Comparator, Encoding, MemoryAdapter, Predicate, QueryContext, RecordStore, SortOrder,
    StoreConfig, TextField,
};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq)]
struct Row {
    key: u8,
    label: String,
    position: usize,
}

fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((0u8..4, "[a-zA-Z ]{0,12}"), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(position, (key, label))| Row {
                key,
                label,
                position,
            })
            .collect()
    })
}

fn arb_note() -> impl Strategy<Value = Note> {
    ("[a-zA-Z0-9 ]{0,16}", "\\PC{0,40}", any::<bool>()).prop_map(|(title, body, is_pinned)| {
        let mut note = Note::new(title, body);
        note.is_pinned = is_pinned;
        note
    })
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2040, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    })
}

fn encodings() -> impl Strategy<Value = Encoding> {
    prop_oneof![Just(Encoding::Json), Just(Encoding::MessagePack)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sort_is_stable(rows in arb_rows(), descending in any::<bool>()) {
        let order = if descending { SortOrder::Descending } else { SortOrder::Ascending };
        let sorted = sort(rows.clone(), &Comparator::by_key(|r: &Row| r.key, order));

        prop_assert_eq!(sorted.len(), rows.len());
        for pair in sorted.windows(2) {
            if pair[0].key == pair[1].key {
                prop_assert!(pair[0].position < pair[1].position);
            } else if descending {
                prop_assert!(pair[0].key > pair[1].key);
            } else {
                prop_assert!(pair[0].key < pair[1].key);
            }
        }
    }

    #[test]
    fn text_sort_ignores_case(rows in arb_rows()) {
        let by_label = Comparator::by_text(|r: &Row| r.label.as_str(), SortOrder::Ascending);
        let sorted = sort(rows, &by_label);
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].label.to_lowercase() <= pair[1].label.to_lowercase());
        }
    }

    #[test]
    fn empty_filter_is_identity(rows in arb_rows()) {
        let ctx = QueryContext::local_now();
        prop_assert_eq!(filter(rows.clone(), &[], &ctx), rows);
    }

    #[test]
    fn blank_search_is_identity(rows in arb_rows(), blank in "[ \t]{0,4}") {
        let fields = vec![TextField::new("label", |r: &Row| r.label.as_str())];
        prop_assert_eq!(search(rows.clone(), &blank, &fields), rows);
    }

    #[test]
    fn search_keeps_order_and_only_matches(rows in arb_rows(), needle in "[a-z]{1,2}") {
        let fields = vec![TextField::new("label", |r: &Row| r.label.as_str())];
        let found = search(rows.clone(), &needle, &fields);

        prop_assert!(found.iter().all(|r| r.label.to_lowercase().contains(&needle)));
        let expected = rows.iter().filter(|r| r.label.to_lowercase().contains(&needle)).count();
        prop_assert_eq!(found.len(), expected);
        prop_assert!(found.windows(2).all(|p| p[0].position < p[1].position));
    }

    #[test]
    fn filter_is_and_of_predicates(rows in arb_rows(), a in 0u8..4, b in 0u8..4) {
        let ctx = QueryContext::local_now();
        let not_a = Predicate::matching(move |r: &Row| r.key != a);
        let not_b = Predicate::matching(move |r: &Row| r.key != b);
        let kept = filter(rows.clone(), &[not_a, not_b], &ctx);

        let expected: Vec<_> = rows.into_iter().filter(|r| r.key != a && r.key != b).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn adds_get_unique_ids(notes in prop::collection::vec(arb_note(), 0..20)) {
        let store: RecordStore<Note> = RecordStore::in_memory();
        for note in &notes {
            store.add(note.clone()).unwrap();
        }

        let all = store.all();
        prop_assert_eq!(all.len(), notes.len());
        let ids: HashSet<_> = all.iter().map(|r| r.id).collect();
        prop_assert_eq!(ids.len(), notes.len());
        let fields: Vec<_> = all.into_iter().map(|r| r.fields).collect();
        prop_assert_eq!(fields, notes);
    }

    #[test]
    fn reopen_restores_collection(
        notes in prop::collection::vec(arb_note(), 0..12),
        encoding in encodings(),
    ) {
        let adapter = MemoryAdapter::new();
        let config = StoreConfig { key: None, encoding };
        let store: RecordStore<Note> = RecordStore::open(adapter.clone(), config.clone());
        for note in notes {
            store.add(note).unwrap();
        }
        // An empty store has never written anything.
        store.sync().unwrap();

        let reopened: RecordStore<Note> = RecordStore::open(adapter, config);
        prop_assert_eq!(reopened.all(), store.all());
    }

    #[test]
    fn durations_are_at_least_one_day(start in arb_date(), end in arb_date()) {
        let days = duration_days(start, end);
        prop_assert!(days >= 1);
        if end > start {
            prop_assert_eq!(days, (end - start).num_days());
        }
        let trip = Trip::new("t", "d", start, end);
        prop_assert_eq!(trip.duration_days(), days);
    }
}
