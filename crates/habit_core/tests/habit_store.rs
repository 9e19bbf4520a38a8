use chrono::{Days, NaiveDate};
use habit_core::{
    Clock, FixedClock, HabitDraft, HabitId, HabitPatch, HabitStore, HabitStoreError,
    HabitValidationError, MemorySnapshotStore, StoreOptions, StreakPolicy, Streaks,
    DEFAULT_SNAPSHOT_SLOT,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn ago(n: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(n)).unwrap()
}

fn open(memory: &MemorySnapshotStore) -> HabitStore<&MemorySnapshotStore, FixedClock> {
    HabitStore::open(memory, FixedClock::on(today()))
}

#[test]
fn create_sets_defaults_and_persists() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);

    let id = store.create(HabitDraft::new("  Read 20 pages ")).unwrap();

    let habit = store.get(&id).unwrap();
    assert_eq!(habit.name, "Read 20 pages");
    assert!(habit.completed_dates().is_empty());
    assert_eq!(habit.streaks(), Streaks::default());
    assert_eq!(habit.created_at(), store.clock().now());
    assert_eq!(memory.save_count(), 1);
    assert!(memory.payload(DEFAULT_SNAPSHOT_SLOT).unwrap().contains(id.as_str()));
}

#[test]
fn create_rejects_blank_name_without_side_effects() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);

    let err = store.create(HabitDraft::new("  ")).unwrap_err();

    assert_eq!(err, HabitStoreError::Validation(HabitValidationError::EmptyName));
    assert!(store.is_empty());
    assert_eq!(memory.save_count(), 0);
    assert!(memory.payload(DEFAULT_SNAPSHOT_SLOT).is_none());
}

#[test]
fn create_assigns_unique_ids_in_insertion_order() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);

    let first = store.create(HabitDraft::new("Walk")).unwrap();
    let second = store.create(HabitDraft::new("Walk")).unwrap();

    assert_ne!(first, second);
    let ids: Vec<&HabitId> = store.habits().iter().map(|habit| habit.id()).collect();
    assert_eq!(ids, vec![&first, &second]);
}

#[test]
fn toggle_today_twice_returns_to_zero() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    let id = store.create(HabitDraft::new("Meditate")).unwrap();

    let first = store.toggle_completion(&id, today()).unwrap();
    assert!(first.completed);
    assert_eq!(first.streaks, Streaks { current: 1, longest: 1 });

    let second = store.toggle_completion(&id, today()).unwrap();
    assert!(!second.completed);

    let habit = store.get(&id).unwrap();
    assert!(!habit.is_completed_on(today()));
    assert_eq!(habit.current_streak(), 0);
    assert_eq!(habit.longest_streak(), 0);
    assert_eq!(memory.save_count(), 3);
}

#[test]
fn toggling_three_days_ending_today_builds_streak() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    let id = store.create(HabitDraft::new("Stretch")).unwrap();

    for offset in [2, 1, 0] {
        store.toggle_completion(&id, ago(offset)).unwrap();
    }

    let habit = store.get(&id).unwrap();
    assert_eq!(habit.current_streak(), 3);
    assert_eq!(habit.longest_streak(), 3);
}

#[test]
fn toggling_a_past_date_counts_only_toward_longest() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    let id = store.create(HabitDraft::new("Journal")).unwrap();

    let outcome = store.toggle_completion(&id, ago(1)).unwrap();
    assert_eq!(outcome.streaks, Streaks { current: 0, longest: 1 });

    let outcome = store.toggle_today(&id).unwrap();
    assert_eq!(outcome.streaks, Streaks { current: 2, longest: 2 });
}

#[test]
fn removing_a_middle_day_recomputes_from_scratch() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    let id = store.create(HabitDraft::new("Run")).unwrap();
    for offset in (0..5).rev() {
        store.toggle_completion(&id, ago(offset)).unwrap();
    }

    let outcome = store.toggle_completion(&id, ago(2)).unwrap();

    assert!(!outcome.completed);
    assert_eq!(outcome.streaks, Streaks { current: 2, longest: 2 });
}

#[test]
fn toggle_unknown_id_is_a_silent_noop() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    store.create(HabitDraft::new("Water")).unwrap();

    assert!(store
        .toggle_completion(&HabitId::from("missing"), today())
        .is_none());
    assert_eq!(memory.save_count(), 1);
}

#[test]
fn toggle_by_key_validates_date_text() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    let id = store.create(HabitDraft::new("Floss")).unwrap();

    let err = store.toggle_completion_key(&id, "2024-6-15").unwrap_err();
    assert!(matches!(err, HabitStoreError::InvalidDate(_)));
    assert!(store.get(&id).unwrap().completed_dates().is_empty());

    let outcome = store
        .toggle_completion_key(&id, "2024-06-15")
        .unwrap()
        .unwrap();
    assert_eq!(outcome.streaks.current, 1);
}

#[test]
fn update_merges_present_fields_only() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    let id = store.create(HabitDraft::new("Piano")).unwrap();
    store.toggle_today(&id).unwrap();

    let patch = HabitPatch {
        description: Some("scales first".to_string()),
        target_frequency: Some(3),
        ..HabitPatch::default()
    };
    assert!(store.update(&id, &patch).unwrap());

    let habit = store.get(&id).unwrap();
    assert_eq!(habit.name, "Piano");
    assert_eq!(habit.description, "scales first");
    assert_eq!(habit.target_frequency, 3);
    assert_eq!(habit.current_streak(), 1);
    assert_eq!(memory.save_count(), 3);
}

#[test]
fn update_rejects_blank_name_and_keeps_old_values() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    let id = store.create(HabitDraft::new("Piano")).unwrap();

    let patch = HabitPatch {
        name: Some(" ".to_string()),
        color: Some("#22C55E".to_string()),
        ..HabitPatch::default()
    };
    let err = store.update(&id, &patch).unwrap_err();

    assert_eq!(err, HabitStoreError::Validation(HabitValidationError::EmptyName));
    let habit = store.get(&id).unwrap();
    assert_eq!(habit.name, "Piano");
    assert_eq!(habit.color, "#8B5CF6");
    assert_eq!(memory.save_count(), 1);
}

#[test]
fn update_unknown_id_returns_false_without_saving() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    store.create(HabitDraft::new("Piano")).unwrap();

    let patch = HabitPatch {
        name: Some("Guitar".to_string()),
        ..HabitPatch::default()
    };
    assert!(!store.update(&HabitId::from("missing"), &patch).unwrap());
    assert_eq!(memory.save_count(), 1);
}

#[test]
fn delete_removes_habit_and_persists() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    let keep = store.create(HabitDraft::new("Keep")).unwrap();
    let dropped = store.create(HabitDraft::new("Drop")).unwrap();

    assert!(store.delete(&dropped));

    assert_eq!(store.len(), 1);
    assert!(store.get(&dropped).is_none());
    assert!(store.get(&keep).is_some());
    assert!(!memory.payload(DEFAULT_SNAPSHOT_SLOT).unwrap().contains(dropped.as_str()));
}

#[test]
fn delete_unknown_id_leaves_collection_and_snapshot_unchanged() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    store.create(HabitDraft::new("Keep")).unwrap();
    let snapshot_before = memory.payload(DEFAULT_SNAPSHOT_SLOT);
    let habits_before = store.habits().to_vec();

    assert!(!store.delete(&HabitId::from("missing")));

    assert_eq!(store.habits(), habits_before.as_slice());
    assert_eq!(memory.payload(DEFAULT_SNAPSHOT_SLOT), snapshot_before);
    assert_eq!(memory.save_count(), 1);
}

#[test]
fn reopening_restores_the_saved_collection() {
    let memory = MemorySnapshotStore::new();
    let (first, second) = {
        let mut store = open(&memory);
        let first = store.create(HabitDraft::new("First")).unwrap();
        let second = store.create(HabitDraft::new("Second")).unwrap();
        store.toggle_today(&first).unwrap();
        (first, second)
    };

    let store = open(&memory);

    assert_eq!(store.len(), 2);
    assert_eq!(store.habits()[0].id(), &first);
    assert_eq!(store.habits()[1].id(), &second);
    assert_eq!(store.get(&first).unwrap().current_streak(), 1);
}

#[test]
fn open_refreshes_streaks_for_the_current_day() {
    let memory = MemorySnapshotStore::new();
    let id = {
        let mut store = open(&memory);
        let id = store.create(HabitDraft::new("Daily")).unwrap();
        store.toggle_completion(&id, ago(1)).unwrap();
        store.toggle_today(&id).unwrap();
        id
    };

    let clock = FixedClock::on(today());
    clock.advance_days(2);
    let store = HabitStore::open(&memory, clock);

    let habit = store.get(&id).unwrap();
    assert_eq!(habit.current_streak(), 0);
    assert_eq!(habit.longest_streak(), 2);
}

#[test]
fn refresh_after_day_rollover_drops_current_streak() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    let id = store.create(HabitDraft::new("Daily")).unwrap();
    store.toggle_today(&id).unwrap();
    let saves = memory.save_count();

    store.clock().advance_days(1);
    store.refresh_streaks();

    let habit = store.get(&id).unwrap();
    assert_eq!(habit.current_streak(), 0);
    assert_eq!(habit.longest_streak(), 1);
    assert_eq!(memory.save_count(), saves);

    let outcome = store.toggle_today(&id).unwrap();
    assert_eq!(outcome.streaks, Streaks { current: 2, longest: 2 });
}

#[test]
fn corrupt_snapshot_starts_empty() {
    let memory = MemorySnapshotStore::with_snapshot(DEFAULT_SNAPSHOT_SLOT, "{not json");
    let mut store = open(&memory);

    assert!(store.is_empty());
    assert!(store.stats().is_none());

    store.create(HabitDraft::new("Fresh start")).unwrap();
    assert_eq!(open(&memory).len(), 1);
}

#[test]
fn snapshot_with_duplicate_ids_starts_empty() {
    let payload = serde_json::json!([
        {"id": "1", "name": "A", "completedDates": [], "createdAt": "2024-06-01T08:00:00.000Z"},
        {"id": "1", "name": "B", "completedDates": [], "createdAt": "2024-06-01T08:00:00.000Z"}
    ]);
    let memory = MemorySnapshotStore::with_snapshot(DEFAULT_SNAPSHOT_SLOT, payload.to_string());

    assert!(open(&memory).is_empty());
}

#[test]
fn legacy_snapshot_loads_and_recomputes_stale_streaks() {
    let payload = serde_json::json!([{
        "id": "1718000000000",
        "name": "Drink water",
        "description": "8 glasses",
        "category": "Health & Fitness",
        "color": "#06B6D4",
        "completedDates": ["2024-06-15", "2024-06-10", "2024-06-14"],
        "currentStreak": 9,
        "longestStreak": 9,
        "targetFrequency": 7,
        "createdAt": "2024-06-01T08:30:00.000Z"
    }]);
    let memory = MemorySnapshotStore::with_snapshot(DEFAULT_SNAPSHOT_SLOT, payload.to_string());

    let store = open(&memory);

    let habit = store.get(&HabitId::from("1718000000000")).unwrap();
    assert_eq!(habit.category, "Health & Fitness");
    assert_eq!(habit.completed_dates().len(), 3);
    assert_eq!(habit.streaks(), Streaks { current: 2, longest: 2 });
}

#[test]
fn save_failure_keeps_mutation_and_records_error() {
    let memory = MemorySnapshotStore::new();
    let mut store = open(&memory);
    let id = store.create(HabitDraft::new("Offline")).unwrap();

    memory.set_fail_saves(true);
    let outcome = store.toggle_today(&id).unwrap();

    assert!(outcome.completed);
    assert!(store.get(&id).unwrap().is_completed_on(today()));
    assert!(store.last_save_error().unwrap().contains("unavailable"));
    assert_eq!(memory.save_count(), 1);

    memory.set_fail_saves(false);
    store.toggle_completion(&id, ago(1)).unwrap();
    assert!(store.last_save_error().is_none());
    assert_eq!(memory.save_count(), 2);
}

#[test]
fn custom_slot_and_policy_are_honored() {
    let memory = MemorySnapshotStore::new();
    let options = StoreOptions {
        slot: "habits-test".to_string(),
        streak_policy: StreakPolicy::uncapped(),
    };
    let mut store = HabitStore::open_with(&memory, FixedClock::on(today()), options);
    let id = store.create(HabitDraft::new("Long haul")).unwrap();
    for offset in (0..35).rev() {
        store.toggle_completion(&id, ago(offset)).unwrap();
    }

    assert_eq!(store.get(&id).unwrap().current_streak(), 35);
    assert!(memory.payload("habits-test").is_some());
    assert!(memory.payload(DEFAULT_SNAPSHOT_SLOT).is_none());
}
