//! Habit ledger: the record sequence and the operations over it.
//!
//! The free functions never perform I/O; they take the current sequence and
//! return the next one. [`Ledger`] holds the sequence the service is serving
//! and swaps it wholesale after every operation.

use crate::catalog::default_catalog;
use crate::models::{HabitRecord, ItemDetails, RecordInput, Section, StatsSnapshot};
use crate::stats::compute_stats;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns the default catalog when `existing` is empty, otherwise `existing`.
pub fn seed_defaults(existing: Vec<HabitRecord>) -> Vec<HabitRecord> {
    seed_defaults_at(existing, Utc::now())
}

pub fn seed_defaults_at(existing: Vec<HabitRecord>, now: DateTime<Utc>) -> Vec<HabitRecord> {
    if !existing.is_empty() {
        return existing;
    }

    default_catalog()
        .into_iter()
        .map(|input| HabitRecord::from_input(new_id(), now, input))
        .collect()
}

pub fn add_item(records: Vec<HabitRecord>, data: RecordInput) -> Vec<HabitRecord> {
    add_item_at(records, data, Utc::now())
}

pub fn add_item_at(
    mut records: Vec<HabitRecord>,
    data: RecordInput,
    now: DateTime<Utc>,
) -> Vec<HabitRecord> {
    records.push(HabitRecord::from_input(new_id(), now, data));
    records
}

/// Replaces every field of the record with `id` except its id and creation
/// time. Unknown ids leave the sequence untouched.
pub fn edit_item(records: Vec<HabitRecord>, id: &str, data: RecordInput) -> Vec<HabitRecord> {
    records
        .into_iter()
        .map(|record| {
            if record.id == id {
                HabitRecord::from_input(record.id, record.created_at, data.clone())
            } else {
                record
            }
        })
        .collect()
}

pub fn delete_item(mut records: Vec<HabitRecord>, id: &str) -> Vec<HabitRecord> {
    records.retain(|record| record.id != id);
    records
}

pub fn bulk_delete(mut records: Vec<HabitRecord>, ids: &HashSet<String>) -> Vec<HabitRecord> {
    records.retain(|record| !ids.contains(&record.id));
    records
}

/// Removes the records in `section` that are marked done today.
pub fn clear_completed(records: Vec<HabitRecord>, section: Section) -> Vec<HabitRecord> {
    let ids: HashSet<String> = records
        .iter()
        .filter(|record| record.section == section && record.completed_today)
        .map(|record| record.id.clone())
        .collect();
    bulk_delete(records, &ids)
}

pub fn toggle_completion(records: Vec<HabitRecord>, id: &str) -> Vec<HabitRecord> {
    toggle_completion_at(records, id, Utc::now())
}

/// Flips `completedToday` for `id` and moves its streak with it.
///
/// Completing bumps the streak and stamps `lastCompleted`; undoing drops the
/// streak by one (never below zero) and keeps `lastCompleted` as it was.
pub fn toggle_completion_at(
    mut records: Vec<HabitRecord>,
    id: &str,
    now: DateTime<Utc>,
) -> Vec<HabitRecord> {
    if let Some(record) = records.iter_mut().find(|record| record.id == id) {
        if record.completed_today {
            record.completed_today = false;
            record.streak = record.streak.saturating_sub(1);
        } else {
            record.completed_today = true;
            record.streak = record.streak.saturating_add(1);
            record.last_completed = Some(now);
        }
    }
    records
}

/// The sequence currently being served plus its derived snapshot.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: Vec<HabitRecord>,
    stats: StatsSnapshot,
    seeded: bool,
}

impl Ledger {
    pub fn new(records: Vec<HabitRecord>) -> Self {
        let stats = compute_stats(&records);
        Self {
            records,
            stats,
            seeded: false,
        }
    }

    pub fn records(&self) -> &[HabitRecord] {
        &self.records
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats
    }

    /// Seeds the default catalog at most once per ledger. Returns `true` when
    /// records were added and need persisting.
    pub fn seed_defaults(&mut self) -> bool {
        if self.seeded || !self.records.is_empty() {
            return false;
        }
        self.seeded = true;
        self.apply(seed_defaults);
        true
    }

    pub fn add_item(&mut self, data: RecordInput) -> HabitRecord {
        let record = HabitRecord::from_input(new_id(), Utc::now(), data);
        let appended = record.clone();
        self.apply(|mut records| {
            records.push(appended);
            records
        });
        record
    }

    /// Rewrites the descriptive fields of `id`. Section, completion state,
    /// streak and `lastCompleted` stay as stored.
    pub fn edit_item(&mut self, id: &str, details: ItemDetails) {
        let Some(existing) = self.records.iter().find(|record| record.id == id) else {
            return;
        };
        let data = details.apply_to(existing);
        self.apply(|records| edit_item(records, id, data));
    }

    pub fn delete_item(&mut self, id: &str) {
        self.apply(|records| delete_item(records, id));
    }

    pub fn bulk_delete(&mut self, ids: &HashSet<String>) {
        self.apply(|records| bulk_delete(records, ids));
    }

    pub fn clear_completed(&mut self, section: Section) {
        self.apply(|records| clear_completed(records, section));
    }

    pub fn toggle_completion(&mut self, id: &str) {
        self.apply(|records| toggle_completion(records, id));
    }

    fn apply(&mut self, op: impl FnOnce(Vec<HabitRecord>) -> Vec<HabitRecord>) {
        let records = std::mem::take(&mut self.records);
        self.records = op(records);
        self.stats = compute_stats(&self.records);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, hour, 0, 0).unwrap()
    }

    fn input(name: &str, xp: u32) -> RecordInput {
        RecordInput {
            xp,
            ..RecordInput::new(Section::Body, name, ItemKind::Habit)
        }
    }

    fn sample() -> Vec<HabitRecord> {
        let records = add_item_at(Vec::new(), input("Run", 20), at(7));
        let records = add_item_at(records, input("Stretch", 15), at(7));
        add_item_at(records, input("Swim", 25), at(7))
    }

    #[test]
    fn add_appends_with_fresh_id() {
        let records = sample();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].name, "Swim");
        assert_eq!(records[2].created_at, at(7));
        let ids: HashSet<&str> = records.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn edit_keeps_id_created_at_and_position() {
        let records = sample();
        let target = records[1].clone();
        let mut data = input("Long stretch", 30);
        data.notes = Some("before bed".to_string());

        let edited = edit_item(records, &target.id, data);
        assert_eq!(edited[1].id, target.id);
        assert_eq!(edited[1].created_at, target.created_at);
        assert_eq!(edited[1].name, "Long stretch");
        assert_eq!(edited[1].xp, 30);
        assert_eq!(edited[1].notes.as_deref(), Some("before bed"));
        assert_eq!(edited[0].name, "Run");
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let records = sample();
        assert_eq!(delete_item(records.clone(), "missing"), records);
        assert_eq!(edit_item(records.clone(), "missing", input("X", 1)), records);
        assert_eq!(toggle_completion_at(records.clone(), "missing", at(9)), records);
    }

    #[test]
    fn toggle_on_then_off_restores_counters() {
        for start in [0, 1, 7] {
            let mut records = sample();
            records[0].streak = start;
            let id = records[0].id.clone();

            let on = toggle_completion_at(records.clone(), &id, at(9));
            assert!(on[0].completed_today);
            assert_eq!(on[0].streak, start + 1);
            assert_eq!(on[0].last_completed, Some(at(9)));

            let off = toggle_completion_at(on, &id, at(10));
            assert!(!off[0].completed_today);
            assert_eq!(off[0].streak, start);
            assert_eq!(off[0].last_completed, Some(at(9)));
        }
    }

    #[test]
    fn toggle_off_then_on_restores_counters() {
        for start in [1, 4] {
            let mut records = sample();
            records[0].completed_today = true;
            records[0].streak = start;
            let id = records[0].id.clone();

            let off = toggle_completion_at(records, &id, at(9));
            assert_eq!(off[0].streak, start - 1);
            let on = toggle_completion_at(off, &id, at(10));
            assert!(on[0].completed_today);
            assert_eq!(on[0].streak, start);
        }
    }

    #[test]
    fn toggle_off_clamps_streak_at_zero() {
        let mut records = sample();
        records[0].completed_today = true;
        records[0].streak = 0;
        let id = records[0].id.clone();

        let off = toggle_completion_at(records, &id, at(9));
        assert!(!off[0].completed_today);
        assert_eq!(off[0].streak, 0);
        assert!(off[0].last_completed.is_none());
    }

    #[test]
    fn bulk_delete_matches_sequential_deletes() {
        let records = sample();
        let ids: HashSet<String> = [records[0].id.clone(), records[2].id.clone(), "nope".into()]
            .into_iter()
            .collect();

        let sequential = ids
            .iter()
            .fold(records.clone(), |acc, id| delete_item(acc, id));
        let bulk = bulk_delete(records, &ids);
        assert_eq!(bulk, sequential);
        assert_eq!(bulk.len(), 1);
        assert_eq!(bulk[0].name, "Stretch");
    }

    #[test]
    fn clear_completed_only_touches_one_section() {
        let mut records = sample();
        records[0].completed_today = true;
        let mut mind = input("Meditate", 10);
        mind.section = Section::Mind;
        mind.completed_today = true;
        let records = add_item_at(records, mind, at(7));

        let cleared = clear_completed(records, Section::Body);
        let names: Vec<&str> = cleared.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, ["Stretch", "Swim", "Meditate"]);
    }

    #[test]
    fn seed_fills_empty_sequence_with_unique_ids() {
        let seeded = seed_defaults_at(Vec::new(), at(6));
        assert!(!seeded.is_empty());
        let ids: HashSet<&str> = seeded.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids.len(), seeded.len());
        assert!(seeded.iter().all(|record| record.created_at == at(6)));

        let again = seed_defaults_at(seeded.clone(), at(8));
        assert_eq!(again, seeded);
    }

    #[test]
    fn ledger_seeds_once() {
        let mut ledger = Ledger::new(Vec::new());
        assert!(ledger.seed_defaults());
        let count = ledger.records().len();
        assert!(count > 0);

        let ids: HashSet<String> = ledger.records().iter().map(|r| r.id.clone()).collect();
        ledger.bulk_delete(&ids);
        assert!(ledger.records().is_empty());
        assert!(!ledger.seed_defaults());
        assert!(ledger.records().is_empty());
    }

    #[test]
    fn ledger_edit_keeps_completion_state_and_section() {
        let mut ledger = Ledger::new(Vec::new());
        let run = ledger.add_item(input("Run", 20));
        ledger.toggle_completion(&run.id);
        let completed = ledger.records()[0].clone();

        let mut details = ItemDetails::new("Run far", ItemKind::Habit);
        details.xp = 40;
        ledger.edit_item(&run.id, details);

        let edited = &ledger.records()[0];
        assert_eq!(edited.name, "Run far");
        assert_eq!(edited.xp, 40);
        assert_eq!(edited.section, Section::Body);
        assert!(edited.completed_today);
        assert_eq!(edited.streak, 1);
        assert_eq!(edited.last_completed, completed.last_completed);
        assert_eq!(edited.created_at, run.created_at);
        assert_eq!(ledger.stats().total_xp, 40);
        assert_eq!(ledger.stats().total_streaks, 1);

        let before = ledger.records().to_vec();
        ledger.edit_item("missing", ItemDetails::new("Ghost", ItemKind::Task));
        assert_eq!(ledger.records(), before.as_slice());
    }

    #[test]
    fn ledger_recomputes_stats_after_each_operation() {
        let mut ledger = Ledger::new(Vec::new());
        let added = ledger.add_item(input("Run", 20));
        assert_eq!(ledger.records(), [added.clone()]);
        assert_eq!(ledger.stats().total_xp, 20);
        assert_eq!(ledger.stats().total_streaks, 0);
        assert_eq!(ledger.stats().level, 1);

        ledger.toggle_completion(&added.id);
        let record = &ledger.records()[0];
        assert!(record.completed_today);
        assert_eq!(record.streak, 1);
        assert_eq!(ledger.stats().total_xp, 20);
        assert_eq!(ledger.stats().total_streaks, 1);
        assert_eq!(ledger.stats().level, 1);

        ledger.delete_item(&added.id);
        assert_eq!(ledger.stats(), StatsSnapshot::default());
    }
}
