use crate::models::{HabitRecord, Section, SectionSummary, StatsSnapshot};

const XP_PER_LEVEL: u64 = 100;

/// Aggregates XP, level and streaks over every record.
///
/// XP is summed across all records whether or not they are completed today;
/// stored snapshots from the browser client were computed the same way.
pub fn compute_stats(records: &[HabitRecord]) -> StatsSnapshot {
    let total_xp = records.iter().map(|record| u64::from(record.xp)).sum();
    let total_streaks = records.iter().map(|record| u64::from(record.streak)).sum();

    StatsSnapshot {
        total_xp,
        level: level_for(total_xp),
        total_streaks,
    }
}

pub fn level_for(total_xp: u64) -> u64 {
    total_xp / XP_PER_LEVEL + 1
}

pub fn completed_today(records: &[HabitRecord]) -> usize {
    records.iter().filter(|record| record.completed_today).count()
}

pub fn section_summaries(records: &[HabitRecord]) -> Vec<SectionSummary> {
    Section::ALL
        .iter()
        .map(|&section| {
            let (total, completed) = records
                .iter()
                .filter(|record| record.section == section)
                .fold((0, 0), |(total, completed), record| {
                    (total + 1, completed + usize::from(record.completed_today))
                });
            SectionSummary {
                section,
                total,
                completed,
            }
        })
        .collect()
}
