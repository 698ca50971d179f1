use crate::models::{ItemKind, RecordInput, Section, TimeSlot};

struct Entry {
    name: &'static str,
    kind: ItemKind,
    xp: u32,
    slot: TimeSlot,
    notes: Option<&'static str>,
    sets: Option<u32>,
    reps: Option<u32>,
    quantity: Option<f64>,
    count: Option<u32>,
}

const fn entry(
    name: &'static str,
    kind: ItemKind,
    xp: u32,
    slot: TimeSlot,
    notes: Option<&'static str>,
) -> Entry {
    Entry {
        name,
        kind,
        xp,
        slot,
        notes,
        sets: None,
        reps: None,
        quantity: None,
        count: None,
    }
}

fn section_entries(section: Section) -> Vec<Entry> {
    use ItemKind::{Habit, Meal, Task};
    use TimeSlot::{Afternoon, Custom, Evening, Morning};

    match section {
        Section::Body => vec![
            entry("Stretch 10 minutes", Habit, 15, Morning, Some("When wake up and before bed")),
            Entry {
                sets: Some(1),
                reps: Some(4),
                ..entry("Abs hold", Habit, 20, Morning, Some("4 minutes morning and before bed"))
            },
            Entry {
                sets: Some(3),
                reps: Some(8),
                ..entry("Full body routine", Habit, 25, Morning, None)
            },
            entry("Yoga retreat workout", Habit, 30, Afternoon, None),
            entry("Sauna session", Habit, 15, Evening, None),
            entry("Swimming", Habit, 25, Afternoon, None),
            entry("Daily steps", Habit, 15, Custom, Some("Track throughout the day")),
            entry("Incline walk/speed walk", Habit, 20, Morning, None),
        ],
        Section::Mind => vec![
            entry("Meditation 5 minutes", Habit, 15, Morning, Some("When wake up and before bed")),
            Entry {
                count: Some(8),
                ..entry(
                    "Pomodoro 5 minute breaks",
                    Habit,
                    10,
                    Custom,
                    Some("Every 25 minutes - count breaks taken"),
                )
            },
        ],
        Section::Work => vec![
            entry("UX research practice", Task, 15, Morning, Some("10 minutes daily practice")),
            entry("UI Design practice", Task, 15, Morning, Some("10 minutes daily practice")),
            entry("JavaScript code challenge", Task, 20, Morning, Some("10 minutes daily practice")),
        ],
        Section::Meals => vec![Entry {
            quantity: Some(1.5),
            ..entry("Water intake", Meal, 15, Custom, Some("1.5 liters throughout the day"))
        }],
        Section::Recovery => vec![entry(
            "Sleep 7 hours",
            Habit,
            25,
            Evening,
            Some("Quality sleep for recovery"),
        )],
        Section::Personal => vec![
            entry("Journal writing", Habit, 15, Evening, Some("Reflect on the day and set intentions")),
            entry("Call family/friends", Task, 20, Afternoon, Some("Stay connected with loved ones")),
            entry("Read for pleasure", Habit, 15, Evening, Some("30 minutes of personal reading")),
            entry("Practice gratitude", Habit, 10, Morning, Some("List 3 things you're grateful for")),
        ],
    }
}

/// The default records seeded into an empty tracker, in section order.
pub fn default_catalog() -> Vec<RecordInput> {
    Section::ALL
        .iter()
        .flat_map(|&section| {
            section_entries(section).into_iter().map(move |entry| RecordInput {
                xp: entry.xp,
                time_slot: Some(entry.slot),
                notes: entry.notes.map(str::to_string),
                sets: entry.sets,
                reps: entry.reps,
                quantity: entry.quantity,
                count: entry.count,
                ..RecordInput::new(section, entry.name, entry.kind)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_has_defaults() {
        let catalog = default_catalog();
        for section in Section::ALL {
            assert!(
                catalog.iter().any(|input| input.section == section),
                "no defaults for {section:?}"
            );
        }
        assert_eq!(catalog.len(), 19);
    }

    #[test]
    fn defaults_start_incomplete() {
        for input in default_catalog() {
            assert!(!input.name.is_empty());
            assert!(!input.completed_today);
            assert_eq!(input.streak, 0);
            assert!(input.time_slot.is_some());
        }
    }

    #[test]
    fn water_intake_keeps_fractional_quantity() {
        let water = default_catalog()
            .into_iter()
            .find(|input| input.name == "Water intake")
            .expect("missing water intake");
        assert_eq!(water.section, Section::Meals);
        assert_eq!(water.kind, ItemKind::Meal);
        assert_eq!(water.quantity, Some(1.5));
    }
}
