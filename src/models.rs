use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fixed life area a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Body,
    Mind,
    Work,
    Meals,
    Recovery,
    Personal,
}

impl Section {
    /// Display order used by the page and the section summaries.
    pub const ALL: [Section; 6] = [
        Section::Body,
        Section::Mind,
        Section::Work,
        Section::Meals,
        Section::Recovery,
        Section::Personal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Body => "Body",
            Section::Mind => "Mind",
            Section::Work => "Work",
            Section::Meals => "Meals",
            Section::Recovery => "Recovery",
            Section::Personal => "Personal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Habit,
    Task,
    Meal,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Habit => "habit",
            ItemKind::Task => "task",
            ItemKind::Meal => "meal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Custom,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Afternoon => "Afternoon",
            TimeSlot::Evening => "Evening",
            TimeSlot::Custom => "Custom",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.as_str() == label.trim())
    }
}

// Stored records come from a browser client that writes `null` for a
// cleared number field (NaN) and reads it back as 0. These helpers accept
// whatever JSON is there instead of failing the whole record.

fn whole_number(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
        .map(|f| f as u32)
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(lenient_opt_u32(deserializer)?.unwrap_or(0))
}

fn lenient_opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(whole_number))
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_bool).unwrap_or(false))
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|stamp| stamp.with_timezone(&Utc)))
}

/// One trackable habit, task or meal.
///
/// Field names follow the `trackerItems` layout written by the browser
/// client so existing stored data loads unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    pub id: String,
    pub section: Section,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub xp: u32,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub completed_today: bool,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub streak: u32,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_completed: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub sets: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub reps: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<TimeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HabitRecord {
    pub fn from_input(id: String, created_at: DateTime<Utc>, input: RecordInput) -> Self {
        Self {
            id,
            section: input.section,
            name: input.name,
            kind: input.kind,
            xp: input.xp,
            completed_today: input.completed_today,
            streak: input.streak,
            last_completed: input.last_completed,
            sets: input.sets,
            reps: input.reps,
            quantity: input.quantity,
            count: input.count,
            time_slot: input.time_slot,
            notes: input.notes,
            created_at,
        }
    }
}

pub const DEFAULT_XP: u32 = 10;

fn default_xp() -> u32 {
    DEFAULT_XP
}

/// A record without its identity: what add and edit callers supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    pub section: Section,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default = "default_xp")]
    pub xp: u32,
    #[serde(default)]
    pub completed_today: bool,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_completed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub time_slot: Option<TimeSlot>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RecordInput {
    pub fn new(section: Section, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            section,
            name: name.into(),
            kind,
            xp: DEFAULT_XP,
            completed_today: false,
            streak: 0,
            last_completed: None,
            sets: None,
            reps: None,
            quantity: None,
            count: None,
            time_slot: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub level: u64,
    pub total_streaks: u64,
}

impl Default for StatsSnapshot {
    fn default() -> Self {
        Self {
            total_xp: 0,
            level: 1,
            total_streaks: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub section: Section,
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    pub items: Vec<HabitRecord>,
    pub stats: StatsSnapshot,
}

/// The descriptive fields of a record: what the add and edit forms carry.
///
/// Section and the completion counters are not part of it: an edit keeps them
/// from the stored record, and only toggling moves the counters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default = "default_xp")]
    pub xp: u32,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub time_slot: Option<TimeSlot>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ItemDetails {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            xp: DEFAULT_XP,
            sets: None,
            reps: None,
            quantity: None,
            count: None,
            time_slot: None,
            notes: None,
        }
    }

    /// Input for a brand new, not yet completed record in `section`.
    pub fn into_new(self, section: Section) -> RecordInput {
        RecordInput {
            xp: self.xp,
            sets: self.sets,
            reps: self.reps,
            quantity: self.quantity,
            count: self.count,
            time_slot: self.time_slot,
            notes: self.notes,
            ..RecordInput::new(section, self.name, self.kind)
        }
    }

    /// Replacement input for `existing`, carrying over its section and
    /// completion state.
    pub fn apply_to(self, existing: &HabitRecord) -> RecordInput {
        RecordInput {
            completed_today: existing.completed_today,
            streak: existing.streak,
            last_completed: existing.last_completed,
            ..self.into_new(existing.section)
        }
    }
}

/// Fields posted by the add and edit forms on the index page. Every value
/// arrives as text; blank or unparsable numbers fall back to their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub section: Option<Section>,
    pub name: String,
    pub kind: ItemKind,
    pub xp: String,
    pub sets: String,
    pub reps: String,
    pub quantity: String,
    pub count: String,
    pub time_slot: String,
    pub notes: String,
}

impl ItemForm {
    pub fn details(&self) -> ItemDetails {
        ItemDetails {
            xp: parse_field(&self.xp).unwrap_or(DEFAULT_XP),
            sets: parse_field(&self.sets),
            reps: parse_field(&self.reps),
            quantity: parse_field(&self.quantity),
            count: parse_field(&self.count),
            time_slot: TimeSlot::from_label(&self.time_slot),
            notes: Some(self.notes.clone()),
            ..ItemDetails::new(self.name.clone(), self.kind)
        }
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}
