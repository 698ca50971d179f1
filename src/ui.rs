use crate::models::{HabitRecord, ItemKind, Section, StatsSnapshot, TimeSlot, DEFAULT_XP};
use crate::stats::{completed_today, section_summaries};

pub fn render_index(records: &[HabitRecord], stats: &StatsSnapshot) -> String {
    let sections = section_summaries(records)
        .into_iter()
        .map(|summary| render_section(summary.section, summary.completed, records))
        .collect::<String>();

    INDEX_HTML
        .replace("{{LEVEL}}", &stats.level.to_string())
        .replace("{{XP}}", &stats.total_xp.to_string())
        .replace("{{STREAKS}}", &stats.total_streaks.to_string())
        .replace("{{DONE}}", &completed_today(records).to_string())
        .replace("{{SECTIONS}}", &sections)
}

fn render_section(section: Section, completed: usize, records: &[HabitRecord]) -> String {
    let name = section.as_str();
    let mut items = String::new();
    for record in records.iter().filter(|record| record.section == section) {
        items.push_str(&render_item(record));
    }
    if items.is_empty() {
        items.push_str(r#"<li class="empty">Nothing here yet.</li>"#);
    }

    let clear = if completed == 0 {
        String::new()
    } else {
        format!(
            r#"<form method="post" action="/sections/{name}/clear">
          <button class="btn-clear" type="submit">Clear {completed} completed</button>
        </form>"#
        )
    };

    let fields = item_fields(None);
    format!(
        r#"<section class="section">
      <header class="section-header">
        <h2>{name}</h2>
        {clear}
      </header>
      <ul class="items">{items}</ul>
      <form class="add" method="post" action="/items">
        <input type="hidden" name="section" value="{name}" />
        {fields}
        <button class="btn-add" type="submit">Add</button>
      </form>
    </section>"#
    )
}

/// Inputs shared by the add form and the per-item edit form, prefilled from
/// `record` when editing.
fn item_fields(record: Option<&HabitRecord>) -> String {
    let number = |value: Option<String>| value.unwrap_or_default();
    let name = record.map(|r| escape_html(&r.name)).unwrap_or_default();
    let kind = record.map_or(ItemKind::Habit, |r| r.kind);
    let xp = record.map_or(DEFAULT_XP, |r| r.xp);
    let sets = number(record.and_then(|r| r.sets).map(|v| v.to_string()));
    let reps = number(record.and_then(|r| r.reps).map(|v| v.to_string()));
    let count = number(record.and_then(|r| r.count).map(|v| v.to_string()));
    let quantity = number(record.and_then(|r| r.quantity).map(|v| v.to_string()));
    let notes = record
        .and_then(|r| r.notes.as_deref())
        .map(escape_html)
        .unwrap_or_default();

    let kinds: String = [ItemKind::Habit, ItemKind::Task, ItemKind::Meal]
        .into_iter()
        .map(|option| {
            let selected = if option == kind { " selected" } else { "" };
            format!(r#"<option value="{0}"{selected}>{0}</option>"#, option.as_str())
        })
        .collect();
    let current_slot = record.and_then(|r| r.time_slot);
    let slots: String = TimeSlot::ALL
        .into_iter()
        .map(|slot| {
            let selected = if Some(slot) == current_slot { " selected" } else { "" };
            format!(r#"<option value="{0}"{selected}>{0}</option>"#, slot.as_str())
        })
        .collect();

    format!(
        r#"<input name="name" value="{name}" placeholder="Name" required />
        <select name="kind">{kinds}</select>
        <input name="xp" type="number" min="0" value="{xp}" title="XP reward" />
        <input name="sets" type="number" min="0" value="{sets}" placeholder="Sets" />
        <input name="reps" type="number" min="0" value="{reps}" placeholder="Reps" />
        <input name="count" type="number" min="0" value="{count}" placeholder="Count" />
        <input name="quantity" type="number" min="0" step="any" value="{quantity}" placeholder="Servings" />
        <select name="time_slot"><option value="">Time slot</option>{slots}</select>
        <input name="notes" value="{notes}" placeholder="Notes" />"#
    )
}

fn render_item(record: &HabitRecord) -> String {
    let id = escape_html(&record.id);
    let state = if record.completed_today { "done" } else { "open" };
    let label = if record.completed_today { "Undo" } else { "Done" };

    let mut details = String::new();
    if let Some(slot) = record.time_slot {
        details.push_str(&format!(" · {}", slot.as_str()));
    }
    if let (Some(sets), Some(reps)) = (record.sets, record.reps) {
        details.push_str(&format!(" · {sets}x{reps}"));
    }
    if let Some(count) = record.count {
        details.push_str(&format!(" · {count} times"));
    }
    if let Some(quantity) = record.quantity {
        details.push_str(&format!(" · {quantity} servings"));
    }
    if let Some(notes) = &record.notes {
        details.push_str(&format!(" · {}", escape_html(notes)));
    }
    let fields = item_fields(Some(record));

    format!(
        r#"<li class="item {state}">
        <div class="item-main">
          <span class="item-name">{name}</span>
          <span class="item-meta">{kind} · {xp} XP · streak {streak}{details}</span>
        </div>
        <form method="post" action="/items/{id}/toggle"><button class="btn-toggle" type="submit">{label}</button></form>
        <form method="post" action="/items/{id}/delete"><button class="btn-delete" type="submit">Delete</button></form>
        <details class="edit">
          <summary>Edit</summary>
          <form class="add" method="post" action="/items/{id}/edit">
            {fields}
            <button class="btn-add" type="submit">Update</button>
          </form>
        </details>
      </li>"#,
        name = escape_html(&record.name),
        kind = record.kind.as_str(),
        xp = record.xp,
        streak = record.streak,
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker</title>
  <style>
    :root {
      --bg: #f4f6f8;
      --ink: #1f2933;
      --muted: #6b7280;
      --accent: #0d9488;
      --danger: #dc2626;
      --card: #ffffff;
      --shadow: 0 12px 32px rgba(15, 23, 42, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Trebuchet MS", sans-serif;
      padding: 24px 16px 48px;
    }

    .app {
      width: min(860px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
      text-align: center;
    }

    .banner {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 12px;
      padding: 18px;
      border-radius: 18px;
      background: linear-gradient(90deg, #14b8a6, #06b6d4);
      color: white;
      text-align: center;
      box-shadow: var(--shadow);
    }

    .banner .value {
      display: block;
      font-size: 1.5rem;
      font-weight: 700;
    }

    .progress {
      text-align: center;
      font-weight: 600;
    }

    .section {
      background: var(--card);
      border-radius: 16px;
      padding: 16px 20px;
      box-shadow: var(--shadow);
    }

    .section-header {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .section-header h2 {
      margin: 0;
      font-size: 1.2rem;
    }

    .items {
      list-style: none;
      padding: 0;
      margin: 12px 0;
      display: grid;
      gap: 8px;
    }

    .item {
      display: flex;
      align-items: center;
      gap: 8px;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(15, 23, 42, 0.08);
    }

    .item.done {
      background: #f0fdf4;
    }

    .item-main {
      flex: 1;
      display: grid;
    }

    .item-meta,
    .empty {
      color: var(--muted);
      font-size: 0.85rem;
    }

    .add {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .add input[name="name"],
    .add input[name="notes"] {
      flex: 1;
    }

    .add input[type="number"] {
      width: 80px;
    }

    .item {
      flex-wrap: wrap;
    }

    .edit {
      flex-basis: 100%;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 6px 14px;
      font-weight: 600;
      cursor: pointer;
    }

    .btn-toggle,
    .btn-add {
      background: var(--accent);
      color: white;
    }

    .btn-delete,
    .btn-clear {
      background: transparent;
      color: var(--danger);
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>Habit Tracker</h1>

    <section class="banner" aria-label="User statistics">
      <div><span class="value">Level {{LEVEL}}</span>Current Level</div>
      <div><span class="value">{{XP}}</span>Total XP</div>
      <div><span class="value">{{STREAKS}}</span>Total Streaks</div>
    </section>

    <p class="progress">Today's Progress: {{DONE}} completed</p>

    {{SECTIONS}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{add_item, toggle_completion};
    use crate::models::RecordInput;
    use crate::stats::compute_stats;

    #[test]
    fn index_shows_stats_and_items() {
        let records = add_item(Vec::new(), RecordInput::new(Section::Body, "Run <fast>", ItemKind::Habit));
        let id = records[0].id.clone();
        let records = toggle_completion(records, &id);
        let html = render_index(&records, &compute_stats(&records));

        assert!(html.contains("Level 1"));
        assert!(html.contains("Today's Progress: 1 completed"));
        assert!(html.contains("Run &lt;fast&gt;"));
        assert!(html.contains(&format!("/items/{id}/toggle")));
        assert!(html.contains("Clear 1 completed"));
        assert!(html.contains(&format!("/items/{id}/edit")));
        assert!(html.contains(r#"value="Run &lt;fast&gt;""#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let mut input = RecordInput::new(Section::Meals, "Water", ItemKind::Meal);
        input.xp = 15;
        input.quantity = Some(1.5);
        input.time_slot = Some(TimeSlot::Custom);
        input.notes = Some("1.5 liters".to_string());
        let records = add_item(Vec::new(), input);
        let html = render_index(&records, &compute_stats(&records));

        assert!(html.contains(r#"name="xp" type="number" min="0" value="15""#));
        assert!(html.contains(r#"value="1.5" placeholder="Servings""#));
        assert!(html.contains(r#"<option value="Custom" selected>"#));
        assert!(html.contains(r#"<option value="meal" selected>"#));
        assert!(html.contains(r#"value="1.5 liters""#));
    }

    #[test]
    fn every_section_is_rendered() {
        let html = render_index(&[], &StatsSnapshot::default());
        for section in Section::ALL {
            assert!(html.contains(&format!("<h2>{}</h2>", section.as_str())));
        }
        assert!(!html.contains("btn-clear\""));
    }
}
