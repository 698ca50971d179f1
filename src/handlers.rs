use crate::errors::AppError;
use crate::ledger::Ledger;
use crate::models::{
    BulkDeleteRequest, HabitRecord, ItemDetails, ItemForm, LedgerResponse, RecordInput, Section,
    SectionSummary, StatsSnapshot,
};
use crate::state::{persist, AppState};
use crate::stats::section_summaries;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form, Json,
};
use std::collections::HashSet;
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let ledger = state.ledger.lock().await;
    Html(render_index(ledger.records(), &ledger.stats()))
}

pub async fn list_items(State(state): State<AppState>) -> Json<Vec<HabitRecord>> {
    let ledger = state.ledger.lock().await;
    Json(ledger.records().to_vec())
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    let ledger = state.ledger.lock().await;
    Json(ledger.stats())
}

pub async fn get_sections(State(state): State<AppState>) -> Json<Vec<SectionSummary>> {
    let ledger = state.ledger.lock().await;
    Json(section_summaries(ledger.records()))
}

pub async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<RecordInput>,
) -> Result<Json<LedgerResponse>, AppError> {
    let input = validate_input(payload)?;
    let response = apply(&state, |ledger| {
        let record = ledger.add_item(input);
        debug!("added {} to {}", record.id, record.section.as_str());
    })
    .await;
    Ok(Json(response))
}

pub async fn edit_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ItemDetails>,
) -> Result<Json<LedgerResponse>, AppError> {
    let details = validate_details(payload)?;
    let response = apply(&state, |ledger| ledger.edit_item(&id, details)).await;
    Ok(Json(response))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<LedgerResponse> {
    Json(apply(&state, |ledger| ledger.delete_item(&id)).await)
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Json<LedgerResponse> {
    let ids: HashSet<String> = payload.ids.into_iter().collect();
    Json(apply(&state, |ledger| ledger.bulk_delete(&ids)).await)
}

pub async fn toggle_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<LedgerResponse> {
    Json(apply(&state, |ledger| ledger.toggle_completion(&id)).await)
}

pub async fn clear_completed(
    State(state): State<AppState>,
    Path(section): Path<Section>,
) -> Json<LedgerResponse> {
    Json(apply(&state, |ledger| ledger.clear_completed(section)).await)
}

pub async fn form_add(
    State(state): State<AppState>,
    Form(form): Form<ItemForm>,
) -> Result<Redirect, AppError> {
    let section = form
        .section
        .ok_or_else(|| AppError::bad_request("section is required"))?;
    let details = validate_details(form.details())?;
    apply(&state, |ledger| {
        ledger.add_item(details.into_new(section));
    })
    .await;
    Ok(Redirect::to("/"))
}

pub async fn form_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ItemForm>,
) -> Result<Redirect, AppError> {
    let details = validate_details(form.details())?;
    apply(&state, |ledger| ledger.edit_item(&id, details)).await;
    Ok(Redirect::to("/"))
}

pub async fn form_toggle(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    apply(&state, |ledger| ledger.toggle_completion(&id)).await;
    Redirect::to("/")
}

pub async fn form_delete(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    apply(&state, |ledger| ledger.delete_item(&id)).await;
    Redirect::to("/")
}

pub async fn form_clear_completed(
    State(state): State<AppState>,
    Path(section): Path<Section>,
) -> Redirect {
    apply(&state, |ledger| ledger.clear_completed(section)).await;
    Redirect::to("/")
}

/// Runs one ledger operation and writes the result while still holding the
/// lock, so concurrent clients resolve as last writer wins.
async fn apply(state: &AppState, op: impl FnOnce(&mut Ledger)) -> LedgerResponse {
    let mut ledger = state.ledger.lock().await;
    op(&mut *ledger);
    persist(&state.storage, &ledger).await;

    LedgerResponse {
        items: ledger.records().to_vec(),
        stats: ledger.stats(),
    }
}

fn validate_input(mut input: RecordInput) -> Result<RecordInput, AppError> {
    input.name = clean_name(&input.name)?;
    input.notes = clean_notes(input.notes);
    Ok(input)
}

fn validate_details(mut details: ItemDetails) -> Result<ItemDetails, AppError> {
    details.name = clean_name(&details.name)?;
    details.notes = clean_notes(details.notes);
    Ok(details)
}

fn clean_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }
    Ok(name.to_string())
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;

    #[test]
    fn blank_names_are_rejected() {
        let input = RecordInput::new(Section::Work, "   ", ItemKind::Task);
        let err = validate_input(input).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn names_and_notes_are_trimmed() {
        let mut input = RecordInput::new(Section::Work, "  Review PRs ", ItemKind::Task);
        input.notes = Some("   ".to_string());
        let input = validate_input(input).unwrap();
        assert_eq!(input.name, "Review PRs");
        assert!(input.notes.is_none());
    }

    #[test]
    fn edit_details_are_cleaned_the_same_way() {
        let mut details = ItemDetails::new(" Stretch ", ItemKind::Habit);
        details.notes = Some(" before bed ".to_string());
        let details = validate_details(details).unwrap();
        assert_eq!(details.name, "Stretch");
        assert_eq!(details.notes.as_deref(), Some("before bed"));

        let blank = ItemDetails::new("\t", ItemKind::Habit);
        assert!(validate_details(blank).is_err());
    }
}
