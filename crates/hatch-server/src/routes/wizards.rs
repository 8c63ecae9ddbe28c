use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use hatch_core::{
    config::Config,
    idea::Idea,
    present::{CompletionView, WizardView},
    project::Project,
    wizard::CommitTicket,
    CommitError, CommitService, FsCommitService, HatchError, ProjectId, StagingPatch,
    WizardController, WizardPhase,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

fn view(id: Uuid, wizard: &WizardController) -> serde_json::Value {
    serde_json::json!({
        "wizard_id": id,
        "wizard": WizardView::of(wizard),
    })
}

/// Apply `f` to the session and answer with its fresh view.
fn act(
    app: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut WizardController) -> hatch_core::Result<()>,
) -> Result<Json<serde_json::Value>, AppError> {
    let body = app.with_wizard(id, |w| {
        f(w)?;
        Ok(view(id, w))
    })?;
    Ok(Json(body))
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// POST /api/ideas/:slug/convert - open a wizard seeded from the idea.
pub async fn start_conversion(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let root = app.root.clone();
    let wizard = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let idea = Idea::load(&root, &slug)?;
        Ok::<_, HatchError>(WizardController::start(idea, &config))
    })
    .await
    .map_err(AppError::join)??;

    let id = app.open_session(wizard);
    let body = app.with_wizard(id, |w| Ok(view(id, w)))?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// GET /api/wizards/:id - current step, draft view and gate status.
pub async fn get_wizard(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    act(&app, id, |_| Ok(()))
}

/// POST /api/wizards/:id/cancel - discard the draft and close the session.
pub async fn cancel(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let body = app.close_with(id, |w| {
        w.cancel()?;
        Ok(view(id, w))
    })?;
    Ok(Json(body))
}

/// POST /api/wizards/:id/acknowledge - close a committed session.
pub async fn acknowledge(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let phase = app.with_wizard(id, |w| Ok(w.state().phase))?;
    match phase {
        WizardPhase::Terminal => {
            let project_id = app.close_session(id)?.acknowledge()?;
            Ok(Json(serde_json::json!({
                "wizard_id": id,
                "project_id": project_id,
            })))
        }
        // Cancel closes the session itself, so this only shows up in a race.
        WizardPhase::Cancelled => Err(HatchError::WizardClosed(phase.to_string()).into()),
        WizardPhase::Active | WizardPhase::Submitting => Err(AppError::conflict(format!(
            "wizard is {phase}; nothing to acknowledge"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// POST /api/wizards/:id/advance
pub async fn advance(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    act(&app, id, |w| w.advance().map(|_| ()))
}

/// POST /api/wizards/:id/retreat
pub async fn retreat(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    act(&app, id, |w| w.retreat().map(|_| ()))
}

// ---------------------------------------------------------------------------
// Draft edits
// ---------------------------------------------------------------------------

/// PATCH /api/wizards/:id/draft - merge a partial update into the draft.
pub async fn patch_draft(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<StagingPatch>,
) -> Result<Json<serde_json::Value>, AppError> {
    act(&app, id, |w| w.patch(patch))
}

#[derive(serde::Deserialize)]
pub struct AssignBody {
    pub user_id: String,
}

/// PUT /api/wizards/:id/roles/:role
pub async fn assign_role(
    State(app): State<AppState>,
    Path((id, role)): Path<(Uuid, String)>,
    Json(body): Json<AssignBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    act(&app, id, |w| w.assign_role(&role, &body.user_id))
}

/// DELETE /api/wizards/:id/roles/:role
pub async fn clear_role(
    State(app): State<AppState>,
    Path((id, role)): Path<(Uuid, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    act(&app, id, |w| w.clear_role(&role))
}

#[derive(serde::Deserialize)]
pub struct MilestoneBody {
    pub title: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// POST /api/wizards/:id/milestones
pub async fn add_milestone(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MilestoneBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    act(&app, id, |w| w.add_milestone(&body.title, body.date))
}

/// DELETE /api/wizards/:id/milestones/:index
pub async fn remove_milestone(
    State(app): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<serde_json::Value>, AppError> {
    act(&app, id, |w| w.remove_milestone(index).map(|_| ()))
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/wizards/:id/submit - commit the draft as a new project.
///
/// The session lock is held only to freeze the draft and to record the
/// outcome. The commit runs in a detached task that records its own outcome,
/// so a client that hangs up mid-submit still leaves the session terminal or
/// back on its last step. A submit that arrives while another is in flight
/// gets 202 and the service is not called.
pub async fn submit(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let Some(ticket) = app.with_wizard(id, |w| w.begin_submit())? else {
        let body = app.with_wizard(id, |w| Ok(view(id, w)))?;
        return Ok((StatusCode::ACCEPTED, Json(body)));
    };

    let pid = tokio::spawn(commit_and_record(app.clone(), id, ticket))
        .await
        .map_err(AppError::join)??;

    let root = app.root.clone();
    let completion = tokio::task::spawn_blocking(move || match Project::load(&root, pid.as_str()) {
        Ok(project) => CompletionView::new(&project),
        Err(e) => {
            tracing::warn!(project = %pid, error = %e, "committed project could not be reloaded");
            CompletionView::from_id(&pid)
        }
    })
    .await
    .map_err(AppError::join)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "wizard_id": id,
            "completion": completion,
        })),
    ))
}

async fn commit_and_record(
    app: AppState,
    id: Uuid,
    ticket: CommitTicket,
) -> hatch_core::Result<ProjectId> {
    let root = app.root.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        FsCommitService::new(root).create(&ticket.record, &ticket.source_id)
    })
    .await
    // A panicked commit still has to release the in-flight flag.
    .unwrap_or_else(|e| Err(CommitError::Storage(format!("commit task failed: {e}"))));
    app.with_wizard(id, |w| w.finish_submit(outcome))
}
