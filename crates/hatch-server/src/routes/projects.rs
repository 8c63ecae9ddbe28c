use axum::extract::{Path, State};
use axum::Json;
use hatch_core::{present::project_link, project::Project, HatchError};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/projects - list all projects, oldest first.
pub async fn list_projects(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let list: Vec<serde_json::Value> = Project::list(&root)?
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "source_idea": p.source_idea,
                    "board_template": p.workspace.board_template,
                    "roles_filled": p.assigned_roles().count(),
                    "link": project_link(&p.id),
                    "created_at": p.created_at,
                })
            })
            .collect();
        Ok::<_, HatchError>(serde_json::json!(list))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// GET /api/projects/:id - full project record.
pub async fn get_project(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, AppError> {
    let root = app.root.clone();
    let project = tokio::task::spawn_blocking(move || Project::load(&root, &id))
        .await
        .map_err(AppError::join)??;

    Ok(Json(project))
}
