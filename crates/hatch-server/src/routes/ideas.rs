use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hatch_core::{idea::Idea, project::Project, HatchError};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/ideas - list all ideas.
pub async fn list_ideas(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let ideas = Idea::list(&root)?;
        let projects = Project::list(&root)?;
        let list: Vec<serde_json::Value> = ideas
            .iter()
            .map(|i| {
                serde_json::json!({
                    "slug": i.slug,
                    "title": i.title,
                    "description": i.description,
                    "tags": i.tags,
                    "champion": i.champion,
                    "projects": projects.iter().filter(|p| p.source_idea == i.slug).count(),
                    "updated_at": i.updated_at,
                })
            })
            .collect();
        Ok::<_, HatchError>(serde_json::json!(list))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// GET /api/ideas/:slug - idea detail plus the projects made from it.
pub async fn get_idea(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let idea = Idea::load(&root, &slug)?;
        let projects: Vec<String> = Project::from_idea(&root, &slug)?
            .into_iter()
            .map(|p| p.id)
            .collect();
        Ok::<_, HatchError>(serde_json::json!({
            "idea": idea,
            "projects": projects,
        }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateIdeaBody {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub champion: Option<String>,
}

/// POST /api/ideas - create a new idea.
pub async fn create_idea(
    State(app): State<AppState>,
    Json(body): Json<CreateIdeaBody>,
) -> Result<(StatusCode, Json<Idea>), AppError> {
    let root = app.root.clone();
    let idea = tokio::task::spawn_blocking(move || {
        let mut idea = Idea::create(&root, body.slug, body.title, body.description)?;
        if !body.tags.is_empty() || body.champion.is_some() {
            for tag in body.tags {
                idea.add_tag(tag);
            }
            idea.set_champion(body.champion);
            idea.save(&root)?;
        }
        Ok::<_, HatchError>(idea)
    })
    .await
    .map_err(AppError::join)??;

    Ok((StatusCode::CREATED, Json(idea)))
}
