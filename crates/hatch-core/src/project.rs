use crate::error::{HatchError, Result};
use crate::paths;
use crate::roles::RoleSlot;
use crate::staging::MilestoneDraft;
use crate::types::{BoardTemplate, WorkspaceToggle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub board_template: BoardTemplate,
    pub board_columns: Vec<String>,
    pub enabled: Vec<WorkspaceToggle>,
}

// ---------------------------------------------------------------------------
// ImportedContent
// ---------------------------------------------------------------------------

/// Idea content carried over when the draft opted into importing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedContent {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Slug of the idea this project was converted from.
    pub source_idea: String,
    #[serde(default)]
    pub milestones: Vec<MilestoneDraft>,
    #[serde(default)]
    pub roles: Vec<RoleSlot>,
    pub workspace: Workspace,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported: Option<ImportedContent>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn load(root: &Path, id: &str) -> Result<Self> {
        paths::validate_slug(id)?;
        let manifest = paths::project_manifest(root, id);
        if !manifest.exists() {
            return Err(HatchError::ProjectNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let project: Project = serde_yaml::from_str(&data)?;
        Ok(project)
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let projects_dir = root.join(paths::PROJECTS_DIR);
        if !projects_dir.exists() {
            return Ok(Vec::new());
        }

        let mut projects = Vec::new();
        for entry in std::fs::read_dir(&projects_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let id = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &id) {
                    Ok(p) => projects.push(p),
                    Err(HatchError::ProjectNotFound(_)) | Err(HatchError::InvalidSlug(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }

    /// Projects converted from `idea_slug`, oldest first.
    pub fn from_idea(root: &Path, idea_slug: &str) -> Result<Vec<Self>> {
        Ok(Self::list(root)?
            .into_iter()
            .filter(|p| p.source_idea == idea_slug)
            .collect())
    }

    pub fn assigned_roles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.roles
            .iter()
            .filter_map(|s| s.user_id.as_deref().map(|u| (s.role.as_str(), u)))
    }
}
