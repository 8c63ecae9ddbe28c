//! Turning a finished draft into a project.
//!
//! The wizard only knows the [`CommitService`] contract. [`FsCommitService`]
//! is the platform's implementation: one project manifest written with a
//! single no-clobber rename, so either the whole project exists afterwards
//! or nothing does.

use crate::idea::Idea;
use crate::paths;
use crate::project::{ImportedContent, Project, Workspace};
use crate::staging::StagingRecord;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ProjectId
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// CommitError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum CommitError {
    #[error("project already exists: {0}")]
    Conflict(String),

    #[error("project rejected: {0}")]
    Rejected(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<crate::error::HatchError> for CommitError {
    fn from(e: crate::error::HatchError) -> Self {
        CommitError::Storage(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// CommitService
// ---------------------------------------------------------------------------

/// Atomically creates a project from a finished draft.
///
/// Implementations either create the project with all of its roles and
/// workspace configuration, or nothing at all.
pub trait CommitService {
    fn create(
        &self,
        record: &StagingRecord,
        source_id: &str,
    ) -> std::result::Result<ProjectId, CommitError>;
}

impl<T: CommitService + ?Sized> CommitService for &T {
    fn create(
        &self,
        record: &StagingRecord,
        source_id: &str,
    ) -> std::result::Result<ProjectId, CommitError> {
        (**self).create(record, source_id)
    }
}

// ---------------------------------------------------------------------------
// FsCommitService
// ---------------------------------------------------------------------------

/// Writes committed drafts as project manifests under the platform root.
///
/// Imported content (title, description, tags) is read from the idea on disk
/// at commit time, so edits made to the idea while the wizard was open show
/// up in the project rather than what Confirm & Import displayed.
#[derive(Debug, Clone)]
pub struct FsCommitService {
    root: PathBuf,
}

impl FsCommitService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn build(
        &self,
        id: &str,
        record: &StagingRecord,
        source_id: &str,
    ) -> std::result::Result<Project, CommitError> {
        let imported = if record.include_source_content {
            let idea = Idea::load(&self.root, source_id)?;
            Some(ImportedContent {
                title: idea.title,
                description: idea.description,
                tags: idea.tags,
            })
        } else {
            None
        };

        Ok(Project {
            id: id.to_string(),
            name: record.name.trim().to_string(),
            description: record.description.clone(),
            source_idea: source_id.to_string(),
            milestones: record.milestones.clone(),
            roles: record.roles.slots().to_vec(),
            workspace: Workspace {
                board_template: record.board_template,
                board_columns: record
                    .board_template
                    .columns()
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                enabled: record.enabled_toggles(),
            },
            imported,
            created_at: Utc::now(),
        })
    }
}

impl CommitService for FsCommitService {
    fn create(
        &self,
        record: &StagingRecord,
        source_id: &str,
    ) -> std::result::Result<ProjectId, CommitError> {
        let id = paths::slugify(&record.name);
        if id.is_empty() {
            return Err(CommitError::Rejected(format!(
                "name '{}' does not produce a usable project id",
                record.name
            )));
        }

        let project = self.build(&id, record, source_id)?;
        let data = serde_yaml::to_string(&project)
            .map_err(|e| CommitError::Storage(e.to_string()))?;

        let manifest = paths::project_manifest(&self.root, &id);
        if !crate::io::create_exclusive(&manifest, data.as_bytes())? {
            return Err(CommitError::Conflict(id));
        }

        tracing::info!(project = %id, idea = %source_id, "project created");
        Ok(ProjectId(id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
