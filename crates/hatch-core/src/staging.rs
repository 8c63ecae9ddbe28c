//! The project draft a conversion wizard accumulates.
//!
//! A `StagingStore` is seeded from an [`Idea`] once and then only changes
//! through [`StagingStore::patch`] and the role/milestone helpers. Every
//! update is a field-level merge; a field absent from a patch keeps its
//! current value no matter which step the patch came from.

use crate::config::WizardConfig;
use crate::error::{HatchError, Result};
use crate::idea::Idea;
use crate::roles::RoleAssignments;
use crate::types::{BoardTemplate, WorkspaceToggle};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// StagingRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingRecord {
    pub name: String,
    pub description: String,
    pub milestones: Vec<MilestoneDraft>,
    pub roles: RoleAssignments,
    pub board_template: BoardTemplate,
    pub workspace_toggles: BTreeMap<WorkspaceToggle, bool>,
    pub include_source_content: bool,
}

impl StagingRecord {
    /// Seed a draft from `idea`. The idea is only read.
    pub fn seed(idea: &Idea, cfg: &WizardConfig) -> Self {
        let mut roles = RoleAssignments::new(cfg.roles.iter().cloned());
        if let Some(champion) = &idea.champion {
            if roles.contains(&cfg.champion_role) {
                // Role was just checked, so assignment cannot fail.
                let _ = roles.assign(&cfg.champion_role, champion.clone());
            }
        }

        Self {
            name: idea.title.clone(),
            description: idea.description.clone(),
            milestones: idea
                .milestones
                .iter()
                .map(|m| MilestoneDraft {
                    title: m.title.clone(),
                    date: m.date,
                })
                .collect(),
            roles,
            board_template: cfg.default_board_template,
            workspace_toggles: WorkspaceToggle::all()
                .iter()
                .map(|&t| (t, cfg.toggle_default(t)))
                .collect(),
            include_source_content: true,
        }
    }

    pub fn toggle(&self, toggle: WorkspaceToggle) -> bool {
        self.workspace_toggles.get(&toggle).copied().unwrap_or(false)
    }

    pub fn enabled_toggles(&self) -> Vec<WorkspaceToggle> {
        self.workspace_toggles
            .iter()
            .filter(|(_, &on)| on)
            .map(|(&t, _)| t)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// StagingPatch
// ---------------------------------------------------------------------------

/// A partial update. `None` (or an absent toggle key) means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StagingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Vec<MilestoneDraft>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_template: Option<BoardTemplate>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub workspace_toggles: BTreeMap<WorkspaceToggle, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_source_content: Option<bool>,
}

impl StagingPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn toggle(toggle: WorkspaceToggle, on: bool) -> Self {
        Self {
            workspace_toggles: BTreeMap::from([(toggle, on)]),
            ..Self::default()
        }
    }

    /// Names of the fields this patch touches, for logging.
    pub fn touched(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.milestones.is_some() {
            fields.push("milestones");
        }
        if self.board_template.is_some() {
            fields.push("board_template");
        }
        if !self.workspace_toggles.is_empty() {
            fields.push("workspace_toggles");
        }
        if self.include_source_content.is_some() {
            fields.push("include_source_content");
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// StagingStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StagingStore {
    record: StagingRecord,
}

impl StagingStore {
    pub fn seed(idea: &Idea, cfg: &WizardConfig) -> Self {
        Self {
            record: StagingRecord::seed(idea, cfg),
        }
    }

    pub fn get(&self) -> &StagingRecord {
        &self.record
    }

    pub fn patch(&mut self, patch: StagingPatch) {
        let StagingPatch {
            name,
            description,
            milestones,
            board_template,
            workspace_toggles,
            include_source_content,
        } = patch;

        if let Some(name) = name {
            self.record.name = name;
        }
        if let Some(description) = description {
            self.record.description = description;
        }
        if let Some(milestones) = milestones {
            self.record.milestones = milestones;
        }
        if let Some(template) = board_template {
            self.record.board_template = template;
        }
        for (toggle, on) in workspace_toggles {
            self.record.workspace_toggles.insert(toggle, on);
        }
        if let Some(include) = include_source_content {
            self.record.include_source_content = include;
        }
    }

    pub fn roles_mut(&mut self) -> &mut RoleAssignments {
        &mut self.record.roles
    }

    pub fn add_milestone(&mut self, title: impl Into<String>, date: Option<NaiveDate>) {
        self.record.milestones.push(MilestoneDraft {
            title: title.into(),
            date,
        });
    }

    pub fn remove_milestone(&mut self, index: usize) -> Result<MilestoneDraft> {
        let len = self.record.milestones.len();
        if index >= len {
            return Err(HatchError::MilestoneIndex { index, len });
        }
        Ok(self.record.milestones.remove(index))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
