//! Read-only views of a wizard for hosts to render.

use crate::commit::ProjectId;
use crate::error::Result;
use crate::project::Project;
use crate::roles::RoleSummary;
use crate::staging::MilestoneDraft;
use crate::types::{BoardTemplate, WorkspaceToggle};
use crate::wizard::{Step, WizardController, WizardState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// StepView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepView {
    ConfirmImport {
        title: String,
        description: String,
        tags: Vec<String>,
        champion: Option<String>,
        include_source_content: bool,
    },
    Scope {
        name: String,
        description: String,
        milestones: Vec<MilestoneDraft>,
    },
    Roles {
        summary: RoleSummary,
    },
    WorkspaceSetup {
        board_template: BoardTemplate,
        board_columns: Vec<String>,
        toggles: BTreeMap<WorkspaceToggle, bool>,
    },
}

impl StepView {
    pub fn for_step(wizard: &WizardController, step: Step) -> Result<Self> {
        let draft = wizard.draft()?;
        let view = match step {
            Step::ConfirmImport => {
                let idea = wizard.source();
                let champion = idea.champion.as_ref().map(|id| {
                    wizard
                        .members()
                        .iter()
                        .find(|m| &m.id == id)
                        .map(|m| m.display_name.clone())
                        .unwrap_or_else(|| id.clone())
                });
                StepView::ConfirmImport {
                    title: idea.title.clone(),
                    description: idea.description.clone(),
                    tags: idea.tags.clone(),
                    champion,
                    include_source_content: draft.include_source_content,
                }
            }
            Step::Scope => StepView::Scope {
                name: draft.name.clone(),
                description: draft.description.clone(),
                milestones: draft.milestones.clone(),
            },
            Step::Roles => StepView::Roles {
                summary: draft.roles.summary(wizard.members()),
            },
            Step::WorkspaceSetup => StepView::WorkspaceSetup {
                board_template: draft.board_template,
                board_columns: draft
                    .board_template
                    .columns()
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                toggles: draft.workspace_toggles.clone(),
            },
        };
        Ok(view)
    }

    /// Plain-text rendering for terminals.
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self {
            StepView::ConfirmImport {
                title,
                description,
                tags,
                champion,
                include_source_content,
            } => {
                out.push_str(&format!("Idea:        {title}\n"));
                out.push_str(&format!("Description: {description}\n"));
                if !tags.is_empty() {
                    out.push_str(&format!("Tags:        {}\n", tags.join(", ")));
                }
                if let Some(c) = champion {
                    out.push_str(&format!("Champion:    {c}\n"));
                }
                out.push_str(&format!(
                    "Import idea content: {}\n",
                    on_off(*include_source_content)
                ));
            }
            StepView::Scope {
                name,
                description,
                milestones,
            } => {
                out.push_str(&format!("Name:        {name}\n"));
                out.push_str(&format!("Description: {description}\n"));
                out.push_str("Milestones:\n");
                if milestones.is_empty() {
                    out.push_str("  (none)\n");
                }
                for (i, m) in milestones.iter().enumerate() {
                    match m.date {
                        Some(d) => out.push_str(&format!("  {i}. {} ({d})\n", m.title)),
                        None => out.push_str(&format!("  {i}. {}\n", m.title)),
                    }
                }
            }
            StepView::Roles { summary } => {
                out.push_str(&format!(
                    "Roles assigned: {}/{}\n",
                    summary.assigned, summary.total
                ));
                for line in &summary.lines {
                    out.push_str(&format!("  {:<12} {}\n", line.role, line.display_name));
                }
            }
            StepView::WorkspaceSetup {
                board_template,
                board_columns,
                toggles,
            } => {
                out.push_str(&format!(
                    "Board:       {board_template} ({})\n",
                    board_columns.join(" | ")
                ));
                for (toggle, on) in toggles {
                    out.push_str(&format!("  {:<12} {}\n", toggle.label(), on_off(*on)));
                }
            }
        }
        out
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

// ---------------------------------------------------------------------------
// WizardView
// ---------------------------------------------------------------------------

/// Everything a host needs to draw the current wizard screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardView {
    pub idea: String,
    pub state: WizardState,
    pub step: Step,
    pub step_title: String,
    /// Absent once the wizard is closed.
    pub view: Option<StepView>,
    /// Why the current step would refuse to advance, if it would.
    pub blocked_by: Option<String>,
}

impl WizardView {
    pub fn of(wizard: &WizardController) -> Self {
        let step = wizard.step();
        Self {
            idea: wizard.source().slug.clone(),
            state: wizard.state().clone(),
            step,
            step_title: step.title().to_string(),
            view: StepView::for_step(wizard, step).ok(),
            blocked_by: wizard.current_step_issue().ok().flatten(),
        }
    }
}

// ---------------------------------------------------------------------------
// CompletionView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionView {
    pub project_id: ProjectId,
    pub name: String,
    pub headline: String,
    pub link: String,
    pub roles_filled: usize,
}

impl CompletionView {
    pub fn new(project: &Project) -> Self {
        Self {
            project_id: ProjectId(project.id.clone()),
            name: project.name.clone(),
            headline: format!("'{}' is now a project", project.name),
            link: project_link(&project.id),
            roles_filled: project.assigned_roles().count(),
        }
    }

    /// View for a committed wizard whose project record is not at hand.
    pub fn from_id(id: &ProjectId) -> Self {
        Self {
            project_id: id.clone(),
            name: id.to_string(),
            headline: format!("Project '{id}' created"),
            link: project_link(id.as_str()),
            roles_filled: 0,
        }
    }

    pub fn render(&self) -> String {
        format!("{}\n  id:   {}\n  open: {}\n", self.headline, self.project_id, self.link)
    }
}

pub fn project_link(id: &str) -> String {
    format!("/projects/{id}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Member};
    use crate::idea::Idea;
    use crate::project::Workspace;

    fn wizard() -> WizardController {
        let mut idea = Idea::new("garden", "Garden");
        idea.description = "Grow food".to_string();
        idea.champion = Some("user1".to_string());
        let mut cfg = Config::new("t");
        cfg.members.push(Member {
            id: "user1".to_string(),
            display_name: "Ada".to_string(),
        });
        WizardController::start(idea, &cfg)
    }

    #[test]
    fn confirm_view_resolves_champion() {
        let w = wizard();
        let view = StepView::for_step(&w, Step::ConfirmImport).unwrap();
        match &view {
            StepView::ConfirmImport { champion, .. } => {
                assert_eq!(champion.as_deref(), Some("Ada"))
            }
            other => panic!("unexpected view: {other:?}"),
        }
        assert!(view.render().contains("Import idea content: on"));
    }

    #[test]
    fn roles_view_counts_assignments() {
        let w = wizard();
        let view = StepView::for_step(&w, Step::Roles).unwrap();
        let text = view.render();
        assert!(text.contains("Roles assigned: 1/4"));
        assert!(text.contains("Ada"));
        assert!(text.contains("unassigned"));
    }

    #[test]
    fn wizard_view_reports_blocking_reason() {
        let mut w = wizard();
        w.advance().unwrap();
        w.patch(crate::StagingPatch::description("")).unwrap();
        let view = WizardView::of(&w);
        assert_eq!(view.step, Step::Scope);
        assert_eq!(view.blocked_by.as_deref(), Some("description must not be empty"));
    }

    #[test]
    fn wizard_view_after_cancel_has_no_step_view() {
        let mut w = wizard();
        w.cancel().unwrap();
        let view = WizardView::of(&w);
        assert!(view.view.is_none());
        assert!(view.blocked_by.is_none());
    }

    #[test]
    fn completion_view_links_to_project() {
        let project = Project {
            id: "garden".to_string(),
            name: "Garden".to_string(),
            description: String::new(),
            source_idea: "garden".to_string(),
            milestones: Vec::new(),
            roles: Vec::new(),
            workspace: Workspace {
                board_template: BoardTemplate::Simple,
                board_columns: Vec::new(),
                enabled: Vec::new(),
            },
            imported: None,
            created_at: chrono::Utc::now(),
        };
        let view = CompletionView::new(&project);
        assert_eq!(view.link, "/projects/garden");
        assert!(view.render().contains("'Garden' is now a project"));
    }
}
