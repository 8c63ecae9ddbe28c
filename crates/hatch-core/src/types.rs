use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// BoardTemplate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardTemplate {
    #[default]
    Kanban,
    Scrum,
    Simple,
}

impl BoardTemplate {
    pub fn all() -> &'static [BoardTemplate] {
        &[
            BoardTemplate::Kanban,
            BoardTemplate::Scrum,
            BoardTemplate::Simple,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoardTemplate::Kanban => "kanban",
            BoardTemplate::Scrum => "scrum",
            BoardTemplate::Simple => "simple",
        }
    }

    /// Columns a new project board starts with.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            BoardTemplate::Kanban => &["backlog", "in progress", "review", "done"],
            BoardTemplate::Scrum => &["product backlog", "sprint backlog", "in sprint", "done"],
            BoardTemplate::Simple => &["to do", "done"],
        }
    }
}

impl fmt::Display for BoardTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BoardTemplate {
    type Err = crate::error::HatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kanban" => Ok(BoardTemplate::Kanban),
            "scrum" => Ok(BoardTemplate::Scrum),
            "simple" => Ok(BoardTemplate::Simple),
            _ => Err(crate::error::HatchError::UnknownBoardTemplate(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkspaceToggle
// ---------------------------------------------------------------------------

/// Optional spaces a new project workspace can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceToggle {
    Chat,
    Whiteboard,
    DocsSpace,
    TaskBoard,
}

impl WorkspaceToggle {
    pub fn all() -> &'static [WorkspaceToggle] {
        &[
            WorkspaceToggle::Chat,
            WorkspaceToggle::Whiteboard,
            WorkspaceToggle::DocsSpace,
            WorkspaceToggle::TaskBoard,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkspaceToggle::Chat => "chat",
            WorkspaceToggle::Whiteboard => "whiteboard",
            WorkspaceToggle::DocsSpace => "docs_space",
            WorkspaceToggle::TaskBoard => "task_board",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkspaceToggle::Chat => "Chat",
            WorkspaceToggle::Whiteboard => "Whiteboard",
            WorkspaceToggle::DocsSpace => "Docs space",
            WorkspaceToggle::TaskBoard => "Task board",
        }
    }
}

impl fmt::Display for WorkspaceToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkspaceToggle {
    type Err = crate::error::HatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(WorkspaceToggle::Chat),
            "whiteboard" => Ok(WorkspaceToggle::Whiteboard),
            "docs_space" | "docs-space" => Ok(WorkspaceToggle::DocsSpace),
            "task_board" | "task-board" => Ok(WorkspaceToggle::TaskBoard),
            _ => Err(crate::error::HatchError::UnknownToggle(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
