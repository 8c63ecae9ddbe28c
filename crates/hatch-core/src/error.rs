use crate::commit::CommitError;
use crate::validate::Step;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HatchError {
    #[error("not initialized: run 'hatch init'")]
    NotInitialized,

    #[error("idea not found: {0}")]
    IdeaNotFound(String),

    #[error("idea already exists: {0}")]
    IdeaExists(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("unknown workspace toggle '{0}'")]
    UnknownToggle(String),

    #[error("unknown board template '{0}'")]
    UnknownBoardTemplate(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid wizard command: {0}")]
    InvalidCommand(String),

    #[error("milestone index {index} out of range ({len} milestones)")]
    MilestoneIndex { index: usize, len: usize },

    #[error("step '{step}' is not complete: {reason}")]
    Validation { step: Step, reason: String },

    #[error("cannot submit from step '{step}': submit is only available on '{last}'")]
    NotOnFinalStep { step: Step, last: Step },

    #[error("'{0}' is the last step: submit to finish")]
    NoNextStep(Step),

    #[error("a submit is already in flight")]
    SubmitInFlight,

    #[error("no submit is in flight")]
    NoSubmitInFlight,

    #[error("wizard is closed ({0})")]
    WizardClosed(String),

    #[error("wizard session not found: {0}")]
    WizardNotFound(String),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HatchError>;
