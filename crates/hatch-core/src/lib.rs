pub mod commit;
pub mod config;
pub mod error;
pub mod idea;
pub mod io;
pub mod paths;
pub mod present;
pub mod project;
pub mod roles;
pub mod script;
pub mod staging;
pub mod types;
pub mod validate;
pub mod wizard;

pub use commit::{CommitError, CommitService, FsCommitService, ProjectId};
pub use error::{HatchError, Result};
pub use staging::{StagingPatch, StagingRecord};
pub use wizard::{WizardController, WizardEvent, WizardPhase, WizardState};
